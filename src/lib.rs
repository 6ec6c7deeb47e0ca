//! dep-layers - Resolve named dependency sets into ordered layers
//!
//! Each node names the nodes it depends on. Resolution groups nodes into
//! layers so every dependency sits in a strictly earlier layer, and each node
//! sits in the earliest layer it can.
//!
//! ```
//! use dep_layers::{resolve, Node};
//!
//! let nodes = vec![
//!     Node::leaf("A"),
//!     Node::leaf("B"),
//!     Node::new("C", ["A", "B"]),
//! ];
//! let solution = resolve(&nodes).unwrap();
//! assert_eq!(solution.to_string(), "0: [A: [], B: []]\n1: [C: [A, B]]\n");
//! ```

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{resolve, resolve_with, Diagnosis, Layer, LayerError, Node, Solution, UnknownDependencies};
