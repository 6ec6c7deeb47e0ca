//! Domain models for dep-layers
//!
//! Contains the layering logic without any I/O concerns.

mod node;
mod solution;
mod graph;
mod diagnosis;

pub use node::{Node, NodeParseError};
pub use solution::{Layer, Solution};
pub use graph::{resolve, resolve_with, DependencyGraph, LayerError, UnknownDependencies};
pub use diagnosis::{Diagnosis, UnknownReference};
