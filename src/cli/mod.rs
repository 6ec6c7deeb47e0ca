//! # Command-Line Interface
//!
//! The `layers` binary.
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `resolve` | Print the layers (or a flat order) for a node set |
//! | `check` | Report duplicates, unknown dependencies and cycles |
//! | `init` | Write a default `layers.toml` |
//!
//! Nodes come from manifest files and repeatable `--node 'C: A, B'` flags.
//!
//! ## Output Formats
//!
//! All commands support `--format`:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Logging
//!
//! Logs go to stderr through `tracing`. `--verbose` enables debug logs for
//! this crate; `RUST_LOG` overrides both.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod layers;

pub use app::{run, Cli, Commands, InputArgs};
pub use output::{Output, OutputFormat};
