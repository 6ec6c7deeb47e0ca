//! # Storage Layer
//!
//! File formats read and written by dep-layers.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Nodes | TOML, YAML, JSON, JSONL or plain text | any path, or `-` for stdin |
//! | Project config | TOML | `layers.toml` in the working directory or an ancestor |
//! | Global config | TOML | `~/.config/layers/config.toml` (platform dependent) |
//!
//! ## Key Types
//!
//! - [`manifest`] - Load node sets from files
//! - [`Config`] - Project and global configuration

pub mod manifest;
mod config;

pub use config::{Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig, ResolveConfig, CONFIG_FILE};
pub use manifest::{ManifestError, ManifestFormat};
