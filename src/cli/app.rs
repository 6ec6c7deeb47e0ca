//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::layers;
use super::output::{Output, OutputFormat};
use crate::domain::{Node, UnknownDependencies};
use crate::storage::{manifest, Config};

#[derive(Parser)]
#[command(name = "layers")]
#[command(author, version, about = "Resolve dependency sets into ordered layers")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project config file (defaults to the nearest layers.toml)
    #[arg(long, global = true, env = "LAYERS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve nodes into layers
    Resolve {
        #[command(flatten)]
        input: InputArgs,

        /// Print a single dependency order instead of layers
        #[arg(long)]
        flat: bool,
    },

    /// Report duplicates, unknown dependencies and cycles
    Check {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Write a default layers.toml
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

/// Where nodes come from
#[derive(Args, Debug, Default)]
pub struct InputArgs {
    /// Manifest files (.toml, .yaml, .json, .jsonl, or text; `-` for stdin)
    pub files: Vec<PathBuf>,

    /// Inline node, e.g. `C: A, B` (repeatable)
    #[arg(long = "node", short = 'n')]
    pub nodes: Vec<Node>,

    /// Fail on dependency names that match no node
    #[arg(long)]
    pub strict: bool,
}

impl InputArgs {
    /// Loads manifest nodes followed by inline nodes
    pub fn load(&self) -> Result<Vec<Node>> {
        let mut nodes = manifest::load_all(&self.files)?;
        nodes.extend(self.nodes.iter().cloned());
        Ok(nodes)
    }

    /// `--strict` wins over the configured policy
    pub fn policy(&self, config: &Config) -> UnknownDependencies {
        if self.strict {
            UnknownDependencies::Reject
        } else {
            config.project.resolve.unknown_dependencies
        }
    }
}

/// Installs the stderr log subscriber; `RUST_LOG` takes precedence
fn init_logging(verbose: bool) {
    let default = if verbose { "warn,dep_layers=debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::with_project_file(path)?,
        None => Config::load()?,
    };
    tracing::debug!(
        project_file = ?config.project_file,
        unknown_dependencies = config.project.resolve.unknown_dependencies.as_str(),
        "configuration loaded"
    );

    let output = Output::new(cli.format.unwrap_or(config.global.default_format));

    match cli.command {
        Commands::Resolve { input, flat } => layers::resolve(&output, &config, &input, flat)?,
        Commands::Check { input } => layers::check(&output, &config, &input)?,
        Commands::Init { path } => {
            let (config_path, created) = Config::init_project(&path)?;
            if created {
                output.success(&format!("Created {}", config_path.display()));
            } else {
                output.success(&format!("{} already exists", config_path.display()));
            }
        }
    }

    tracing::debug!("command completed");
    Ok(())
}
