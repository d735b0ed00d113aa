//! CLI command definitions and parsing
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

pub use commands::{config_path, init_config, resolve_overrides, InitOutcome};

#[derive(Parser, Debug)]
#[command(
    name = "retrieval-graph",
    version,
    author = "neur0map",
    about = "Configuration for a retrieval-augmented agent graph",
    long_about = "Resolves the configuration consumed by the retrieval agent and its indexing graph. \
                  Values come from explicit flags, a TOML file, or environment variables \
                  (USER_ID, EMBEDDING_MODEL, RETRIEVER_PROVIDER, RESPONSE_MODEL, QUERY_MODEL)."
)]
pub struct Cli {
    /// Config file path (defaults to ~/.config/retrieval-graph/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved configuration
    Show {
        /// Show only the indexing and retrieval fields
        #[arg(long)]
        index_only: bool,

        /// Print as JSON run context instead of TOML
        #[arg(long)]
        json: bool,

        /// Explicit user id
        #[arg(long)]
        user_id: Option<String>,

        /// Explicit embedding model (provider/model-name)
        #[arg(long)]
        embedding_model: Option<String>,

        /// Explicit retriever provider
        #[arg(long)]
        retriever_provider: Option<String>,

        /// Explicit response model (provider/model-name)
        #[arg(long)]
        response_model: Option<String>,

        /// Explicit query model (provider/model-name)
        #[arg(long)]
        query_model: Option<String>,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (defaults to standard location)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// List the environment variables the configuration reads
    Env,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
