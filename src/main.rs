use anyhow::{Context, Result};
use retrieval_graph::cli::{self, Cli, Commands, ConfigAction, InitOutcome};
use retrieval_graph::config::{env, ConfigOverrides, ConfigValidator, EnvProvider, ProcessEnv};
use retrieval_graph::{Configuration, IndexConfiguration};
use std::path::PathBuf;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(cli.verbose);

    match cli.command {
        Commands::Config { action } => {
            cmd_config(cli.config, action)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose {
        "retrieval_graph=debug"
    } else {
        "retrieval_graph=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_config(config_path: Option<PathBuf>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show {
            index_only,
            json,
            user_id,
            embedding_model,
            retriever_provider,
            response_model,
            query_model,
        } => {
            let flags = ConfigOverrides {
                user_id,
                embedding_model,
                retriever_provider,
                response_model,
                query_model,
                ..ConfigOverrides::default()
            };
            let path = cli::config_path(config_path)?;
            let overrides = cli::resolve_overrides(&path, flags)
                .with_context(|| format!("Failed to read {}", path.display()))?;

            if index_only {
                let config = IndexConfiguration::builder().overrides(&overrides).build();
                print_config(&config.to_context(), &ConfigOverrides::from(&config), json)?;
            } else {
                let config = Configuration::builder().overrides(&overrides).build();
                print_config(&config.to_context(), &ConfigOverrides::from(&config), json)?;
            }
        }
        ConfigAction::Validate { file } => {
            let path = cli::config_path(file.or(config_path))?;
            let config = Configuration::load(&path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            ConfigValidator::validate(&config)?;

            println!("✓ Configuration is valid");
            println!("  Retriever: {}", config.retriever_provider());
            println!("  Embedding model: {}", config.embedding_model());
        }
        ConfigAction::Init { force } => {
            let path = cli::config_path(config_path)?;

            match cli::init_config(&path, force, &ProcessEnv)
                .with_context(|| format!("Failed to initialize {}", path.display()))?
            {
                InitOutcome::Created => {
                    println!("✓ Configuration initialized at: {}", path.display());
                }
                InitOutcome::AlreadyExists => {
                    println!("Configuration file already exists at: {}", path.display());
                    println!("Use --force to overwrite");
                }
            }
        }
        ConfigAction::Env => {
            for key in env::BOUND_VARS {
                match ProcessEnv.var(key) {
                    Some(value) => println!("{key}={value}"),
                    None => println!("{key} (unset)"),
                }
            }
        }
    }

    Ok(())
}

fn print_config(context: &serde_json::Value, fields: &ConfigOverrides, json: bool) -> Result<()> {
    if json {
        let out =
            serde_json::to_string_pretty(context).context("Failed to serialize config as JSON")?;
        println!("{}", out);
    } else {
        print!("{}", fields.to_toml()?);
    }
    Ok(())
}
