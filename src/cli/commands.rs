//! File-backed steps behind the `config` subcommands
use crate::config::{ConfigOverrides, Configuration, EnvProvider};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Result of `config init`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// A default configuration was written
    Created,
    /// A file was already there and `force` was not set
    AlreadyExists,
}

/// The given path, or the default config location
pub fn config_path(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => Configuration::default_path(),
    }
}

/// Write the configuration resolved from `env` alone to `path`, creating
/// parent directories
///
/// Leaves an existing file alone unless `force` is set.
pub fn init_config<E: EnvProvider + ?Sized>(
    path: &Path,
    force: bool,
    env: &E,
) -> Result<InitOutcome> {
    if path.exists() && !force {
        return Ok(InitOutcome::AlreadyExists);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::Io {
            source: e,
            context: format!("Failed to create config directory: {:?}", parent),
        })?;
    }

    Configuration::builder().build_with(env).save(path)?;
    tracing::info!("Wrote default configuration to {}", path.display());

    Ok(InitOutcome::Created)
}

/// Explicit values from the config file with `flags` layered on top
///
/// A missing file contributes nothing.
pub fn resolve_overrides(path: &Path, flags: ConfigOverrides) -> Result<ConfigOverrides> {
    if !path.exists() {
        tracing::debug!(
            "Config file {} not found, using environment and defaults",
            path.display()
        );
        return Ok(flags);
    }

    let file = ConfigOverrides::from_file(path)?;
    tracing::info!("Using config file {}", path.display());
    Ok(file.merge(flags))
}
