//! Init command - write envgroup.toml.

use std::path::PathBuf;

use tracing::info;

use crate::cli::output;
use crate::core::config::{Backend, Config};
use crate::error::{ConfigError, Result};

/// Initialize envgroup in the current directory.
pub fn execute(cluster: u64, store: Option<PathBuf>, backend: Backend) -> Result<()> {
    if Config::exists() {
        return Err(ConfigError::AlreadyInitialized.into());
    }

    let mut config = Config::new(cluster);
    config.store.backend = backend;
    config.store.path = store;
    config.validate()?;
    config.save()?;

    info!(cluster, backend = ?backend, "initialized");

    output::success(&format!(
        "initialized {}",
        output::name(Config::config_path().display())
    ));
    if backend == Backend::Filesystem {
        output::kv("store:", config.store_path()?.display());
    }
    output::kv("cluster:", cluster);

    Ok(())
}
