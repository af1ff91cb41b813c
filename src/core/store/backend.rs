//! Backend selection logic for version storage
//!
//! This module determines which store to open from the configuration.

use super::{Filesystem, Memory, VersionedStore};
use crate::core::config::{Backend, Config};
use crate::error::Result;
use tracing::info;

/// Open the store the configuration asks for.
///
/// # Errors
///
/// Returns `ConfigError::NoStorePath` if the filesystem backend has no
/// resolvable root.
pub fn open(config: &Config) -> Result<Box<dyn VersionedStore>> {
    match config.store.backend {
        Backend::Filesystem => {
            let root = config.store_path()?;
            info!(root = %root.display(), "Using filesystem store");
            Ok(Box::new(Filesystem::new(root)))
        }
        Backend::Memory => {
            info!("Using in-memory store (contents are discarded on exit)");
            Ok(Box::new(Memory::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_memory_returns_store() {
        let mut config = Config::new(1);
        config.store.backend = Backend::Memory;

        let store = open(&config).unwrap();
        assert!(store.names().unwrap().is_empty());
    }

    #[test]
    fn test_open_filesystem_at_configured_path() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::new(1);
        config.store.path = Some(tmp.path().to_path_buf());

        let store = open(&config).unwrap();
        assert!(store.latest("nothing-here").unwrap().is_none());
    }
}
