//! Sync command - link groups into a namespace.

use crate::cli::{open_store, output, parse_pairs};
use crate::core::sync::NamespaceSync;
use crate::error::Result;

/// Link the latest version of every named group into `namespace`.
pub fn execute(names: &[String], namespace: &str, labels: &[String]) -> Result<()> {
    let (_config, store) = open_store()?;
    let labels = parse_pairs(labels)?;

    let synced = NamespaceSync::new(store.as_ref()).many(names, namespace, &labels)?;

    for link in &synced {
        output::success(&format!(
            "{} linked into {}",
            output::name(&link.versioned_name),
            namespace
        ));
    }

    Ok(())
}
