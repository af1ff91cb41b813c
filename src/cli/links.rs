//! Links command - show what a namespace points at.

use crate::cli::{open_store, output};
use crate::core::sync::NamespaceSync;
use crate::error::Result;

/// Print the groups linked into `namespace`.
pub fn execute(namespace: &str, json: bool) -> Result<()> {
    let (_config, store) = open_store()?;
    let links = NamespaceSync::new(store.as_ref()).links(namespace)?;

    if json {
        output::data(&serde_json::to_string_pretty(&links)?);
    } else if links.is_empty() {
        output::dimmed(&format!("nothing linked into {}", namespace));
    } else {
        output::section(namespace);
        for link in &links {
            output::kv(
                link.base_name(),
                format!(
                    "{}  linked {}",
                    output::name(&link.versioned_name),
                    link.linked_at.format("%Y-%m-%d %H:%M:%S")
                ),
            );
        }
    }

    Ok(())
}
