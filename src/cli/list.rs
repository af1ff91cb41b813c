//! List command - show live groups.

use crate::cli::{open_store, output};
use crate::core::groups::Groups;
use crate::error::Result;

/// List every live group with its latest version.
pub fn execute(json: bool) -> Result<()> {
    let (_config, store) = open_store()?;
    let groups = Groups::new(store.as_ref()).list()?;

    if json {
        let items: Vec<_> = groups
            .iter()
            .map(|g| {
                serde_json::json!({
                    "name": g.name(),
                    "latest": g.version(),
                })
            })
            .collect();
        let result = serde_json::json!({
            "groups": items,
            "count": groups.len()
        });
        output::data(&serde_json::to_string_pretty(&result)?);
    } else if groups.is_empty() {
        output::dimmed("no environment groups");
    } else {
        output::blank();
        output::header(&format!("{} environment groups", output::count(groups.len())));
        output::rule();
        for group in &groups {
            output::kv(group.name(), format!("v{}", group.version()));
        }
    }

    Ok(())
}
