//! Show command - print one group version.

use crate::cli::{open_store, output};
use crate::core::domain::EnvironmentGroup;
use crate::core::groups::Groups;
use crate::core::types::Version;
use crate::error::Result;

/// Show the latest or a specific version of a group.
///
/// Secret values are always masked.
pub fn execute(name: &str, version: Option<Version>, json: bool) -> Result<()> {
    let (_config, store) = open_store()?;
    let groups = Groups::new(store.as_ref());

    let group = match version {
        Some(version) => groups.version(name, version)?,
        None => groups.latest(name)?,
    };

    if json {
        output::data(&serde_json::to_string_pretty(&to_json(&group))?);
        return Ok(());
    }

    output::section(&output::name(group.versioned_name()));
    output::kv("created:", group.created_at().to_rfc3339());
    for (key, value) in group.labels() {
        output::kv(&format!("label {}:", key), value);
    }

    output::section("Variables");
    if group.variables().is_empty() {
        output::dimmed("none");
    }
    for (key, value) in group.variables() {
        output::kv(&format!("{}:", key), value);
    }

    output::section("Secrets");
    if group.secret_variables().is_empty() {
        output::dimmed("none");
    }
    for (key, value) in group.secret_variables() {
        output::kv(&format!("{}:", key), value);
    }

    Ok(())
}

pub(crate) fn to_json(group: &EnvironmentGroup) -> serde_json::Value {
    serde_json::json!({
        "name": group.name(),
        "version": group.version(),
        "created_at": group.created_at().to_rfc3339(),
        "labels": group.labels(),
        "variables": group.variables(),
        "secret_variables": group.secret_variables(),
    })
}
