//! History command - list every version of a group.

use crate::cli::show::to_json;
use crate::cli::{open_store, output};
use crate::core::groups::Groups;
use crate::error::Result;

/// Print a group's versions, oldest first.
pub fn execute(name: &str, json: bool) -> Result<()> {
    let (_config, store) = open_store()?;
    let history = Groups::new(store.as_ref()).history(name)?;

    if json {
        let versions: Vec<_> = history.iter().map(to_json).collect();
        output::data(&serde_json::to_string_pretty(&versions)?);
        return Ok(());
    }

    output::blank();
    output::header(&format!(
        "{} versions of {}",
        output::count(history.len()),
        output::name(name)
    ));
    output::rule();
    for group in &history {
        output::kv(
            &format!("{:>4}", group.version()),
            format!(
                "{}  {} vars, {} secrets",
                group.created_at().format("%Y-%m-%d %H:%M:%S"),
                group.variables().len(),
                group.secret_variables().len()
            ),
        );
    }

    Ok(())
}
