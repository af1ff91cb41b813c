//! Retire command - hide a group, keeping its history.

use dialoguer::Confirm;

use crate::cli::{open_store, output};
use crate::core::groups::Groups;
use crate::error::Result;

/// Retire `name`, asking first unless `yes`.
pub fn execute(name: &str, force: bool, yes: bool) -> Result<()> {
    let (_config, store) = open_store()?;
    let groups = Groups::new(store.as_ref());

    // Fail early on an unknown group rather than after the prompt.
    groups.latest(name)?;

    if !yes && !confirm(name, force)? {
        output::dimmed("cancelled");
        return Ok(());
    }

    let unlinked = groups.retire(name, force)?;
    for namespace in &unlinked {
        output::warn(&format!("unlinked from {}", namespace));
    }
    output::success(&format!("retired {}", output::name(name)));
    output::hint(&format!(
        "history stays readable: {}",
        output::cmd(&format!("envgroup history {}", name))
    ));

    Ok(())
}

fn confirm(name: &str, force: bool) -> Result<bool> {
    let prompt = if force {
        format!("Unlink {} from every namespace and retire it?", name)
    } else {
        format!("Retire {}?", name)
    };
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(Into::into)
}
