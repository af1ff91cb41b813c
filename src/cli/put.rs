//! Put command - create the next version of a group.

use dialoguer::Password;
use tracing::debug;

use crate::cli::{open_store, output, parse_pairs};
use crate::core::domain::{ChangeSet, EntryKind, EntryStatus, Proposal};
use crate::core::groups::Groups;
use crate::core::types::Variables;
use crate::core::validation::parse_assignment;
use crate::error::{Result, ValidationError};

/// Arguments of `envgroup put`.
pub struct Args {
    pub name: String,
    pub vars: Vec<String>,
    pub secrets: Vec<String>,
    pub labels: Vec<String>,
    pub hard: bool,
    pub dry_run: bool,
}

/// Create or update a group.
pub fn execute(args: Args) -> Result<()> {
    let (_config, store) = open_store()?;
    let groups = Groups::new(store.as_ref());

    let mut proposal = Proposal::new(parse_pairs(&args.vars)?, read_secrets(&args.secrets)?);
    if args.hard {
        proposal = proposal.hard();
    }
    debug!(?proposal, "parsed proposal");

    if args.dry_run {
        let changes = groups.diff(&args.name, &proposal)?;
        print_changes(&args.name, &changes);
        return Ok(());
    }

    let labels = parse_pairs(&args.labels)?;
    let outcome = groups.create_or_update(&args.name, &proposal, &labels)?;
    let versioned = format!("{}.{}", args.name, outcome.version);

    if outcome.created {
        output::success(&format!("created {}", output::name(&versioned)));
    } else {
        output::dimmed(&format!("no changes, {} is current", versioned));
    }

    Ok(())
}

/// Secrets given as `KEY=VALUE`, or as `KEY` to read the value from a
/// hidden prompt.
fn read_secrets(raw: &[String]) -> Result<Variables> {
    let mut secrets = Variables::new();
    for entry in raw {
        let (key, value) = if entry.contains('=') {
            parse_assignment(entry)?
        } else {
            let key = entry.trim();
            if key.is_empty() {
                return Err(ValidationError::InvalidAssignment(entry.clone()).into());
            }
            let value = Password::new()
                .with_prompt(format!("Value for {}", key))
                .allow_empty_password(true)
                .interact()?;
            (key.to_string(), value)
        };
        secrets.insert(key, value);
    }
    Ok(secrets)
}

fn print_changes(name: &str, changes: &ChangeSet) {
    if changes.is_noop() {
        output::dimmed(&format!("no changes to {}", name));
        return;
    }
    if !changes.has_latest() {
        output::header(&format!("{} does not exist yet, version 1 would hold:", name));
    } else {
        output::header(&format!("changes to {}:", name));
    }

    for entry in changes.entries() {
        let marker = match entry.status() {
            EntryStatus::Added => '+',
            EntryStatus::Modified => '~',
            EntryStatus::Removed => '-',
            EntryStatus::Unchanged | EntryStatus::Retained => continue,
        };
        let label = match entry.kind() {
            EntryKind::Variable => entry.key().to_string(),
            EntryKind::Secret => format!("{} (secret)", entry.key()),
        };
        output::change(marker, &label);
    }
}
