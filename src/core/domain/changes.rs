//! Change set type.
//!
//! Compares a proposal against the latest stored version of a group and
//! decides whether writing it would be a no-op.

use super::{EnvironmentGroup, Proposal};
use crate::core::constants::SECRET_SENTINEL;
use crate::core::types::Variables;

/// Which map an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryKind {
    Variable,
    Secret,
}

/// How a single key compares to the latest version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Present in both and equal (for secrets: the sentinel was echoed back).
    Unchanged,
    /// Present in both but the proposal sets a new value.
    Modified,
    /// Only in the proposal.
    Added,
    /// Only in latest, and the proposal is a hard update.
    Removed,
    /// Only in latest, kept because the proposal is a soft update.
    Retained,
}

/// A single key in a change set.
#[derive(Debug, Clone)]
pub struct ChangeEntry {
    key: String,
    kind: EntryKind,
    status: EntryStatus,
}

impl ChangeEntry {
    /// Create a new change entry.
    pub fn new(key: String, kind: EntryKind, status: EntryStatus) -> Self {
        Self { key, kind, status }
    }

    /// The variable or secret name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Variable or secret.
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Comparison result.
    pub fn status(&self) -> EntryStatus {
        self.status
    }

    /// Whether this entry leaves the group as it is.
    pub fn is_unchanged(&self) -> bool {
        matches!(self.status, EntryStatus::Unchanged | EntryStatus::Retained)
    }
}

/// The full comparison between a proposal and the latest version.
#[derive(Debug)]
pub struct ChangeSet {
    entries: Vec<ChangeEntry>,
    has_latest: bool,
}

impl ChangeSet {
    /// Compare `proposal` against `latest`.
    ///
    /// Empty keys and empty values in the proposal are ignored. Entries are
    /// sorted by kind, then key.
    pub fn compute(latest: Option<&EnvironmentGroup>, proposal: &Proposal) -> Self {
        let proposal = proposal.without_empty();
        let empty = Variables::new();
        let (latest_vars, latest_secrets) = match latest {
            Some(group) => (group.variables(), group.secret_variables()),
            None => (&empty, &empty),
        };

        let mut entries = Vec::new();

        for (key, value) in &proposal.variables {
            let status = match latest_vars.get(key) {
                Some(existing) if existing == value => EntryStatus::Unchanged,
                Some(_) => EntryStatus::Modified,
                None => EntryStatus::Added,
            };
            entries.push(ChangeEntry::new(key.clone(), EntryKind::Variable, status));
        }

        // Stored secrets read back masked, so only an echoed sentinel can be
        // recognised as "same".
        for (key, value) in &proposal.secrets {
            let status = match latest_secrets.contains_key(key) {
                true if value == SECRET_SENTINEL => EntryStatus::Unchanged,
                true => EntryStatus::Modified,
                false => EntryStatus::Added,
            };
            entries.push(ChangeEntry::new(key.clone(), EntryKind::Secret, status));
        }

        let omitted = if proposal.hard_update {
            EntryStatus::Removed
        } else {
            EntryStatus::Retained
        };
        for key in latest_vars.keys() {
            if !proposal.variables.contains_key(key) {
                entries.push(ChangeEntry::new(key.clone(), EntryKind::Variable, omitted));
            }
        }
        for key in latest_secrets.keys() {
            if !proposal.secrets.contains_key(key) {
                entries.push(ChangeEntry::new(key.clone(), EntryKind::Secret, omitted));
            }
        }

        entries.sort_by(|a, b| (a.kind, &a.key).cmp(&(b.kind, &b.key)));

        Self {
            entries,
            has_latest: latest.is_some(),
        }
    }

    /// All entries.
    pub fn entries(&self) -> &[ChangeEntry] {
        &self.entries
    }

    /// Entries with the given status.
    pub fn with_status(&self, status: EntryStatus) -> Vec<&ChangeEntry> {
        self.entries.iter().filter(|e| e.status == status).collect()
    }

    /// Only modified entries.
    pub fn modified(&self) -> Vec<&ChangeEntry> {
        self.with_status(EntryStatus::Modified)
    }

    /// Only added entries.
    pub fn added(&self) -> Vec<&ChangeEntry> {
        self.with_status(EntryStatus::Added)
    }

    /// Only removed entries.
    pub fn removed(&self) -> Vec<&ChangeEntry> {
        self.with_status(EntryStatus::Removed)
    }

    /// Whether a latest version existed to compare against.
    pub fn has_latest(&self) -> bool {
        self.has_latest
    }

    /// Whether writing the proposal would change nothing.
    ///
    /// Without a latest version there is nothing to be equal to, so the
    /// first write is never a no-op.
    pub fn is_noop(&self) -> bool {
        self.has_latest && self.entries.iter().all(ChangeEntry::is_unchanged)
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
