//! Domain types.

mod changes;
mod draft;
mod group;
mod proposal;
mod synced;
mod versioned;

pub use changes::{ChangeEntry, ChangeSet, EntryKind, EntryStatus};
pub use draft::{GroupDraft, SecretValue};
pub use group::EnvironmentGroup;
pub use proposal::Proposal;
pub use synced::{GroupRef, SyncedEnvironmentGroup};
pub use versioned::VersionedName;
