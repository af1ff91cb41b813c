//! Versioned object storage.
//!
//! Abstracts the store that holds every version of every environment group
//! and the per-namespace links to them, with implementations for different
//! backends.
//!
//! ## Adding a New Storage Backend
//!
//! 1. Implement the `VersionedStore` trait
//! 2. Add the implementation in a new file (e.g., `configmap.rs`, `postgres.rs`)
//! 3. Re-export from this module and teach `backend::open` about it
//!
//! ## Contract
//!
//! - Absence is `Ok(None)`, never an error.
//! - `put_new_version` assigns `max + 1` atomically and refuses the write if
//!   the live latest version is not the draft's `expected_latest`.
//! - Reads mask secret values; the real values only leave the store through
//!   `SecretValue::Inherit` on a later write.
//! - `link` is idempotent.
//! - Malformed stored data is `StoreError::Corrupt`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::core::domain::{
    EnvironmentGroup, GroupDraft, SecretValue, SyncedEnvironmentGroup, VersionedName,
};
use crate::core::types::{GroupName, Labels, Namespace, Variables, Version};
use crate::error::{Result, StoreError};

mod backend;
mod fs;
mod memory;

pub use backend::open;
pub use fs::Filesystem;
pub use memory::Memory;

/// Versioned key/value store for environment groups.
///
/// Keyed by `(group name, version)`, with namespace links on the side.
pub trait VersionedStore: Send + Sync {
    /// Latest version of a live group.
    ///
    /// # Returns
    ///
    /// `None` if the group has no versions or has been retired.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails or holds malformed data.
    fn latest(&self, name: &str) -> Result<Option<EnvironmentGroup>>;

    /// A specific version, including versions of retired groups.
    fn version(&self, name: &str, version: Version) -> Result<Option<EnvironmentGroup>>;

    /// Every version number of a group, ascending.
    fn versions(&self, name: &str) -> Result<Vec<Version>>;

    /// Names of all live groups, sorted.
    fn names(&self) -> Result<Vec<GroupName>>;

    /// Append the next version of `draft.name()`.
    ///
    /// # Returns
    ///
    /// The version number assigned.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if latest is no longer
    /// `draft.expected_latest()`, or `StoreError::UnresolvedSecret` if an
    /// inherited secret does not exist.
    fn put_new_version(&self, draft: &GroupDraft, labels: &Labels) -> Result<Version>;

    /// Point `namespace` at `name.version`.
    ///
    /// Re-linking the same version with the same labels changes nothing.
    ///
    /// # Returns
    ///
    /// The versioned name now active in the namespace.
    ///
    /// # Errors
    ///
    /// Returns `GroupError::VersionNotFound` if the version does not exist.
    fn link(&self, name: &str, version: Version, namespace: &str, labels: &Labels)
        -> Result<String>;

    /// Current links in a namespace, sorted by group name.
    fn links(&self, namespace: &str) -> Result<Vec<SyncedEnvironmentGroup>>;

    /// Namespaces that currently link to any version of `name`, sorted.
    fn linked_namespaces(&self, name: &str) -> Result<Vec<Namespace>>;

    /// Remove the link for `name` in `namespace`. Returns whether one existed.
    fn unlink(&self, namespace: &str, name: &str) -> Result<bool>;

    /// Hide a group from `latest` and `names`, keeping its history.
    ///
    /// Returns whether the group was live before the call.
    fn retire(&self, name: &str) -> Result<bool>;
}

/// One stored version, with real secret values.
#[derive(Clone, Serialize, Deserialize)]
pub(crate) struct Record {
    pub name: GroupName,
    pub version: Version,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub variables: Variables,
    #[serde(default)]
    pub secrets: BTreeMap<String, String>,
}

impl Record {
    /// Masked read model.
    pub fn to_group(&self) -> EnvironmentGroup {
        EnvironmentGroup::new(
            self.name.clone(),
            self.version,
            self.variables.clone(),
            self.secrets.keys().cloned(),
            self.created_at,
            self.labels.clone(),
        )
    }
}

impl Drop for Record {
    fn drop(&mut self) {
        for value in self.secrets.values_mut() {
            value.zeroize();
        }
    }
}

/// Build the record for `version` from a draft.
///
/// `lookup` fetches the stored record an inherited secret points at. Each
/// source version is fetched at most once.
pub(crate) fn materialize<F>(
    draft: &GroupDraft,
    version: Version,
    labels: &Labels,
    mut lookup: F,
) -> Result<Record>
where
    F: FnMut(&VersionedName) -> Result<Option<Record>>,
{
    let mut sources: BTreeMap<VersionedName, Option<Record>> = BTreeMap::new();
    let mut secrets = BTreeMap::new();

    for (key, value) in draft.secrets() {
        let resolved = match value {
            SecretValue::Literal(literal) => literal.to_string(),
            SecretValue::Inherit(from) => {
                if !sources.contains_key(from) {
                    let record = lookup(from)?;
                    sources.insert(from.clone(), record);
                }
                sources
                    .get(from)
                    .and_then(|record| record.as_ref())
                    .and_then(|record| record.secrets.get(key))
                    .cloned()
                    .ok_or_else(|| StoreError::UnresolvedSecret {
                        key: key.clone(),
                        from: from.to_string(),
                    })?
            }
        };
        secrets.insert(key.clone(), resolved);
    }

    Ok(Record {
        name: draft.name().to_string(),
        version,
        created_at: draft.created_at(),
        labels: labels.clone(),
        variables: draft.variables().clone(),
        secrets,
    })
}
