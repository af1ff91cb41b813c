//! Base environment group manager.
//!
//! Owns the canonical versioned history of named groups: decides whether a
//! proposal is a change at all, and if so appends exactly one new immutable
//! version.

use tracing::{debug, info};

use crate::core::domain::{ChangeSet, EnvironmentGroup, GroupDraft, Proposal};
use crate::core::store::VersionedStore;
use crate::core::types::{Labels, Namespace, Version};
use crate::core::validation::validate_group_name;
use crate::error::{GroupError, Result, StoreError};

/// Result of [`Groups::create_or_update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Latest version after the call
    pub version: Version,
    /// Whether a new version was written
    pub created: bool,
}

/// Manager for base environment groups.
pub struct Groups<'a> {
    store: &'a dyn VersionedStore,
}

impl<'a> Groups<'a> {
    pub fn new(store: &'a dyn VersionedStore) -> Self {
        Self { store }
    }

    /// Create the next version of `name` if the proposal changes anything.
    ///
    /// # Arguments
    ///
    /// * `name` - Group name
    /// * `proposal` - Desired variables and secrets; the masking sentinel
    ///   leaves a secret unchanged
    /// * `labels` - Recorded on the new version
    ///
    /// # Returns
    ///
    /// The version that is latest after the call. A no-op returns the
    /// existing latest with `created == false`. A group with no versions
    /// always gets version 1, even for an empty proposal.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a bad name.
    /// Returns `StoreError::Conflict` if another writer created a version
    /// between the read and the write.
    pub fn create_or_update(
        &self,
        name: &str,
        proposal: &Proposal,
        labels: &Labels,
    ) -> Result<UpdateOutcome> {
        validate_group_name(name)?;

        let latest = self.store.latest(name)?;
        let changes = ChangeSet::compute(latest.as_ref(), proposal);

        if let Some(latest) = latest.as_ref().filter(|_| changes.is_noop()) {
            debug!(group = %name, version = latest.version(), "no changes, keeping latest");
            return Ok(UpdateOutcome {
                version: latest.version(),
                created: false,
            });
        }

        let expected = latest.as_ref().map(EnvironmentGroup::version);
        let version = self.write(name, latest.as_ref(), proposal, expected, labels)?;

        info!(
            group = %name,
            version,
            added = changes.added().len(),
            modified = changes.modified().len(),
            removed = changes.removed().len(),
            "created environment group version"
        );

        Ok(UpdateOutcome {
            version,
            created: true,
        })
    }

    /// Merge `proposal` onto `base` and append it as the next version of
    /// `name`, provided latest is still `expected`.
    ///
    /// `base` need not be a version of `name`; preview seeding merges onto
    /// the template group.
    pub(crate) fn write(
        &self,
        name: &str,
        base: Option<&EnvironmentGroup>,
        proposal: &Proposal,
        expected: Option<Version>,
        labels: &Labels,
    ) -> Result<Version> {
        let draft = GroupDraft::merge(name, base, proposal, expected);
        self.store.put_new_version(&draft, labels)
    }

    /// What `create_or_update` would change, without writing.
    pub fn diff(&self, name: &str, proposal: &Proposal) -> Result<ChangeSet> {
        validate_group_name(name)?;
        let latest = self.store.latest(name)?;
        Ok(ChangeSet::compute(latest.as_ref(), proposal))
    }

    /// Latest version of a live group.
    ///
    /// # Errors
    ///
    /// Returns `GroupError::NotFound` if the group has no versions or is
    /// retired.
    pub fn latest(&self, name: &str) -> Result<EnvironmentGroup> {
        validate_group_name(name)?;
        self.store
            .latest(name)?
            .ok_or_else(|| GroupError::NotFound(name.to_string()).into())
    }

    /// A specific version, retired groups included.
    pub fn version(&self, name: &str, version: Version) -> Result<EnvironmentGroup> {
        validate_group_name(name)?;
        self.store.version(name, version)?.ok_or_else(|| {
            GroupError::VersionNotFound {
                name: name.to_string(),
                version,
            }
            .into()
        })
    }

    /// Every version of a group, oldest first.
    pub fn history(&self, name: &str) -> Result<Vec<EnvironmentGroup>> {
        validate_group_name(name)?;

        let versions = self.store.versions(name)?;
        if versions.is_empty() {
            return Err(GroupError::NotFound(name.to_string()).into());
        }

        versions
            .into_iter()
            .map(|version| {
                self.store.version(name, version)?.ok_or_else(|| {
                    StoreError::corrupt(
                        format!("{name}.{version}"),
                        "listed version cannot be read",
                    )
                    .into()
                })
            })
            .collect()
    }

    /// Latest version of every live group, sorted by name.
    pub fn list(&self) -> Result<Vec<EnvironmentGroup>> {
        let mut groups = Vec::new();
        for name in self.store.names()? {
            // Retired between listing and reading.
            if let Some(group) = self.store.latest(&name)? {
                groups.push(group);
            }
        }
        Ok(groups)
    }

    /// Retire a group, keeping its history resolvable.
    ///
    /// # Arguments
    ///
    /// * `name` - Group name
    /// * `force` - Unlink the group from every namespace first
    ///
    /// # Returns
    ///
    /// The namespaces that were unlinked (empty unless `force`).
    ///
    /// # Errors
    ///
    /// Returns `GroupError::NotFound` if the group is not live.
    /// Returns `GroupError::InUse` if namespaces still link to it and
    /// `force` is false.
    pub fn retire(&self, name: &str, force: bool) -> Result<Vec<Namespace>> {
        validate_group_name(name)?;

        if self.store.latest(name)?.is_none() {
            return Err(GroupError::NotFound(name.to_string()).into());
        }

        let namespaces = self.store.linked_namespaces(name)?;
        if !namespaces.is_empty() && !force {
            return Err(GroupError::InUse {
                name: name.to_string(),
                namespaces,
            }
            .into());
        }

        for namespace in &namespaces {
            self.store.unlink(namespace, name)?;
            info!(group = %name, namespace = %namespace, "unlinked environment group");
        }

        if !self.store.retire(name)? {
            return Err(GroupError::NotFound(name.to_string()).into());
        }
        info!(group = %name, "retired environment group");

        Ok(namespaces)
    }
}
