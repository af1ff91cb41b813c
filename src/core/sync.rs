//! Namespace synchronization.
//!
//! Points a namespace at the latest version of one or more groups. Links are
//! idempotent, so re-syncing an unchanged group is free.

use chrono::Utc;
use tracing::{debug, info};

use crate::core::domain::{EnvironmentGroup, SyncedEnvironmentGroup, VersionedName};
use crate::core::store::VersionedStore;
use crate::core::types::{Labels, Version};
use crate::core::validation::{validate_group_name, validate_namespace};
use crate::error::{Error, GroupError, Result};

/// Copies group versions into namespaces.
pub struct NamespaceSync<'a> {
    store: &'a dyn VersionedStore,
}

impl<'a> NamespaceSync<'a> {
    pub fn new(store: &'a dyn VersionedStore) -> Self {
        Self { store }
    }

    /// Link the latest version of `name` into `namespace`.
    ///
    /// # Errors
    ///
    /// Returns `GroupError::NotFound` if the group has no live version.
    /// Returns `GroupError::MalformedVersionedName` if the store answers
    /// with anything other than the resolved `name.version`.
    pub fn latest_to_namespace(
        &self,
        name: &str,
        namespace: &str,
        labels: &Labels,
    ) -> Result<SyncedEnvironmentGroup> {
        validate_namespace(namespace)?;
        let latest = self.resolve(name)?;
        self.link(&latest.versioned_name(), namespace, labels)
    }

    /// Link an exact version of `name` into `namespace`.
    pub fn version_to_namespace(
        &self,
        name: &str,
        version: Version,
        namespace: &str,
        labels: &Labels,
    ) -> Result<SyncedEnvironmentGroup> {
        validate_group_name(name)?;
        validate_namespace(namespace)?;
        self.link(&VersionedName::new(name, version), namespace, labels)
    }

    /// Link the latest version of every group in `names` into `namespace`.
    ///
    /// Every group is resolved before anything is linked, so a missing
    /// group leaves the namespace untouched. A link failure part way
    /// through leaves the earlier links in place; re-running the batch is
    /// safe because links are idempotent.
    ///
    /// # Errors
    ///
    /// Returns `Error::Batch` naming the first group that failed.
    pub fn many<S: AsRef<str>>(
        &self,
        names: &[S],
        namespace: &str,
        labels: &Labels,
    ) -> Result<Vec<SyncedEnvironmentGroup>> {
        validate_namespace(namespace)?;

        let resolved = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.resolve(name).map_err(|e| Error::batch(name, e))
            })
            .collect::<Result<Vec<EnvironmentGroup>>>()?;

        let synced = resolved
            .iter()
            .map(|group| {
                self.link(&group.versioned_name(), namespace, labels)
                    .map_err(|e| Error::batch(group.name(), e))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(namespace = %namespace, groups = synced.len(), "synced batch");
        Ok(synced)
    }

    /// Current links in `namespace`.
    pub fn links(&self, namespace: &str) -> Result<Vec<SyncedEnvironmentGroup>> {
        validate_namespace(namespace)?;
        self.store.links(namespace)
    }

    fn resolve(&self, name: &str) -> Result<EnvironmentGroup> {
        validate_group_name(name)?;
        self.store
            .latest(name)?
            .ok_or_else(|| GroupError::NotFound(name.to_string()).into())
    }

    fn link(
        &self,
        target: &VersionedName,
        namespace: &str,
        labels: &Labels,
    ) -> Result<SyncedEnvironmentGroup> {
        let returned = self
            .store
            .link(target.name(), target.version(), namespace, labels)?;

        let linked: VersionedName = returned.parse()?;
        if &linked != target {
            return Err(
                GroupError::malformed(&returned, format!("expected {target} to be linked")).into(),
            );
        }

        info!(
            group = %linked.name(),
            version = linked.version(),
            namespace = %namespace,
            "linked environment group"
        );

        let linked_at = self
            .store
            .links(namespace)?
            .into_iter()
            .find(|link| link.versioned_name == linked)
            .map_or_else(Utc::now, |link| link.linked_at);

        Ok(SyncedEnvironmentGroup {
            namespace: namespace.to_string(),
            versioned_name: linked,
            linked_at,
            labels: labels.clone(),
        })
    }
}
