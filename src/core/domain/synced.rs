use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::VersionedName;
use crate::core::types::{GroupName, Labels, Namespace, Version};

/// A `(name, version)` pair a consumer depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupRef {
    /// Group name
    pub name: GroupName,
    /// Pinned version
    pub version: Version,
}

impl GroupRef {
    pub fn new(name: impl Into<GroupName>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}

impl From<VersionedName> for GroupRef {
    fn from(value: VersionedName) -> Self {
        Self::new(value.name(), value.version())
    }
}

impl std::fmt::Display for GroupRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", VersionedName::new(self.name.clone(), self.version))
    }
}

/// The active version of a base group inside one namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncedEnvironmentGroup {
    /// Namespace the group is linked into
    pub namespace: Namespace,
    /// Exactly which snapshot is active
    pub versioned_name: VersionedName,
    /// When the link was last written
    pub linked_at: DateTime<Utc>,
    /// Labels supplied by the last sync
    #[serde(default)]
    pub labels: Labels,
}

impl SyncedEnvironmentGroup {
    /// Base group this link points into.
    pub fn base_name(&self) -> &str {
        self.versioned_name.name()
    }

    /// Pinned version.
    pub fn version(&self) -> Version {
        self.versioned_name.version()
    }

    /// Consumer reference for this link.
    pub fn group_ref(&self) -> GroupRef {
        self.versioned_name.clone().into()
    }
}
