//! Environment group type.
//!
//! The read model: one immutable version of a named group as returned by a
//! store. Secret values are always the masking sentinel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GroupRef, VersionedName};
use crate::core::constants::SECRET_SENTINEL;
use crate::core::types::{GroupName, Labels, Variables, Version};

/// One version of an environment group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentGroup {
    name: GroupName,
    version: Version,
    #[serde(default)]
    variables: Variables,
    #[serde(default)]
    secret_variables: Variables,
    created_at: DateTime<Utc>,
    #[serde(default)]
    labels: Labels,
}

impl EnvironmentGroup {
    /// Assemble a version as read from a store.
    ///
    /// Secret values are replaced by the sentinel; a store never hands out
    /// the real values.
    pub fn new(
        name: impl Into<GroupName>,
        version: Version,
        variables: Variables,
        secret_keys: impl IntoIterator<Item = String>,
        created_at: DateTime<Utc>,
        labels: Labels,
    ) -> Self {
        let secret_variables = secret_keys
            .into_iter()
            .map(|key| (key, SECRET_SENTINEL.to_string()))
            .collect();

        Self {
            name: name.into(),
            version,
            variables,
            secret_variables,
            created_at,
            labels,
        }
    }

    /// Group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version number.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Ordinary variables.
    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    /// Secret variables, masked.
    pub fn secret_variables(&self) -> &Variables {
        &self.secret_variables
    }

    /// When this version was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Labels recorded when this version was written.
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// `<name>.<version>` for this snapshot.
    pub fn versioned_name(&self) -> VersionedName {
        VersionedName::new(self.name.clone(), self.version)
    }

    /// Reference a consumer can pin to.
    pub fn group_ref(&self) -> GroupRef {
        GroupRef::new(self.name.clone(), self.version)
    }
}

impl std::fmt::Display for EnvironmentGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.versioned_name())
    }
}
