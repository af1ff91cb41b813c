//! Versioned name type.
//!
//! `<name>.<version>` identifies exactly one immutable snapshot. Consumers
//! parse it back, so the shape is strict: one separator, a non-empty name and
//! a base-10 version without sign or leading zeros.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::constants::VERSION_SEPARATOR;
use crate::core::types::{GroupName, Version};
use crate::error::GroupError;

/// A group name pinned to one version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionedName {
    name: GroupName,
    version: Version,
}

impl VersionedName {
    /// Pin `name` to `version`.
    pub fn new(name: impl Into<GroupName>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    /// The base group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pinned version.
    pub fn version(&self) -> Version {
        self.version
    }
}

impl fmt::Display for VersionedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.name, VERSION_SEPARATOR, self.version)
    }
}

impl FromStr for VersionedName {
    type Err = GroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(VERSION_SEPARATOR);
        let (name, version) = match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(version), None) => (name, version),
            _ => {
                return Err(GroupError::malformed(
                    s,
                    "expected exactly one '.' between name and version",
                ))
            }
        };

        if name.is_empty() {
            return Err(GroupError::malformed(s, "name is empty"));
        }
        if version.is_empty() || !version.bytes().all(|b| b.is_ascii_digit()) {
            return Err(GroupError::malformed(s, "version is not a base-10 integer"));
        }
        if version.len() > 1 && version.starts_with('0') {
            return Err(GroupError::malformed(s, "version has leading zeros"));
        }

        let version = version
            .parse::<Version>()
            .map_err(|e| GroupError::malformed(s, e.to_string()))?;

        Ok(Self::new(name, version))
    }
}

impl TryFrom<String> for VersionedName {
    type Error = GroupError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VersionedName> for String {
    fn from(value: VersionedName) -> Self {
        value.to_string()
    }
}
