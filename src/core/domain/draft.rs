//! Draft type.
//!
//! The write model for a new version. Secrets are either literal values or
//! references to the real value stored in an earlier version, which is how
//! a masked "leave unchanged" survives a write.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::warn;
use zeroize::Zeroizing;

use super::{EnvironmentGroup, Proposal, VersionedName};
use crate::core::constants::SECRET_SENTINEL;
use crate::core::types::{GroupName, Variables, Version};

/// A secret value in a draft.
#[derive(Clone, PartialEq, Eq)]
pub enum SecretValue {
    /// A new value supplied by the caller.
    Literal(Zeroizing<String>),
    /// Carry the value stored under the same key in this version.
    Inherit(VersionedName),
}

impl SecretValue {
    pub fn literal(value: impl Into<String>) -> Self {
        SecretValue::Literal(Zeroizing::new(value.into()))
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretValue::Literal(_) => f.write_str("Literal(..)"),
            SecretValue::Inherit(from) => write!(f, "Inherit({})", from),
        }
    }
}

/// Everything needed to append the next version of a group.
#[derive(Debug, Clone)]
pub struct GroupDraft {
    name: GroupName,
    variables: Variables,
    secrets: BTreeMap<String, SecretValue>,
    expected_latest: Option<Version>,
    created_at: DateTime<Utc>,
}

impl GroupDraft {
    /// Start an empty draft for `name`.
    ///
    /// `expected_latest` is the version the caller based its decision on;
    /// the store refuses the write if latest has moved since.
    pub fn new(name: impl Into<GroupName>, expected_latest: Option<Version>) -> Self {
        Self {
            name: name.into(),
            variables: Variables::new(),
            secrets: BTreeMap::new(),
            expected_latest,
            created_at: Utc::now(),
        }
    }

    /// Merge a proposal onto `base`.
    ///
    /// A soft update starts from every key in `base`; a hard update starts
    /// empty. Empty keys and values never make it in. An echoed sentinel
    /// inherits the secret from `base`, and is dropped when `base` has no
    /// such secret.
    pub fn merge(
        name: impl Into<GroupName>,
        base: Option<&EnvironmentGroup>,
        proposal: &Proposal,
        expected_latest: Option<Version>,
    ) -> Self {
        let mut draft = Self::new(name, expected_latest);
        let proposal = proposal.without_empty();

        if let (Some(base), false) = (base, proposal.hard_update) {
            let from = base.versioned_name();
            for (key, value) in base.variables() {
                if !key.is_empty() && !value.is_empty() {
                    draft.variables.insert(key.clone(), value.clone());
                }
            }
            for key in base.secret_variables().keys() {
                if !key.is_empty() {
                    draft
                        .secrets
                        .insert(key.clone(), SecretValue::Inherit(from.clone()));
                }
            }
        }

        draft.variables.extend(proposal.variables);

        for (key, value) in proposal.secrets {
            if value != SECRET_SENTINEL {
                draft.secrets.insert(key, SecretValue::literal(value));
                continue;
            }
            match base.filter(|b| b.secret_variables().contains_key(&key)) {
                Some(base) => {
                    draft
                        .secrets
                        .insert(key, SecretValue::Inherit(base.versioned_name()));
                }
                None => {
                    warn!(group = %draft.name, key = %key, "dropping placeholder for unknown secret");
                }
            }
        }

        draft
    }

    /// Add or replace a variable.
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Add or replace a secret.
    pub fn with_secret(mut self, key: impl Into<String>, value: SecretValue) -> Self {
        self.secrets.insert(key.into(), value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn secrets(&self) -> &BTreeMap<String, SecretValue> {
        &self.secrets
    }

    pub fn expected_latest(&self) -> Option<Version> {
        self.expected_latest
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Labels;

    fn vars(pairs: &[(&str, &str)]) -> Variables {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn base() -> EnvironmentGroup {
        EnvironmentGroup::new(
            "db-creds",
            3,
            vars(&[("a", "1"), ("b", "2")]),
            vec!["PASSWORD".to_string()],
            Utc::now(),
            Labels::new(),
        )
    }

    #[test]
    fn test_soft_merge_keeps_base_keys() {
        let base = base();
        let proposal = Proposal::new(vars(&[("a", "10"), ("c", "3")]), Variables::new());

        let draft = GroupDraft::merge("db-creds", Some(&base), &proposal, Some(3));

        assert_eq!(draft.variables(), &vars(&[("a", "10"), ("b", "2"), ("c", "3")]));
        assert_eq!(
            draft.secrets().get("PASSWORD"),
            Some(&SecretValue::Inherit(VersionedName::new("db-creds", 3)))
        );
        assert_eq!(draft.expected_latest(), Some(3));
    }

    #[test]
    fn test_hard_merge_is_authoritative() {
        let base = base();
        let proposal = Proposal::new(vars(&[("a", "1")]), Variables::new()).hard();

        let draft = GroupDraft::merge("db-creds", Some(&base), &proposal, Some(3));

        assert_eq!(draft.variables(), &vars(&[("a", "1")]));
        assert!(draft.secrets().is_empty());
    }

    #[test]
    fn test_hard_merge_sentinel_inherits() {
        let base = base();
        let proposal = Proposal::new(Variables::new(), vars(&[("PASSWORD", SECRET_SENTINEL)])).hard();

        let draft = GroupDraft::merge("db-creds", Some(&base), &proposal, Some(3));

        assert!(matches!(
            draft.secrets().get("PASSWORD"),
            Some(SecretValue::Inherit(_))
        ));
    }

    #[test]
    fn test_literal_secret_overrides() {
        let base = base();
        let proposal = Proposal::new(Variables::new(), vars(&[("PASSWORD", "new")]));

        let draft = GroupDraft::merge("db-creds", Some(&base), &proposal, Some(3));

        assert_eq!(
            draft.secrets().get("PASSWORD"),
            Some(&SecretValue::literal("new"))
        );
    }

    #[test]
    fn test_unknown_sentinel_dropped() {
        let proposal = Proposal::new(Variables::new(), vars(&[("NEW", SECRET_SENTINEL)]));

        let draft = GroupDraft::merge("fresh", None, &proposal, None);

        assert!(draft.secrets().is_empty());
    }

    #[test]
    fn test_empty_entries_never_merged() {
        let proposal = Proposal::new(vars(&[("a", ""), ("", "x"), ("ok", "1")]), vars(&[("s", "")]));

        let draft = GroupDraft::merge("fresh", None, &proposal, None);

        assert_eq!(draft.variables(), &vars(&[("ok", "1")]));
        assert!(draft.secrets().is_empty());
    }

    #[test]
    fn test_debug_hides_literal() {
        let value = SecretValue::literal("hunter2");
        assert_eq!(format!("{:?}", value), "Literal(..)");
    }
}
