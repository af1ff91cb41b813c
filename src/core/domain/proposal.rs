//! Proposal type.
//!
//! What a caller wants a group to look like: variables, secrets and whether
//! omitted keys should be deleted.

use crate::core::types::Variables;

/// A proposed set of variables and secrets for one group.
#[derive(Clone, Default)]
pub struct Proposal {
    /// Ordinary variables
    pub variables: Variables,
    /// Secret variables. The masking sentinel means "leave unchanged".
    pub secrets: Variables,
    /// Delete keys the proposal omits instead of retaining them
    pub hard_update: bool,
}

impl Proposal {
    /// A soft update with the given variables and secrets.
    pub fn new(variables: Variables, secrets: Variables) -> Self {
        Self {
            variables,
            secrets,
            hard_update: false,
        }
    }

    /// Switch to hard-update mode.
    pub fn hard(mut self) -> Self {
        self.hard_update = true;
        self
    }

    /// Copy with every empty key or empty value removed.
    ///
    /// Empty entries never count as changes and are never persisted.
    pub fn without_empty(&self) -> Self {
        Self {
            variables: non_empty(&self.variables),
            secrets: non_empty(&self.secrets),
            hard_update: self.hard_update,
        }
    }
}

fn non_empty(entries: &Variables) -> Variables {
    entries
        .iter()
        .filter(|(k, v)| !k.is_empty() && !v.is_empty())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

impl std::fmt::Debug for Proposal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Proposal")
            .field("variables", &self.variables)
            .field("secrets", &self.secrets.keys().collect::<Vec<_>>())
            .field("hard_update", &self.hard_update)
            .finish()
    }
}
