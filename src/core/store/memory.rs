//! In-memory store implementation.
//!
//! Each group is an append-only arena indexed by `version - 1`, so latest is
//! the last element and any version is a direct index. One mutex guards the
//! whole store, which makes read-latest/write-next a single atomic step.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use tracing::debug;

use super::{materialize, Record, VersionedStore};
use crate::core::domain::{EnvironmentGroup, GroupDraft, SyncedEnvironmentGroup, VersionedName};
use crate::core::types::{GroupName, Labels, Namespace, Version};
use crate::core::validation::{validate_group_name, validate_namespace};
use crate::error::{GroupError, Result, StoreError};

#[derive(Default)]
struct History {
    versions: Vec<Record>,
    retired: bool,
}

impl History {
    fn live_latest(&self) -> Option<&Record> {
        if self.retired {
            None
        } else {
            self.versions.last()
        }
    }

    fn get(&self, version: Version) -> Option<&Record> {
        let index = usize::try_from(version).ok()?.checked_sub(1)?;
        self.versions.get(index)
    }
}

#[derive(Default)]
struct State {
    groups: HashMap<GroupName, History>,
    links: BTreeMap<(Namespace, GroupName), SyncedEnvironmentGroup>,
    mutations: u64,
}

/// Process-local store.
///
/// Used by tests and by the `memory` backend for dry runs. Contents vanish
/// with the process.
#[derive(Default)]
pub struct Memory {
    state: Mutex<State>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of writes that actually changed the store.
    ///
    /// No-op links and refused writes are not counted.
    pub fn mutations(&self) -> u64 {
        self.state.lock().map(|s| s.mutations).unwrap_or_default()
    }

    fn state(&self, op: &'static str, target: &str) -> Result<MutexGuard<'_, State>> {
        self.state.lock().map_err(|_| {
            StoreError::unavailable(op, target, std::io::Error::other("store lock poisoned")).into()
        })
    }
}

impl VersionedStore for Memory {
    fn latest(&self, name: &str) -> Result<Option<EnvironmentGroup>> {
        let state = self.state("latest", name)?;
        Ok(state
            .groups
            .get(name)
            .and_then(History::live_latest)
            .map(Record::to_group))
    }

    fn version(&self, name: &str, version: Version) -> Result<Option<EnvironmentGroup>> {
        let state = self.state("version", name)?;
        Ok(state
            .groups
            .get(name)
            .and_then(|h| h.get(version))
            .map(Record::to_group))
    }

    fn versions(&self, name: &str) -> Result<Vec<Version>> {
        let state = self.state("versions", name)?;
        Ok(state
            .groups
            .get(name)
            .map(|h| h.versions.iter().map(|r| r.version).collect())
            .unwrap_or_default())
    }

    fn names(&self) -> Result<Vec<GroupName>> {
        let state = self.state("names", "*")?;
        let mut names: Vec<_> = state
            .groups
            .iter()
            .filter(|(_, h)| h.live_latest().is_some())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    fn put_new_version(&self, draft: &GroupDraft, labels: &Labels) -> Result<Version> {
        validate_group_name(draft.name())?;
        let mut state = self.state("put_new_version", draft.name())?;

        let (current, next) = match state.groups.get(draft.name()) {
            Some(history) => (
                history.live_latest().map(|r| r.version),
                history.versions.len() as Version + 1,
            ),
            None => (None, 1),
        };
        if current != draft.expected_latest() {
            return Err(StoreError::conflict(draft.name(), draft.expected_latest(), current).into());
        }

        let record = materialize(draft, next, labels, |from: &VersionedName| {
            Ok(state
                .groups
                .get(from.name())
                .and_then(|h| h.get(from.version()))
                .cloned())
        })?;

        let history = state.groups.entry(draft.name().to_string()).or_default();
        history.versions.push(record);
        history.retired = false;
        state.mutations += 1;

        debug!(group = %draft.name(), version = next, "stored new version");
        Ok(next)
    }

    fn link(
        &self,
        name: &str,
        version: Version,
        namespace: &str,
        labels: &Labels,
    ) -> Result<String> {
        validate_group_name(name)?;
        validate_namespace(namespace)?;
        let mut state = self.state("link", name)?;

        if state.groups.get(name).and_then(|h| h.get(version)).is_none() {
            return Err(GroupError::VersionNotFound {
                name: name.to_string(),
                version,
            }
            .into());
        }

        let versioned_name = VersionedName::new(name, version);
        let key = (namespace.to_string(), name.to_string());
        if let Some(existing) = state.links.get(&key) {
            if existing.versioned_name == versioned_name && &existing.labels == labels {
                return Ok(versioned_name.to_string());
            }
        }

        state.links.insert(
            key,
            SyncedEnvironmentGroup {
                namespace: namespace.to_string(),
                versioned_name: versioned_name.clone(),
                linked_at: Utc::now(),
                labels: labels.clone(),
            },
        );
        state.mutations += 1;

        Ok(versioned_name.to_string())
    }

    fn links(&self, namespace: &str) -> Result<Vec<SyncedEnvironmentGroup>> {
        let state = self.state("links", namespace)?;
        Ok(state
            .links
            .iter()
            .filter(|((ns, _), _)| ns == namespace)
            .map(|(_, link)| link.clone())
            .collect())
    }

    fn linked_namespaces(&self, name: &str) -> Result<Vec<Namespace>> {
        let state = self.state("linked_namespaces", name)?;
        let mut namespaces: Vec<_> = state
            .links
            .keys()
            .filter(|(_, group)| group == name)
            .map(|(ns, _)| ns.clone())
            .collect();
        namespaces.sort();
        Ok(namespaces)
    }

    fn unlink(&self, namespace: &str, name: &str) -> Result<bool> {
        let mut state = self.state("unlink", name)?;
        let removed = state
            .links
            .remove(&(namespace.to_string(), name.to_string()))
            .is_some();
        if removed {
            state.mutations += 1;
        }
        Ok(removed)
    }

    fn retire(&self, name: &str) -> Result<bool> {
        let mut state = self.state("retire", name)?;
        let Some(history) = state.groups.get_mut(name) else {
            return Ok(false);
        };
        if history.retired || history.versions.is_empty() {
            return Ok(false);
        }
        history.retired = true;
        state.mutations += 1;
        Ok(true)
    }
}
