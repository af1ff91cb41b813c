//! Store doubles for fault injection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use envgroup::core::domain::{EnvironmentGroup, GroupDraft, SyncedEnvironmentGroup};
use envgroup::core::store::{Memory, VersionedStore};
use envgroup::core::types::{GroupName, Labels, Namespace, Version};
use envgroup::error::{Error, Result, StoreError};

/// Memory store whose `latest` and `link` can be scripted to fail or
/// misbehave.
#[derive(Default)]
pub struct ScriptedStore {
    pub inner: Memory,
    fail_latest_for: Mutex<Option<String>>,
    fail_link_for: Mutex<Option<String>>,
    link_answer: Mutex<Option<String>>,
    link_calls: AtomicUsize,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `latest` lookup of `name` fail with an unavailable backend.
    pub fn fail_lookups_for(&self, name: &str) {
        *self.fail_latest_for.lock().unwrap() = Some(name.to_string());
    }

    /// Make every `link` of `name` fail with an unavailable backend.
    pub fn fail_links_for(&self, name: &str) {
        *self.fail_link_for.lock().unwrap() = Some(name.to_string());
    }

    /// Make `link` answer `answer` instead of the real versioned name.
    pub fn answer_links_with(&self, answer: &str) {
        *self.link_answer.lock().unwrap() = Some(answer.to_string());
    }

    /// Number of `link` calls that reached the store.
    pub fn link_calls(&self) -> usize {
        self.link_calls.load(Ordering::SeqCst)
    }
}

impl VersionedStore for ScriptedStore {
    fn latest(&self, name: &str) -> Result<Option<EnvironmentGroup>> {
        if self.fail_latest_for.lock().unwrap().as_deref() == Some(name) {
            return Err(injected("latest", name));
        }
        self.inner.latest(name)
    }

    fn version(&self, name: &str, version: Version) -> Result<Option<EnvironmentGroup>> {
        self.inner.version(name, version)
    }

    fn versions(&self, name: &str) -> Result<Vec<Version>> {
        self.inner.versions(name)
    }

    fn names(&self) -> Result<Vec<GroupName>> {
        self.inner.names()
    }

    fn put_new_version(&self, draft: &GroupDraft, labels: &Labels) -> Result<Version> {
        self.inner.put_new_version(draft, labels)
    }

    fn link(&self, name: &str, version: Version, namespace: &str, labels: &Labels) -> Result<String> {
        self.link_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_link_for.lock().unwrap().as_deref() == Some(name) {
            return Err(injected("link", name));
        }

        let linked = self.inner.link(name, version, namespace, labels)?;
        Ok(self.link_answer.lock().unwrap().clone().unwrap_or(linked))
    }

    fn links(&self, namespace: &str) -> Result<Vec<SyncedEnvironmentGroup>> {
        self.inner.links(namespace)
    }

    fn linked_namespaces(&self, name: &str) -> Result<Vec<Namespace>> {
        self.inner.linked_namespaces(name)
    }

    fn unlink(&self, namespace: &str, name: &str) -> Result<bool> {
        self.inner.unlink(namespace, name)
    }

    fn retire(&self, name: &str) -> Result<bool> {
        self.inner.retire(name)
    }
}

fn injected(op: &'static str, name: &str) -> Error {
    StoreError::Unavailable {
        op,
        target: name.to_string(),
        source: std::io::Error::other("injected failure"),
    }
    .into()
}
