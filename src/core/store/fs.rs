//! Filesystem-based store implementation.
//!
//! Layout under the store root:
//!
//! ```text
//! groups/<name>/<version>.toml     immutable snapshots
//! groups/<name>/LATEST             hint, rolled forward on read
//! groups/<name>/RETIRED            version the group was retired at
//! namespaces/<ns>/<name>.toml      link to the active version
//! ```
//!
//! A version is claimed by hard-linking a fully written temporary file to
//! its final name. The link fails if the name exists, so two writers can
//! never both claim the same version. Once claimed, the version is
//! committed; the hint and marker are bookkeeping that readers can recover
//! from. A marker only hides versions up to the one it records.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tracing::{debug, warn};

use super::{materialize, Record, VersionedStore};
use crate::core::domain::{EnvironmentGroup, GroupDraft, SyncedEnvironmentGroup, VersionedName};
use crate::core::types::{GroupName, Labels, Namespace, Version};
use crate::core::validation::{validate_group_name, validate_namespace};
use crate::error::{GroupError, Result, StoreError};

const LATEST_FILE: &str = "LATEST";
const RETIRED_FILE: &str = "RETIRED";
const SNAPSHOT_EXT: &str = "toml";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Store rooted at a directory.
#[derive(Debug, Clone)]
pub struct Filesystem {
    root: PathBuf,
}

impl Filesystem {
    /// Open (or lazily create) a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn groups_dir(&self) -> PathBuf {
        self.root.join("groups")
    }

    fn group_dir(&self, name: &str) -> PathBuf {
        self.groups_dir().join(name)
    }

    fn snapshot_path(&self, name: &str, version: Version) -> PathBuf {
        self.group_dir(name)
            .join(format!("{}.{}", version, SNAPSHOT_EXT))
    }

    fn namespaces_dir(&self) -> PathBuf {
        self.root.join("namespaces")
    }

    fn link_path(&self, namespace: &str, name: &str) -> PathBuf {
        self.namespaces_dir()
            .join(namespace)
            .join(format!("{}.{}", name, SNAPSHOT_EXT))
    }

    /// Whether the group is retired, given its highest claimed version.
    fn is_retired(&self, name: &str, max: Option<Version>) -> Result<bool> {
        let marker = self.group_dir(name).join(RETIRED_FILE);
        let retired_at = match fs::read_to_string(&marker) {
            Ok(raw) => raw.trim().parse::<Version>().map_err(|e| {
                StoreError::corrupt(marker.display().to_string(), e.to_string())
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(unavailable_at("retired", &marker, e).into()),
        };
        Ok(max.map_or(true, |max| retired_at >= max))
    }

    /// Highest claimed version, regardless of retirement.
    ///
    /// Starts from the `LATEST` hint and walks forward past any snapshot a
    /// writer claimed before updating the hint.
    fn max_version(&self, name: &str) -> Result<Option<Version>> {
        let dir = self.group_dir(name);
        if !dir.exists() {
            return Ok(None);
        }

        let hint_path = dir.join(LATEST_FILE);
        let mut max = match fs::read_to_string(&hint_path) {
            Ok(raw) => raw.trim().parse::<Version>().map_err(|e| {
                StoreError::corrupt(hint_path.display().to_string(), e.to_string())
            })?,
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    warn!(path = %hint_path.display(), error = %e, "unreadable latest hint, scanning");
                }
                self.scan_versions(name)?.last().copied().unwrap_or(0)
            }
        };

        while self.snapshot_path(name, max + 1).exists() {
            max += 1;
        }

        if max > 0 && !self.snapshot_path(name, max).exists() {
            return Err(StoreError::corrupt(
                hint_path.display().to_string(),
                format!("points at missing version {}", max),
            )
            .into());
        }

        Ok((max > 0).then_some(max))
    }

    /// Every snapshot version on disk, ascending.
    fn scan_versions(&self, name: &str) -> Result<Vec<Version>> {
        let dir = self.group_dir(name);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::unavailable("versions", name, e).into()),
        };

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::unavailable("versions", name, e))?;
            let file_name = entry.file_name().to_string_lossy().to_string();
            if file_name == LATEST_FILE || file_name == RETIRED_FILE || file_name.starts_with('.') {
                continue;
            }

            let version = file_name
                .strip_suffix(&format!(".{}", SNAPSHOT_EXT))
                .and_then(|stem| stem.parse::<Version>().ok())
                .filter(|v| *v > 0)
                .ok_or_else(|| {
                    StoreError::corrupt(
                        entry.path().display().to_string(),
                        "not a version snapshot",
                    )
                })?;
            versions.push(version);
        }
        versions.sort_unstable();

        for (index, version) in versions.iter().enumerate() {
            if *version != index as Version + 1 {
                return Err(StoreError::corrupt(
                    dir.display().to_string(),
                    format!("history has a gap before version {}", version),
                )
                .into());
            }
        }

        Ok(versions)
    }

    fn read_record(&self, name: &str, version: Version) -> Result<Option<Record>> {
        let path = self.snapshot_path(name, version);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::unavailable("read", name, e).into()),
        };

        let record: Record = toml::from_str(&contents)
            .map_err(|e| StoreError::corrupt(path.display().to_string(), e.to_string()))?;

        if record.name != name || record.version != version {
            return Err(StoreError::corrupt(
                path.display().to_string(),
                format!("holds {}.{}", record.name, record.version),
            )
            .into());
        }

        Ok(Some(record))
    }

    fn read_link(&self, path: &Path) -> Result<SyncedEnvironmentGroup> {
        let contents = fs::read_to_string(path)
            .map_err(|e| StoreError::unavailable("links", path.display().to_string(), e))?;
        toml::from_str(&contents)
            .map_err(|e| StoreError::corrupt(path.display().to_string(), e.to_string()).into())
    }

    /// Replace `path` atomically with `contents`.
    fn replace(&self, op: &'static str, path: &Path, contents: &str) -> Result<()> {
        let tmp = write_temp(path, contents).map_err(|e| unavailable_at(op, path, e))?;
        fs::rename(&tmp, path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            unavailable_at(op, path, e)
        })?;
        Ok(())
    }
}

fn unavailable_at(op: &'static str, path: &Path, e: std::io::Error) -> StoreError {
    StoreError::unavailable(op, path.display().to_string(), e)
}

/// Write `contents` to a hidden sibling of `path` and return its path.
///
/// Written with 0600 permissions on Unix, since snapshots hold secrets.
fn write_temp(path: &Path, contents: &str) -> std::io::Result<PathBuf> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp = dir.join(format!(
        ".{}.{}.{}.{}.tmp",
        file_name,
        std::process::id(),
        nanos,
        seq
    ));

    let mut options = fs::OpenOptions::new();
    options.create_new(true).write(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(&tmp)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;

    Ok(tmp)
}

impl VersionedStore for Filesystem {
    fn latest(&self, name: &str) -> Result<Option<EnvironmentGroup>> {
        validate_group_name(name)?;
        debug!(group = name, "reading latest version");

        let Some(version) = self.max_version(name)? else {
            return Ok(None);
        };
        if self.is_retired(name, Some(version))? {
            return Ok(None);
        }

        match self.read_record(name, version)? {
            Some(record) => Ok(Some(record.to_group())),
            None => Err(StoreError::corrupt(
                self.snapshot_path(name, version).display().to_string(),
                "latest snapshot vanished",
            )
            .into()),
        }
    }

    fn version(&self, name: &str, version: Version) -> Result<Option<EnvironmentGroup>> {
        validate_group_name(name)?;
        if version == 0 {
            return Ok(None);
        }
        Ok(self.read_record(name, version)?.map(|r| r.to_group()))
    }

    fn versions(&self, name: &str) -> Result<Vec<Version>> {
        validate_group_name(name)?;
        self.scan_versions(name)
    }

    fn names(&self) -> Result<Vec<GroupName>> {
        let dir = self.groups_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(unavailable_at("names", &dir, e).into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| unavailable_at("names", &dir, e))?;
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if validate_group_name(&name).is_err() {
                warn!(path = %entry.path().display(), "skipping unexpected directory in store");
                continue;
            }
            let max = self.max_version(&name)?;
            if max.is_some() && !self.is_retired(&name, max)? {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn put_new_version(&self, draft: &GroupDraft, labels: &Labels) -> Result<Version> {
        let name = draft.name();
        validate_group_name(name)?;

        let max = self.max_version(name)?;
        let current = if self.is_retired(name, max)? { None } else { max };
        if current != draft.expected_latest() {
            return Err(StoreError::conflict(name, draft.expected_latest(), current).into());
        }

        let next = max.unwrap_or(0) + 1;
        let record = materialize(draft, next, labels, |from| {
            self.read_record(from.name(), from.version())
        })?;
        let contents = toml::to_string(&record)
            .map_err(|e| StoreError::corrupt(format!("{}.{}", name, next), e.to_string()))?;

        let path = self.snapshot_path(name, next);
        let tmp = write_temp(&path, &contents).map_err(|e| unavailable_at("put_new_version", &path, e))?;
        let claimed = fs::hard_link(&tmp, &path);
        let _ = fs::remove_file(&tmp);
        match claimed {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StoreError::conflict(name, draft.expected_latest(), Some(next)).into());
            }
            Err(e) => return Err(unavailable_at("put_new_version", &path, e).into()),
        }

        let hint = self.group_dir(name).join(LATEST_FILE);
        if let Err(e) = self.replace("put_new_version", &hint, &next.to_string()) {
            warn!(group = name, version = next, error = %e, "stored version but could not update latest hint");
        }

        let retired = self.group_dir(name).join(RETIRED_FILE);
        match fs::remove_file(&retired) {
            Ok(()) => debug!(group = name, "revived retired group"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %retired.display(), error = %e, "could not remove stale retired marker");
            }
        }

        debug!(group = name, version = next, "stored new version");
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

        if version == 0 || !self.snapshot_path(name, version).exists() {
            return Err(GroupError::VersionNotFound {
                name: name.to_string(),
                version,
            }
            .into());
        }

        let versioned_name = VersionedName::new(name, version);
        let path = self.link_path(namespace, name);
        if path.exists() {
            let existing = self.read_link(&path)?;
            if existing.versioned_name == versioned_name && &existing.labels == labels {
                return Ok(versioned_name.to_string());
            }
        }

        let link = SyncedEnvironmentGroup {
            namespace: namespace.to_string(),
            versioned_name: versioned_name.clone(),
            linked_at: Utc::now(),
            labels: labels.clone(),
        };
        let contents = toml::to_string(&link)
            .map_err(|e| StoreError::corrupt(path.display().to_string(), e.to_string()))?;
        self.replace("link", &path, &contents)?;

        Ok(versioned_name.to_string())
    }

    fn links(&self, namespace: &str) -> Result<Vec<SyncedEnvironmentGroup>> {
        validate_namespace(namespace)?;
        let dir = self.namespaces_dir().join(namespace);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(unavailable_at("links", &dir, e).into()),
        };

        let mut links = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| unavailable_at("links", &dir, e))?;
            let path = entry.path();
            let file_name = entry.file_name().to_string_lossy().to_string();
            if file_name.starts_with('.') {
                continue;
            }

            let link = self.read_link(&path)?;
            let expected = format!("{}.{}", link.base_name(), SNAPSHOT_EXT);
            if file_name != expected || link.namespace != namespace {
                return Err(StoreError::corrupt(
                    path.display().to_string(),
                    format!("holds link for {} in {}", link.versioned_name, link.namespace),
                )
                .into());
            }
            links.push(link);
        }
        links.sort_by(|a, b| a.base_name().cmp(b.base_name()));
        Ok(links)
    }

    fn linked_namespaces(&self, name: &str) -> Result<Vec<Namespace>> {
        validate_group_name(name)?;
        let dir = self.namespaces_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(unavailable_at("linked_namespaces", &dir, e).into()),
        };

        let mut namespaces = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| unavailable_at("linked_namespaces", &dir, e))?;
            let namespace = entry.file_name().to_string_lossy().to_string();
            if self.link_path(&namespace, name).exists() {
                namespaces.push(namespace);
            }
        }
        namespaces.sort();
        Ok(namespaces)
    }

    fn unlink(&self, namespace: &str, name: &str) -> Result<bool> {
        validate_group_name(name)?;
        validate_namespace(namespace)?;
        let path = self.link_path(namespace, name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(unavailable_at("unlink", &path, e).into()),
        }
    }

    fn retire(&self, name: &str) -> Result<bool> {
        validate_group_name(name)?;
        let Some(max) = self.max_version(name)? else {
            return Ok(false);
        };
        if self.is_retired(name, Some(max))? {
            return Ok(false);
        }

        let marker = self.group_dir(name).join(RETIRED_FILE);
        self.replace("retire", &marker, &max.to_string())?;
        debug!(group = name, version = max, "retired group");
        Ok(true)
    }
}
