//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

use std::collections::BTreeMap;

/// An environment group name (e.g., `db-creds`).
///
/// Never contains the version separator.
pub type GroupName = String;

/// A target namespace groups are synced into.
pub type Namespace = String;

/// A version number. Persisted versions start at 1.
pub type Version = u64;

/// Key/value configuration entries, ordered by key.
pub type Variables = BTreeMap<String, String>;

/// Opaque metadata attached to written versions and links.
pub type Labels = BTreeMap<String, String>;
