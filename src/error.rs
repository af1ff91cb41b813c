//! Error types.
//!
//! One enum per concern, folded into [`Error`] so call sites can use `?`
//! throughout. The core never renders messages for end users; the CLI does.

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Group(#[from] GroupError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A single group failed inside a batch sync. Nothing is reported as
    /// applied.
    #[error("sync of group '{group}' failed: {source}")]
    Batch {
        group: String,
        #[source]
        source: Box<Error>,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl Error {
    /// Wrap an error as the failure of one group inside a batch.
    pub fn batch(group: impl Into<String>, source: Error) -> Self {
        Error::Batch {
            group: group.into(),
            source: Box::new(source),
        }
    }

    /// Whether this is the expected "nothing there yet" outcome.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Group(GroupError::NotFound(_)) => true,
            Error::Batch { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// Whether retrying the same call may succeed.
    ///
    /// Backend faults and lost version races are retryable; validation and
    /// corruption are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Store(StoreError::Unavailable { .. }) => true,
            Error::Store(StoreError::Conflict { .. }) => true,
            Error::Batch { source, .. } => source.is_retryable(),
            _ => false,
        }
    }
}

/// Errors about groups and their versions.
#[derive(Error, Debug)]
pub enum GroupError {
    #[error("environment group not found: {0}")]
    NotFound(String),

    #[error("environment group {name} has no version {version}")]
    VersionNotFound { name: String, version: u64 },

    #[error("malformed versioned name '{value}': {reason}")]
    MalformedVersionedName { value: String, reason: String },

    #[error("environment group {name} is still linked in: {}", .namespaces.join(", "))]
    InUse {
        name: String,
        namespaces: Vec<String>,
    },
}

impl GroupError {
    pub(crate) fn malformed(value: &str, reason: impl Into<String>) -> Self {
        GroupError::MalformedVersionedName {
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Caller contract violations. Never retried.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("invalid {field} '{value}': {reason}")]
    InvalidName {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid assignment '{0}': expected KEY=VALUE")]
    InvalidAssignment(String),
}

/// Versioned object store failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unavailable during {op} on {target}: {source}")]
    Unavailable {
        op: &'static str,
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("version conflict on {name}: expected latest {expected}, found {actual}")]
    Conflict {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("corrupt store data at {target}: {reason}")]
    Corrupt { target: String, reason: String },

    #[error("secret {key} cannot be inherited from {from}")]
    UnresolvedSecret { key: String, from: String },
}

impl StoreError {
    pub(crate) fn unavailable(
        op: &'static str,
        target: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        StoreError::Unavailable {
            op,
            target: target.into(),
            source,
        }
    }

    pub(crate) fn corrupt(target: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::Corrupt {
            target: target.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn conflict(name: &str, expected: Option<u64>, actual: Option<u64>) -> Self {
        let show = |v: Option<u64>| v.map_or_else(|| "none".to_string(), |v| v.to_string());
        StoreError::Conflict {
            name: name.to_string(),
            expected: show(expected),
            actual: show(actual),
        }
    }
}

/// Configuration file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("not initialized: run `envgroup init` first")]
    NotInitialized,

    #[error("already initialized: envgroup.toml exists")]
    AlreadyInitialized,

    #[error("failed to read config: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("missing required config field: {field}")]
    MissingField { field: &'static str },

    #[error("cannot determine a store location: {0}")]
    NoStorePath(String),
}

pub type Result<T> = std::result::Result<T, Error>;
