//! Constants used throughout envgroup.
//!
//! Centralizes magic strings and label keys.

/// Configuration file name (envgroup.toml).
pub const CONFIG_FILE: &str = "envgroup.toml";

/// Store directory relative to HOME (~/.envgroup/store).
pub const STORE_DIR: &str = ".envgroup/store";

/// Placeholder returned in place of every real secret value on read.
///
/// Callers echo it back to mean "leave this secret as it is".
pub const SECRET_SENTINEL: &str = "********";

/// Separator between a group name and its version in a versioned name.
pub const VERSION_SEPARATOR: char = '.';

/// Longest accepted group name.
pub const MAX_NAME_LEN: usize = 253;

/// Label recording which app owns a group or link.
pub const LABEL_APP_NAME: &str = "envgroup.dev/app-name";

/// Label recording the deployment target a group or link belongs to.
pub const LABEL_DEPLOYMENT_TARGET_ID: &str = "envgroup.dev/deployment-target-id";

/// Label marking an app's default environment group.
pub const LABEL_DEFAULT_APP_ENVIRONMENT: &str = "envgroup.dev/default-app-environment";

/// Label marking objects written by envgroup itself.
pub const LABEL_MANAGED: &str = "envgroup.dev/managed";
