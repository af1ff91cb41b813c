//! Test support utilities for envgroup integration tests.
//!
//! Provides isolated CLI environments, in-process store doubles and shared
//! fixtures.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod doubles;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use doubles::*;
#[allow(unused_imports)]
pub use fixtures::*;

use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// Each test gets its own working dir (holding `envgroup.toml`) and home
/// dir (holding the default store). Child processes use `.current_dir()`,
/// so tests can run in parallel.
pub struct Test {
    /// Working directory for the CLI
    pub dir: TempDir,
    /// Temporary home directory
    pub home: TempDir,
}

impl Test {
    /// Create a new, uninitialized environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");

        Self { dir, home }
    }

    /// Create an environment with `envgroup init` already run.
    pub fn init() -> Self {
        let t = Self::new();
        let output = t.init_cmd();
        assert!(
            output.status.success(),
            "Failed to initialize: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        t
    }

    /// Default store root under the temporary home.
    pub fn store_root(&self) -> std::path::PathBuf {
        self.home.path().join(".envgroup/store")
    }
}
