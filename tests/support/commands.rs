//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

/// Cluster id every test environment is initialized with.
pub const TEST_CLUSTER: u64 = 7;

impl Test {
    /// Create an envgroup command isolated to this environment.
    ///
    /// Returns a Command configured with:
    /// - HOME set to the temporary home directory
    /// - Current directory set to the test working directory
    /// - No inherited ENVGROUP_* overrides, colors off
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("envgroup").expect("failed to find envgroup binary");
        cmd.env("HOME", self.home.path());
        cmd.env("USERPROFILE", self.home.path());
        cmd.env_remove("ENVGROUP_STORE");
        cmd.env_remove("ENVGROUP_CONFIG");
        cmd.env_remove("ENVGROUP_LOG");
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Run envgroup with `args`.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run envgroup")
    }

    /// Shortcut for `envgroup init`.
    pub fn init_cmd(&self) -> Output {
        let cluster = TEST_CLUSTER.to_string();
        self.run(&["init", "--cluster", &cluster])
    }

    /// Shortcut for `envgroup put NAME --var K=V ... --secret K=V ...`.
    pub fn put(&self, name: &str, vars: &[&str], secrets: &[&str]) -> Output {
        let mut args = vec!["put", name];
        for var in vars {
            args.extend(["--var", *var]);
        }
        for secret in secrets {
            args.extend(["--secret", *secret]);
        }
        self.run(&args)
    }

    /// Shortcut for `envgroup show NAME --json`, parsed.
    pub fn show_json(&self, name: &str) -> serde_json::Value {
        let output = self.run(&["show", name, "--json"]);
        super::assert_success(&output);
        serde_json::from_slice(&output.stdout).expect("show --json printed invalid JSON")
    }

    /// Shortcut for `envgroup sync NAMES... --namespace NS`.
    pub fn sync(&self, names: &[&str], namespace: &str) -> Output {
        let mut args = vec!["sync"];
        args.extend(names);
        args.extend(["--namespace", namespace]);
        self.run(&args)
    }

    /// Shortcut for `envgroup links --namespace NS --json`, parsed.
    pub fn links_json(&self, namespace: &str) -> serde_json::Value {
        let output = self.run(&["links", "--namespace", namespace, "--json"]);
        super::assert_success(&output);
        serde_json::from_slice(&output.stdout).expect("links --json printed invalid JSON")
    }
}
