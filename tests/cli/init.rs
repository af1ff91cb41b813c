//! Tests for `envgroup init`.

use crate::support::*;
use std::fs;

#[test]
fn test_init_writes_config() {
    let t = Test::new();

    let output = t.init_cmd();
    assert_success(&output);
    assert_stdout_contains(&output, "initialized");

    let contents = fs::read_to_string(t.dir.path().join("envgroup.toml")).unwrap();
    assert!(contents.contains("[cluster]"));
    assert!(contents.contains(&format!("id = {}", commands::TEST_CLUSTER)));
    assert!(contents.contains("filesystem"));
}

#[test]
fn test_init_twice_fails() {
    let t = Test::init();

    let output = t.init_cmd();
    assert_failure(&output);
    assert_stderr_contains(&output, "already initialized");
}

#[test]
fn test_init_rejects_cluster_zero() {
    let t = Test::new();

    let output = t.run(&["init", "--cluster", "0"]);
    assert_failure(&output);
    assert!(!t.dir.path().join("envgroup.toml").exists());
}

#[test]
fn test_store_defaults_under_home() {
    let t = Test::init();
    assert_success(&t.put("api", &["A=1"], &[]));

    assert!(t.store_root().join("groups/api/1.toml").exists());
}

#[test]
fn test_store_env_override() {
    let t = Test::init();
    let elsewhere = tempfile::TempDir::new().unwrap();

    let output = t
        .cmd()
        .env("ENVGROUP_STORE", elsewhere.path())
        .args(["put", "api", "--var", "A=1"])
        .output()
        .unwrap();
    assert_success(&output);

    assert!(elsewhere.path().join("groups/api/1.toml").exists());
    assert!(!t.store_root().join("groups/api").exists());
}

#[test]
fn test_config_env_override() {
    let t = Test::new();
    let config = t.home.path().join("custom.toml");

    let output = t
        .cmd()
        .env("ENVGROUP_CONFIG", &config)
        .args(["init", "--cluster", "9"])
        .output()
        .unwrap();
    assert_success(&output);

    assert!(config.exists());
    assert!(!t.dir.path().join("envgroup.toml").exists());
}
