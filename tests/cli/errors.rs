//! Error output tests.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_uninitialized_hints_init() {
    let t = Test::new();

    let output = t.run(&["list"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "not initialized");
    assert_stderr_contains(&output, "envgroup init");
}

#[test]
fn test_invalid_group_name() {
    let t = Test::init();

    let output = t.put("db.v2", &["A=1"], &[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid group name");
}

#[test]
fn test_malformed_assignment() {
    let t = Test::init();

    let output = t.put("db", &["no-equals-sign"], &[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "expected KEY=VALUE");
}

#[test]
fn test_missing_version() {
    let t = Test::init();
    assert_success(&t.put("db", &["A=1"], &[]));

    let output = t.run(&["show", "db", "--version", "5"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "no version 5");
}

#[test]
fn test_completions_generate() {
    let t = Test::new();

    t.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("envgroup"));
}

#[test]
fn test_missing_namespace_rejected_by_parser() {
    let t = Test::init();

    t.cmd()
        .args(["sync", "db"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--namespace"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let t = Test::init();

    t.cmd()
        .args(["--verbose", "put", "api", "--var", "A=1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created api.1"))
        .stderr(predicate::str::contains("created environment group version"));
}
