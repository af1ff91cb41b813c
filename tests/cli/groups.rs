//! Tests for `put`, `show`, `history` and `list`.

use crate::support::*;

#[test]
fn test_put_creates_then_detects_noop() {
    let t = Test::init();

    let output = t.put(DB_CREDS, &["HOST=x"], &[]);
    assert_success(&output);
    assert_stdout_contains(&output, "created db-creds.1");

    let output = t.put(DB_CREDS, &["HOST=x"], &[]);
    assert_success(&output);
    assert_stdout_contains(&output, "no changes, db-creds.1 is current");

    let output = t.put(DB_CREDS, &["HOST=x", "PORT=5432"], &[]);
    assert_stdout_contains(&output, "created db-creds.2");
}

#[test]
fn test_show_masks_secrets() {
    let t = Test::init();
    assert_success(&t.put(DB_CREDS, &["HOST=x"], &["PASSWORD=s3cr3t"]));

    let shown = t.show_json(DB_CREDS);
    assert_eq!(shown["version"], 1);
    assert_eq!(shown["variables"]["HOST"], "x");
    assert_eq!(shown["secret_variables"]["PASSWORD"], SECRET_SENTINEL);

    let output = t.run(&["show", DB_CREDS]);
    assert_success(&output);
    assert_secret_hidden(&output, "s3cr3t");

    let output = t.run(&["show", DB_CREDS, "--json"]);
    assert_secret_hidden(&output, "s3cr3t");
}

#[test]
fn test_echoed_sentinel_keeps_secret() {
    let t = Test::init();
    assert_success(&t.put(DB_CREDS, &["HOST=x"], &["PASSWORD=s3cr3t"]));

    let sentinel = format!("PASSWORD={}", SECRET_SENTINEL);
    let output = t.put(DB_CREDS, &["HOST=x"], &[sentinel.as_str()]);
    assert_stdout_contains(&output, "no changes");

    let output = t.put(DB_CREDS, &["HOST=y"], &[sentinel.as_str()]);
    assert_stdout_contains(&output, "created db-creds.2");

    // The real value is carried into the new snapshot on disk.
    let snapshot = std::fs::read_to_string(t.store_root().join("groups/db-creds/2.toml")).unwrap();
    assert!(snapshot.contains("s3cr3t"));
}

#[test]
fn test_put_hard_removes_keys() {
    let t = Test::init();
    assert_success(&t.put("api", &["A=1", "B=2"], &[]));

    let output = t.run(&["put", "api", "--var", "A=1", "--hard"]);
    assert_stdout_contains(&output, "created api.2");

    let shown = t.show_json("api");
    assert!(shown["variables"].get("B").is_none());
}

#[test]
fn test_dry_run_lists_changes_without_writing() {
    let t = Test::init();
    assert_success(&t.put("api", &["A=1", "B=2"], &[]));

    let output = t.run(&[
        "put", "api", "--var", "A=9", "--var", "C=3", "--secret", "S=x", "--hard", "--dry-run",
    ]);
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("~ A"), "got: {out}");
    assert!(out.contains("+ C"), "got: {out}");
    assert!(out.contains("- B"), "got: {out}");
    assert!(out.contains("+ S (secret)"), "got: {out}");
    assert!(!out.contains("x\n"));

    assert_eq!(t.show_json("api")["version"], 1);
}

#[test]
fn test_show_specific_version_and_history() {
    let t = Test::init();
    assert_success(&t.put("api", &["A=1"], &[]));
    assert_success(&t.put("api", &["A=2"], &[]));

    let output = t.run(&["show", "api", "--version", "1", "--json"]);
    assert_success(&output);
    let v1: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v1["variables"]["A"], "1");

    let output = t.run(&["history", "api", "--json"]);
    assert_success(&output);
    let history: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(history.as_array().unwrap().len(), 2);

    let output = t.run(&["history", "api"]);
    assert_stdout_contains(&output, "2 versions of api");
}

#[test]
fn test_list_groups() {
    let t = Test::init();

    let output = t.run(&["list"]);
    assert_stdout_contains(&output, "no environment groups");

    assert_success(&t.put("api", &["A=1"], &[]));
    assert_success(&t.put("worker", &["A=1"], &[]));
    assert_success(&t.put("worker", &["A=2"], &[]));

    let output = t.run(&["list", "--json"]);
    assert_success(&output);
    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed["count"], 2);
    assert_eq!(listed["groups"][0]["name"], "api");
    assert_eq!(listed["groups"][1]["latest"], 2);
}

#[test]
fn test_put_labels_recorded() {
    let t = Test::init();
    let output = t.run(&["put", "api", "--var", "A=1", "--label", "team=payments"]);
    assert_success(&output);

    assert_eq!(t.show_json("api")["labels"]["team"], "payments");
}
