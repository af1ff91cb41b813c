//! Tests for `sync`, `links` and `deploy`.

use crate::support::*;

#[test]
fn test_sync_links_latest() {
    let t = Test::init();
    assert_success(&t.put("db", &["A=1"], &[]));
    assert_success(&t.put("cache", &["A=1"], &[]));
    assert_success(&t.put("cache", &["A=2"], &[]));

    let output = t.sync(&["db", "cache"], "team-a");
    assert_success(&output);
    assert_stdout_contains(&output, "db.1 linked into team-a");
    assert_stdout_contains(&output, "cache.2 linked into team-a");

    let links = t.links_json("team-a");
    let names: Vec<_> = links
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["versioned_name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["cache.2", "db.1"]);
}

#[test]
fn test_sync_missing_group_links_nothing() {
    let t = Test::init();
    assert_success(&t.put("db", &["A=1"], &[]));

    let output = t.sync(&["db", "ghost"], "team-a");
    assert_failure(&output);
    assert_stderr_contains(&output, "sync of group 'ghost' failed");

    assert!(t.links_json("team-a").as_array().unwrap().is_empty());
}

#[test]
fn test_links_text_output() {
    let t = Test::init();

    let output = t.run(&["links", "--namespace", "empty-ns"]);
    assert_stdout_contains(&output, "nothing linked into empty-ns");

    assert_success(&t.put("db", &["A=1"], &[]));
    assert_success(&t.sync(&["db"], "team-a"));
    let output = t.run(&["links", "--namespace", "team-a"]);
    assert_stdout_contains(&output, "db.1");
}

#[test]
fn test_deploy_reconciles_app() {
    let t = Test::init();
    assert_success(&t.put("shared", &["URL=postgres"], &[]));

    let args = [
        "deploy", "checkout", "--target", "prod", "--namespace", "checkout-prod", "--group",
        "shared", "--var", "PORT=8080", "--json",
    ];
    let output = t.run(&args);
    assert_success(&output);
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(result["created"], true);
    assert_eq!(result["env_groups"][0]["name"], "shared");
    let default = result["default_group"]["name"].as_str().unwrap().to_string();
    assert!(default.starts_with(&format!("checkout-{}-", commands::TEST_CLUSTER)));
    assert_eq!(result["env_groups"][1]["name"], default.as_str());

    let output = t.run(&args);
    let again: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(again["created"], false);
    assert_eq!(again["default_group"]["version"], 1);

    assert_eq!(t.links_json("checkout-prod").as_array().unwrap().len(), 2);
}
