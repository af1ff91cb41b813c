//! Tests for `envgroup retire`.

use crate::support::*;

#[test]
fn test_retire_refused_while_linked() {
    let t = Test::init();
    assert_success(&t.put("db", &["A=1"], &[]));
    assert_success(&t.sync(&["db"], "team-a"));

    let output = t.run(&["retire", "db", "--yes"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "still linked in: team-a");
    assert_stderr_contains(&output, "--force");
}

#[test]
fn test_retire_force_unlinks_and_keeps_history() {
    let t = Test::init();
    assert_success(&t.put("db", &["A=1"], &[]));
    assert_success(&t.sync(&["db"], "team-a"));

    let output = t.run(&["retire", "db", "--force", "--yes"]);
    assert_success(&output);
    assert_stdout_contains(&output, "unlinked from team-a");
    assert_stdout_contains(&output, "retired db");

    assert_failure(&t.run(&["show", "db"]));
    assert_success(&t.run(&["show", "db", "--version", "1"]));
    assert_success(&t.run(&["history", "db"]));
    assert!(t.links_json("team-a").as_array().unwrap().is_empty());

    // Revival continues numbering.
    let output = t.put("db", &["A=1"], &[]);
    assert_stdout_contains(&output, "created db.2");
}

#[test]
fn test_retire_unknown_group() {
    let t = Test::init();

    let output = t.run(&["retire", "ghost", "--yes"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "not found");
}
