//! Assertions over `envgroup` process output.

use std::process::Output;

/// Assert the command exited 0, showing both streams if it did not.
///
/// Example: `assert_success(&t.put("api", &["A=1"], &[]))`
pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "envgroup exited with {:?}\nstdout: {}\nstderr: {}",
        output.status.code(),
        stdout(output),
        stderr(output)
    );
}

/// Assert the command exited non-zero.
pub fn assert_failure(output: &Output) {
    assert!(
        !output.status.success(),
        "envgroup unexpectedly succeeded\nstdout: {}",
        stdout(output)
    );
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Assert stdout mentions `expected`, e.g. `"created db-creds.2"`.
pub fn assert_stdout_contains(output: &Output, expected: &str) {
    let out = stdout(output);
    assert!(out.contains(expected), "stdout missing {expected:?}, got: {out}");
}

/// Assert stderr mentions `expected`.
///
/// Errors and their `→` hints both go to stderr.
pub fn assert_stderr_contains(output: &Output, expected: &str) {
    let err = stderr(output);
    assert!(err.contains(expected), "stderr missing {expected:?}, got: {err}");
}

/// Assert a real secret value appears on neither stream.
pub fn assert_secret_hidden(output: &Output, secret: &str) {
    let out = stdout(output);
    let err = stderr(output);
    assert!(!out.contains(secret), "secret {secret:?} leaked to stdout: {out}");
    assert!(!err.contains(secret), "secret {secret:?} leaked to stderr: {err}");
}
