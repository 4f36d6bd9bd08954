//! CLI surface tests: flags, version and changelog output, non-tty refusal.

use assert_cmd::Command;
use predicates::prelude::*;

fn remax() -> Command {
    Command::cargo_bin("remax").unwrap()
}

#[test]
fn help_shows_the_probe_flags() {
    remax().arg("--help").assert().success().stdout(
        predicate::str::contains("--print")
            .and(predicate::str::contains("--quiet"))
            .and(predicate::str::contains("--timeout"))
            .and(predicate::str::contains("--changelog")),
    );
}

#[test]
fn version_includes_the_package_version() {
    remax()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn changelog_lists_the_release_history() {
    remax()
        .arg("--changelog")
        .assert()
        .success()
        .stdout(predicate::str::contains("remax version 0.1.0"));
}

#[test]
fn refuses_to_run_without_a_tty() {
    // Piped stdin is not a terminal, so acquisition must fail cleanly
    remax()
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a terminal"));
}

#[test]
fn rejects_a_malformed_timeout() {
    remax()
        .args(["-t", "banana"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("banana"));
}
