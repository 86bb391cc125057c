//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_top_level_help() {
    let mut cmd = Command::cargo_bin("formctl").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Terminal form widgets"));
}

#[test]
fn test_form_help() {
    let mut cmd = Command::cargo_bin("formctl").unwrap();
    cmd.arg("form").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("staff select options"));
}

#[test]
fn test_table_help() {
    let mut cmd = Command::cargo_bin("formctl").unwrap();
    cmd.arg("table").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("register rows"));
}

#[test]
fn test_fetch_help() {
    let mut cmd = Command::cargo_bin("formctl").unwrap();
    cmd.arg("fetch").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("parsed payload as JSON"));
}

#[test]
fn test_fetch_unreachable_url_fails() {
    let mut cmd = Command::cargo_bin("formctl").unwrap();
    // Reserved port, nothing listening
    cmd.arg("fetch").arg("http://127.0.0.1:9/feed");

    cmd.assert().failure();
}

#[test]
fn test_zone_flag_is_global() {
    let mut cmd = Command::cargo_bin("formctl").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--zone"));
}
