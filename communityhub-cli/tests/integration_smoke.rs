//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

fn communityhub() -> Command {
    let mut cmd = Command::cargo_bin("communityhub").unwrap();
    // Keep a developer's .env or shell from leaking into the assertions
    for var in ["APP_ENV", "NODE_ENV", "TIDB_HOST", "TIDB_PORT", "DB_CONNECT_ATTEMPTS", "DB_CONNECT_TIMEOUT_MS"] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_lists_commands() {
    communityhub()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("migrate"));
}

#[test]
fn test_serve_help() {
    communityhub()
        .arg("serve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("TIDB_HOST"))
        .stdout(predicate::str::contains("Port to listen on"));
}

#[test]
fn test_seed_help() {
    communityhub()
        .arg("seed")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Delete existing events"));
}

#[test]
fn test_rejects_unknown_environment() {
    communityhub()
        .args(["check", "--env", "staging"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid environment"));
}

#[test]
fn test_check_fails_fast_without_production_host() {
    communityhub()
        .args(["check", "--env", "production"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required configuration: TIDB_HOST"));
}

#[test]
fn test_node_env_production_requires_host() {
    communityhub()
        .arg("check")
        .env("NODE_ENV", "production")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required configuration: TIDB_HOST"));
}
