//! Argument resolution as seen from the shell.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::support::Sandbox;

#[test]
fn test_no_args_prints_help_and_exits_one() {
    Sandbox::new()
        .command()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unified gateway for Model Context Protocol servers"));
}

#[test]
fn test_help_flag_exits_zero() {
    Sandbox::new()
        .command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("connect"))
        .stdout(predicate::str::contains("reset"));
}

#[test]
fn test_version_flag_exits_zero() {
    Sandbox::new()
        .command()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mcp-anywhere 0.1.0"));
}

#[test]
fn test_serve_without_transport_exits_one() {
    Sandbox::new().command().arg("serve").assert().code(1);
}

#[test]
fn test_unknown_transport_exits_one() {
    Sandbox::new()
        .command()
        .args(["serve", "grpc"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("grpc"));
}

#[test]
fn test_unknown_command_exits_one() {
    Sandbox::new().command().arg("frobnicate").assert().code(1);
}

#[test]
fn test_non_numeric_port_exits_one() {
    Sandbox::new()
        .command()
        .args(["serve", "http", "--port", "eighty"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("eighty"));
}

#[test]
fn test_serve_help_lists_transports() {
    Sandbox::new()
        .command()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http"))
        .stdout(predicate::str::contains("stdio"));
}

#[test]
fn test_malformed_config_file_exits_one() {
    let sandbox = Sandbox::new();
    std::fs::write(sandbox.config_path(), "port: [1, 2]\n").expect("write config");

    sandbox
        .command()
        .args(["reset", "--confirm"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot parse"));
}
