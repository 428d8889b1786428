//! Integration tests for `mcp-anywhere serve` failures.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::support::Sandbox;

#[test]
fn test_serve_http_out_of_range_port_exits_one() {
    Sandbox::new()
        .command()
        .args(["serve", "http", "--host", "127.0.0.1", "--port", "70000"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Error: invalid port 70000: must be between 1 and 65535",
        ));
}

#[test]
fn test_serve_stdio_negative_port_exits_one() {
    Sandbox::new()
        .command()
        .args(["serve", "stdio", "--port", "-5"])
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid port -5"));
}

#[test]
fn test_serve_http_port_in_use_exits_one() {
    let held = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = held.local_addr().expect("addr").port();

    Sandbox::new()
        .command()
        .args(["serve", "http", "--host", "127.0.0.1", "--port", &port.to_string()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot bind 127.0.0.1:"));
}

#[test]
fn test_serve_stdio_ends_on_stdin_eof() {
    let sandbox = Sandbox::new();
    let port = crate::support::unused_port();

    sandbox
        .command()
        .args(["serve", "stdio", "--host", "127.0.0.1", "--port", &port.to_string()])
        .write_stdin("")
        .timeout(std::time::Duration::from_secs(20))
        .assert()
        .success()
        .stderr(predicate::str::contains("STDIO client disconnected"));

    assert!(sandbox.data_dir().join("mcp_anywhere.db").exists());
}
