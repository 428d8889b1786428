//! Shared setup for binary tests.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// Isolated config and data locations for one test.
pub struct Sandbox {
    pub root: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("tempdir"),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.path().join("config.yaml")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.path().join("data")
    }

    /// The binary, pointed at this sandbox, with all overrides cleared.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mcp-anywhere"));
        self.apply(&mut cmd);
        cmd
    }

    fn apply(&self, cmd: &mut Command) {
        cmd.env("NO_COLOR", "1")
            .env("MCP_ANYWHERE_CONFIG", self.config_path())
            .env("MCP_ANYWHERE_DATA_DIR", self.data_dir())
            .env_remove("MCP_ANYWHERE_HOST")
            .env_remove("MCP_ANYWHERE_PORT")
            .env_remove("MCP_ANYWHERE_LOG")
            .env_remove("RUST_LOG");
    }

    /// Fill the data directory with a database file and a log.
    pub fn populate(&self) {
        let data = self.data_dir();
        std::fs::create_dir_all(data.join("logs")).expect("create logs dir");
        std::fs::write(data.join("mcp_anywhere.db"), b"sqlite").expect("write db");
        std::fs::write(data.join("logs").join("server.log"), b"log").expect("write log");
    }
}

/// A loopback port nothing is listening on right now.
pub fn unused_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.local_addr().expect("local addr").port()
}
