//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::transport`, or `crate::output`.
//!
//! Async ports return `Send` futures: the cleanup sequence runs as a spawned
//! task next to the primary handler.

use std::future::Future;
use std::io;
use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::{Endpoint, HandlerError};

// ── Value Types ───────────────────────────────────────────────────────────────

/// Result of asking the container manager to release everything it owns.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReleaseReport {
    /// Number of containers removed.
    pub released: usize,
    /// Containers that could not be removed, with the reason.
    pub failed: Vec<(String, String)>,
}

/// Database information for health reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbStatus {
    /// Path to the database file.
    pub path: String,
    /// Number of user tables in the database.
    pub table_count: usize,
    /// Size of the database file in bytes, when it can be read.
    pub size_bytes: Option<u64>,
}

// ── Teardown Ports ────────────────────────────────────────────────────────────

/// Lifecycle manager for containerized tool servers.
pub trait ContainerManager: Send + Sync {
    /// Stop and remove every managed container.
    ///
    /// Individual containers may fail without failing the call; those land in
    /// [`ReleaseReport::failed`]. An `Err` means the set of containers could
    /// not be determined at all.
    fn release_all(&self) -> impl Future<Output = Result<ReleaseReport>> + Send;
}

/// Persistent storage handle.
pub trait StateStore: Send + Sync {
    /// Report database status for health checks.
    fn status(&self) -> Result<DbStatus>;
    /// Close the underlying connection. Closing an unopened or already
    /// closed store succeeds.
    fn close(&self) -> impl Future<Output = Result<()>> + Send;
}

// ── Handler Ports ─────────────────────────────────────────────────────────────

/// A client-facing transport served by this process.
pub trait Transport: Send + Sync {
    /// Serve on `endpoint` until the transport is told to stop or fails.
    fn run(&self, endpoint: &Endpoint) -> impl Future<Output = Result<(), HandlerError>> + Send;
}

/// Client side of the gateway: relays this process's STDIO to a running server.
pub trait ClientGateway: Send + Sync {
    /// Relay until either side closes.
    fn run(&self) -> impl Future<Output = Result<(), HandlerError>> + Send;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
pub trait CommandRunner: Send + Sync {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    fn run(&self, program: &str, args: &[&str]) -> impl Future<Output = Result<Output>> + Send;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> impl Future<Output = Result<Output>> + Send;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Raw filesystem operations used by `reset`.
///
/// Returns `io::Error` unchanged so the operator sees the OS error.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}
