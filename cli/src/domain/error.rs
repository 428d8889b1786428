//! Typed domain error enums.
//!
//! Resolution failures (bad command lines) are not here: they never reach a
//! handler and live with the argument parser in `crate::cli`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

// ── Handler errors ────────────────────────────────────────────────────────────

/// Failures surfaced by a running transport or gateway.
///
/// `Validation`, `Runtime` and `Connection` are the recoverable set: the mode
/// router turns them into a message (unless in connect mode) and exit code 1.
/// `Fatal` carries everything else with its full context chain.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Runtime(String),

    #[error("cannot connect to {target}: {source}")]
    Connection {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Fatal(#[from] anyhow::Error),
}

impl HandlerError {
    /// Whether the mode router handles this error instead of letting it
    /// escape as a fatal failure.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Fatal(_))
    }

    pub fn connection(target: impl Into<String>, source: io::Error) -> Self {
        Self::Connection {
            target: target.into(),
            source,
        }
    }
}

// ── Reset errors ──────────────────────────────────────────────────────────────

/// Filesystem and terminal failures during `reset`.
#[derive(Debug, Error)]
pub enum ResetError {
    #[error("cannot remove {}: {source}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot recreate {}: {source}", .path.display())]
    Recreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),
}
