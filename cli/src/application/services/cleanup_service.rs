//! Application service: ordered process teardown.
//!
//! Runs once, after a termination signal:
//!   0. stop accepting new work (cancel the intake token transports watch)
//!   1. release container resources
//!   2. close the storage connection
//!   3. log completion
//!
//! A failing step is logged and never stops the steps after it.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::application::ports::{ContainerManager, StateStore};

/// How a single teardown step ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    Failed(String),
}

/// Per-step outcome of one cleanup run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub containers: StepOutcome,
    pub storage: StepOutcome,
}

impl CleanupReport {
    /// `true` when every step succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.containers == StepOutcome::Done && self.storage == StepOutcome::Done
    }
}

/// The fixed teardown procedure and the resources it releases.
pub struct CleanupSequence<C, S> {
    intake: CancellationToken,
    containers: C,
    store: Arc<S>,
}

impl<C: ContainerManager, S: StateStore> CleanupSequence<C, S> {
    pub fn new(containers: C, store: Arc<S>) -> Self {
        Self {
            intake: CancellationToken::new(),
            containers,
            store,
        }
    }

    /// Token cancelled by step 0. Transports stop accepting when it fires.
    #[must_use]
    pub fn intake(&self) -> CancellationToken {
        self.intake.clone()
    }

    /// Run every step in order. Never fails; outcomes are in the report.
    pub async fn run(&self) -> CleanupReport {
        self.intake.cancel();
        info!("stopped accepting new work");

        let containers = match self.containers.release_all().await {
            Ok(report) => {
                for (container, reason) in &report.failed {
                    warn!(%container, error = %reason, "container did not release");
                }
                info!(
                    released = report.released,
                    failed = report.failed.len(),
                    "container resources released"
                );
                StepOutcome::Done
            }
            Err(e) => {
                let reason = format!("{e:#}");
                error!(error = %reason, "error releasing container resources");
                StepOutcome::Failed(reason)
            }
        };

        let storage = match self.store.close().await {
            Ok(()) => {
                info!("database connections closed");
                StepOutcome::Done
            }
            Err(e) => {
                let reason = format!("{e:#}");
                error!(error = %reason, "error closing database");
                StepOutcome::Failed(reason)
            }
        };

        info!("shutdown complete");
        CleanupReport {
            containers,
            storage,
        }
    }
}
