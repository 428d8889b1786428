//! Signal-driven shutdown.
//!
//! The coordinator owns the process's [`ShutdownState`]. The first SIGINT or
//! SIGTERM moves it out of `Idle` and spawns the one cleanup task; later
//! signals are ignored. The task deregisters the signal that triggered it on
//! every exit path, including cancellation.

mod signals;

pub use signals::SignalRegistration;

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::application::ports::{ContainerManager, StateStore};
use crate::application::services::cleanup_service::{CleanupReport, CleanupSequence};
use crate::domain::{ShutdownCell, ShutdownState, TerminationSignal};
use signals::Registry;

/// How the cleanup task ended, as seen by whoever joins it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// Every step ran; per-step results are in the report.
    Finished(CleanupReport),
    /// The task was cancelled before it finished.
    Cancelled,
    /// The task panicked.
    Panicked(String),
}

type CleanupTask = (TerminationSignal, JoinHandle<CleanupReport>);

pub struct ShutdownCoordinator<C, S> {
    state: ShutdownCell,
    registry: Registry,
    sequence: CleanupSequence<C, S>,
    cleanup_task: Mutex<Option<CleanupTask>>,
    settled: CancellationToken,
}

/// Deregisters the triggering signal when the cleanup future ends or is dropped.
///
/// Logs nothing; `join_cleanup` reports how the task ended.
struct DeregisterGuard<'a> {
    registry: &'a Registry,
    settled: &'a CancellationToken,
    signal: TerminationSignal,
}

impl Drop for DeregisterGuard<'_> {
    fn drop(&mut self) {
        self.registry.release(self.signal);
        self.settled.cancel();
    }
}

impl<C, S> ShutdownCoordinator<C, S>
where
    C: ContainerManager + 'static,
    S: StateStore + 'static,
{
    pub fn new(containers: C, store: Arc<S>) -> Self {
        Self {
            state: ShutdownCell::new(),
            registry: Registry::default(),
            sequence: CleanupSequence::new(containers, store),
            cleanup_task: Mutex::new(None),
            settled: CancellationToken::new(),
        }
    }

    /// Cancelled when cleanup stops intake. Handed to the transports.
    #[must_use]
    pub fn intake(&self) -> CancellationToken {
        self.sequence.intake()
    }

    #[must_use]
    pub fn state(&self) -> ShutdownState {
        self.state.get()
    }

    fn task_slot(&self) -> MutexGuard<'_, Option<CleanupTask>> {
        self.cleanup_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Handle a termination signal.
    ///
    /// Spawns the cleanup task only on the `Idle → Requested` transition and
    /// returns `true`. In any other state this does nothing and returns
    /// `false`. Never blocks. Must be called from within a tokio runtime.
    pub fn request(self: &Arc<Self>, signal: TerminationSignal) -> bool {
        if !self.state.advance(ShutdownState::Idle, ShutdownState::Requested) {
            debug!(%signal, state = ?self.state(), "shutdown already underway; ignoring signal");
            return false;
        }
        info!(%signal, "received termination signal, shutting down");

        let this = Arc::clone(self);
        let handle = tokio::spawn(async move { this.run_cleanup(signal).await });
        *self.task_slot() = Some((signal, handle));
        true
    }

    async fn run_cleanup(&self, signal: TerminationSignal) -> CleanupReport {
        let _guard = DeregisterGuard {
            registry: &self.registry,
            settled: &self.settled,
            signal,
        };
        self.state
            .advance(ShutdownState::Requested, ShutdownState::InProgress);

        let report = self.sequence.run().await;

        self.state
            .advance(ShutdownState::InProgress, ShutdownState::Complete);
        report
    }

    /// Record a registration so cleanup can release it later.
    pub fn track(&self, registration: SignalRegistration) {
        self.registry.track(registration);
    }

    #[must_use]
    pub fn is_registered(&self, signal: TerminationSignal) -> bool {
        self.registry.is_registered(signal)
    }

    /// Install listeners for SIGINT and SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses a signal handler.
    #[cfg(unix)]
    pub fn install(self: &Arc<Self>) -> io::Result<()> {
        use tokio::signal::unix::{SignalKind, signal};

        for which in TerminationSignal::ALL {
            let kind = match which {
                TerminationSignal::Interrupt => SignalKind::interrupt(),
                TerminationSignal::Terminate => SignalKind::terminate(),
            };
            let mut stream = signal(kind)?;
            let registration = SignalRegistration::new(which);
            let stop = registration.stop_token();
            self.track(registration);

            let this = Arc::clone(self);
            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        () = stop.cancelled() => break,
                        received = stream.recv() => {
                            if received.is_none() {
                                break;
                            }
                            this.request(which);
                        }
                    }
                }
            });
        }
        Ok(())
    }

    /// Install a Ctrl-C listener; other platforms have no SIGTERM.
    ///
    /// # Errors
    ///
    /// Never fails on this platform; the signature matches the unix build.
    #[cfg(not(unix))]
    pub fn install(self: &Arc<Self>) -> io::Result<()> {
        let which = TerminationSignal::Interrupt;
        let registration = SignalRegistration::new(which);
        let stop = registration.stop_token();
        self.track(registration);

        let this = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = stop.cancelled() => break,
                    received = tokio::signal::ctrl_c() => {
                        if received.is_err() {
                            break;
                        }
                        this.request(which);
                    }
                }
            }
        });
        Ok(())
    }

    /// Resolves once cleanup has ended, however it ended.
    pub async fn settled(&self) {
        self.settled.cancelled().await;
    }

    /// Wait for the cleanup task, if one was spawned.
    ///
    /// A cancelled or panicked task is logged and reported, never raised,
    /// and its signal is deregistered if the task did not get to do it.
    pub async fn join_cleanup(&self) -> Option<CleanupOutcome> {
        let taken = self.task_slot().take();
        let (signal, handle) = taken?;
        let outcome = match handle.await {
            Ok(report) => return Some(CleanupOutcome::Finished(report)),
            Err(e) if e.is_cancelled() => {
                error!(%signal, "cleanup task cancelled");
                CleanupOutcome::Cancelled
            }
            Err(e) => {
                error!(%signal, error = %e, "cleanup task panicked");
                CleanupOutcome::Panicked(e.to_string())
            }
        };
        self.registry.release(signal);
        self.settled.cancel();
        Some(outcome)
    }

    /// Cancel a running cleanup task. No-op when none was spawned.
    #[cfg(test)]
    pub(crate) fn abort_cleanup(&self) {
        if let Some((_, handle)) = self.task_slot().as_ref() {
            handle.abort();
        }
    }
}
