//! Per-signal handler registrations.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domain::TerminationSignal;

/// Binds one termination signal to the coordinator.
///
/// The stop token is captured when the listener is installed; cancelling it
/// ends that listener and drops its signal stream.
#[derive(Debug)]
pub struct SignalRegistration {
    signal: TerminationSignal,
    stop: CancellationToken,
}

impl SignalRegistration {
    #[must_use]
    pub fn new(signal: TerminationSignal) -> Self {
        Self {
            signal,
            stop: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn signal(&self) -> TerminationSignal {
        self.signal
    }

    /// Token the listener task watches.
    #[must_use]
    pub fn stop_token(&self) -> CancellationToken {
        self.stop.clone()
    }

    /// Deregister: stop the listener.
    pub fn release(self) {
        self.stop.cancel();
        debug!(signal = %self.signal, "signal handler deregistered");
    }
}

/// Live registrations, at most one per signal.
#[derive(Debug, Default)]
pub(super) struct Registry(Mutex<HashMap<TerminationSignal, SignalRegistration>>);

impl Registry {
    fn lock(&self) -> MutexGuard<'_, HashMap<TerminationSignal, SignalRegistration>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Track `registration`, releasing any earlier one for the same signal.
    pub(super) fn track(&self, registration: SignalRegistration) {
        let previous = self.lock().insert(registration.signal(), registration);
        if let Some(previous) = previous {
            previous.release();
        }
    }

    pub(super) fn is_registered(&self, signal: TerminationSignal) -> bool {
        self.lock().contains_key(&signal)
    }

    /// Release the registration for `signal`. Returns `false` if none was held.
    pub(super) fn release(&self, signal: TerminationSignal) -> bool {
        let removed = self.lock().remove(&signal);
        match removed {
            Some(registration) => {
                registration.release();
                true
            }
            None => false,
        }
    }
}
