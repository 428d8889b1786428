//! Shutdown state machine.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Progress of the one shutdown a process may perform.
///
/// Ordered: a transition is only valid towards a later state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ShutdownState {
    Idle = 0,
    Requested = 1,
    InProgress = 2,
    Complete = 3,
}

impl ShutdownState {
    fn from_repr(raw: u8) -> Self {
        match raw {
            0 => Self::Idle,
            1 => Self::Requested,
            2 => Self::InProgress,
            _ => Self::Complete,
        }
    }
}

/// Lock-free holder of a [`ShutdownState`] that only ever moves forward.
#[derive(Debug)]
pub struct ShutdownCell(AtomicU8);

impl Default for ShutdownCell {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownCell {
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicU8::new(ShutdownState::Idle as u8))
    }

    #[must_use]
    pub fn get(&self) -> ShutdownState {
        ShutdownState::from_repr(self.0.load(Ordering::Acquire))
    }

    /// Move from `from` to `to` in one atomic step.
    ///
    /// Returns `false`, leaving the cell untouched, when the current state is
    /// not `from` or when `to` would not move the state forward.
    pub fn advance(&self, from: ShutdownState, to: ShutdownState) -> bool {
        if to <= from {
            return false;
        }
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// The two conventional termination signals the coordinator listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationSignal {
    /// SIGINT (Ctrl-C).
    Interrupt,
    /// SIGTERM.
    Terminate,
}

impl TerminationSignal {
    pub const ALL: [Self; 2] = [Self::Interrupt, Self::Terminate];
}

impl fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
        })
    }
}
