//! Domain layer: pure types and state machines.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `crate::transport`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod action;
pub mod error;
pub mod shutdown;

pub use action::{ActionKind, Endpoint, ResolvedAction};
pub use error::{HandlerError, ResetError};
pub use shutdown::{ShutdownCell, ShutdownState, TerminationSignal};
