//! Mode router: dispatches a resolved action to its handler and turns the
//! handler's result into an exit status.

use std::future::Future;
use std::io::Write;
use std::process::ExitCode;

use tracing::debug;

use crate::application::ports::{ClientGateway, Transport};
use crate::domain::{ActionKind, HandlerError, ResolvedAction};
use crate::output::OutputContext;

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    Failure,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        match exit {
            Exit::Success => ExitCode::SUCCESS,
            Exit::Failure => ExitCode::FAILURE,
        }
    }
}

/// Whether handler errors are shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    Report,
    /// Connect mode: stdout/stderr belong to the relayed client.
    Suppress,
}

impl ErrorPolicy {
    #[must_use]
    pub fn for_kind(kind: ActionKind) -> Self {
        if kind.suppresses_diagnostics() {
            Self::Suppress
        } else {
            Self::Report
        }
    }

    /// Map a handler result to an exit status.
    ///
    /// Recoverable errors are written to `stderr` under [`ErrorPolicy::Report`]
    /// and always yield [`Exit::Failure`].
    ///
    /// # Errors
    ///
    /// A [`HandlerError::Fatal`] is handed back unchanged.
    pub fn settle(
        self,
        result: Result<(), HandlerError>,
        stderr: &mut impl Write,
        output: &OutputContext,
    ) -> Result<Exit, anyhow::Error> {
        match result {
            Ok(()) => Ok(Exit::Success),
            Err(HandlerError::Fatal(e)) => Err(e),
            Err(e) => {
                if self == Self::Report {
                    let _ = output.error(stderr, &e);
                }
                Ok(Exit::Failure)
            }
        }
    }

    /// Report a fatal error with its full context chain. Always fails.
    pub fn fatal(
        self,
        err: &anyhow::Error,
        stderr: &mut impl Write,
        output: &OutputContext,
    ) -> Exit {
        if self == Self::Report {
            let _ = output.error(stderr, format_args!("{err:?}"));
        }
        Exit::Failure
    }
}

/// The async handlers, one per non-reset mode.
pub struct Handlers<H, S, G> {
    pub http: H,
    pub stdio: S,
    pub gateway: G,
}

/// Run the handler for `action`.
///
/// # Errors
///
/// Whatever the handler fails with. `Reset` is not an async mode and is
/// rejected as fatal.
pub async fn run_primary<H, S, G>(
    action: &ResolvedAction,
    handlers: &Handlers<H, S, G>,
) -> Result<(), HandlerError>
where
    H: Transport,
    S: Transport,
    G: ClientGateway,
{
    match action {
        ResolvedAction::ServeHttp(endpoint) => handlers.http.run(endpoint).await,
        ResolvedAction::ServeStdio(endpoint) => handlers.stdio.run(endpoint).await,
        ResolvedAction::Connect => handlers.gateway.run().await,
        ResolvedAction::Reset { .. } => Err(HandlerError::Fatal(anyhow::anyhow!(
            "reset has no async handler"
        ))),
    }
}

/// Run the handler until it returns or `settled` resolves, whichever is first.
///
/// `settled` is the cleanup sequence's completion; once it fires the handler
/// is dropped and the run counts as clean.
///
/// # Errors
///
/// Whatever the handler fails with before cleanup completes.
pub async fn run_until_settled<H, S, G>(
    action: &ResolvedAction,
    handlers: &Handlers<H, S, G>,
    settled: impl Future<Output = ()>,
) -> Result<(), HandlerError>
where
    H: Transport,
    S: Transport,
    G: ClientGateway,
{
    tokio::select! {
        result = run_primary(action, handlers) => result,
        () = settled => {
            debug!("cleanup complete; ending primary handler");
            Ok(())
        }
    }
}
