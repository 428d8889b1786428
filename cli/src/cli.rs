//! CLI argument parsing with clap derive

use std::ffi::OsString;
use std::process::ExitCode;

use anywhere_common::GatewayConfig;
use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::domain::{Endpoint, ResolvedAction};

/// MCP Anywhere - Unified gateway for Model Context Protocol servers
#[derive(Parser, Debug)]
#[command(
    name = "mcp-anywhere",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the gateway server
    #[command(subcommand)]
    Serve(ServeCommand),

    /// Relay this process's STDIO to a running gateway (for MCP clients)
    Connect,

    /// Delete all persisted data and start fresh
    Reset(ResetArgs),
}

#[derive(Subcommand, Debug)]
pub enum ServeCommand {
    /// Serve MCP over HTTP
    Http(TransportArgs),

    /// Serve MCP over STDIO, with the management API on host/port
    Stdio(TransportArgs),
}

#[derive(Args, Debug)]
pub struct TransportArgs {
    /// Host to bind [default: from config, 0.0.0.0]
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind [default: from config, 8000]
    #[arg(long, allow_negative_numbers = true)]
    pub port: Option<i64>,
}

impl TransportArgs {
    fn endpoint(self, config: &GatewayConfig) -> Endpoint {
        Endpoint::new(
            self.host.unwrap_or_else(|| config.host.clone()),
            self.port.unwrap_or(config.port),
        )
    }
}

#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Skip the confirmation prompt
    #[arg(long)]
    pub confirm: bool,
}

/// The command line could not be turned into an action.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Missing or malformed arguments.
    #[error("{0}")]
    Usage(clap::Error),

    /// `--help` or `--version`: not a failure, but nothing to run.
    #[error("{0}")]
    Display(clap::Error),
}

impl From<clap::Error> for ResolveError {
    fn from(err: clap::Error) -> Self {
        match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Self::Display(err),
            _ => Self::Usage(err),
        }
    }
}

impl ResolveError {
    /// `0` for help/version output, `1` for usage errors.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Display(_) => ExitCode::SUCCESS,
            Self::Usage(_) => ExitCode::FAILURE,
        }
    }

    /// Print to stdout (help/version) or stderr (usage), as clap does.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream cannot be written.
    pub fn print(&self) -> std::io::Result<()> {
        match self {
            Self::Display(err) | Self::Usage(err) => err.print(),
        }
    }
}

impl Cli {
    /// Parse `args` (including the program name) without exiting.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] for usage errors and help/version requests.
    pub fn parse_args<I, T>(args: I) -> Result<Self, ResolveError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Ok(Self::try_parse_from(args)?)
    }

    /// Whether this invocation relays STDIO and must stay silent.
    #[must_use]
    pub fn is_connect(&self) -> bool {
        matches!(self.command, Command::Connect)
    }

    /// Fill unset options from `config` and produce the action.
    #[must_use]
    pub fn resolve(self, config: &GatewayConfig) -> ResolvedAction {
        match self.command {
            Command::Serve(ServeCommand::Http(args)) => {
                ResolvedAction::ServeHttp(args.endpoint(config))
            }
            Command::Serve(ServeCommand::Stdio(args)) => {
                ResolvedAction::ServeStdio(args.endpoint(config))
            }
            Command::Connect => ResolvedAction::Connect,
            Command::Reset(args) => ResolvedAction::Reset {
                skip_confirm: args.confirm,
            },
        }
    }
}

/// Parse and resolve in one step.
///
/// # Errors
///
/// Returns [`ResolveError`] when `args` do not describe exactly one action.
pub fn resolve_from<I, T>(args: I, config: &GatewayConfig) -> Result<ResolvedAction, ResolveError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Ok(Cli::parse_args(args)?.resolve(config))
}
