//! The single action a process invocation performs.

use std::fmt;

use crate::domain::error::HandlerError;

/// Discriminant of a [`ResolvedAction`], used where only the mode matters
/// (error visibility, logging setup).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Reset,
    ServeHttp,
    ServeStdio,
    Connect,
}

impl ActionKind {
    /// Connect mode owns stdin/stdout for a client-facing byte stream, so it
    /// must never print diagnostics of its own.
    #[must_use]
    pub fn suppresses_diagnostics(self) -> bool {
        self == Self::Connect
    }
}

/// Host and port a transport binds or a gateway connects to.
///
/// The port is whatever integer the operator supplied; [`Endpoint::validated_port`]
/// is the only place its range is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: i64,
}

impl Endpoint {
    #[must_use]
    pub fn new(host: impl Into<String>, port: i64) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Returns the port as a bindable TCP port.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::Validation`] if the port is outside `1..=65535`.
    pub fn validated_port(&self) -> Result<u16, HandlerError> {
        u16::try_from(self.port)
            .ok()
            .filter(|port| *port != 0)
            .ok_or_else(|| {
                HandlerError::Validation(format!(
                    "invalid port {}: must be between 1 and 65535",
                    self.port
                ))
            })
    }

    /// Host to dial when acting as a client. Wildcard bind addresses are
    /// mapped to the matching loopback address.
    #[must_use]
    pub fn dial_host(&self) -> &str {
        match self.host.as_str() {
            "0.0.0.0" => "127.0.0.1",
            "::" | "[::]" => "::1",
            other => other,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Immutable description of what this process will do.
///
/// Each variant carries exactly the fields its mode needs, so a resolved
/// action can never hold a port for `reset` or a confirmation flag for
/// `serve`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAction {
    /// Wipe and recreate the data directory.
    Reset { skip_confirm: bool },
    /// Serve MCP over HTTP.
    ServeHttp(Endpoint),
    /// Serve MCP over STDIO, with the management API on the endpoint.
    ServeStdio(Endpoint),
    /// Relay STDIO to a running gateway.
    Connect,
}

impl ResolvedAction {
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Reset { .. } => ActionKind::Reset,
            Self::ServeHttp(_) => ActionKind::ServeHttp,
            Self::ServeStdio(_) => ActionKind::ServeStdio,
            Self::Connect => ActionKind::Connect,
        }
    }

    /// Endpoint for the serve modes; `None` for `reset` and `connect`.
    #[must_use]
    pub fn endpoint(&self) -> Option<&Endpoint> {
        match self {
            Self::ServeHttp(endpoint) | Self::ServeStdio(endpoint) => Some(endpoint),
            Self::Reset { .. } | Self::Connect => None,
        }
    }
}
