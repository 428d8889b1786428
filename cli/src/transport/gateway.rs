//! Connect gateway: relays this process's stdin/stdout to a running server.
//!
//! The streams belong to the client on the other end, so nothing here writes
//! diagnostics to them.

use std::io;
use std::sync::{Mutex, PoisonError};

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::application::ports::ClientGateway;
use crate::domain::{Endpoint, HandlerError};

type Input = Box<dyn AsyncRead + Send + Unpin>;
type Output = Box<dyn AsyncWrite + Send + Unpin>;

pub struct ConnectGateway {
    endpoint: Endpoint,
    intake: CancellationToken,
    streams: Mutex<Option<(Input, Output)>>,
}

impl ConnectGateway {
    /// Gateway bridging stdin/stdout to `endpoint`.
    #[must_use]
    pub fn new(endpoint: Endpoint, intake: CancellationToken) -> Self {
        Self::with_streams(
            endpoint,
            intake,
            Box::new(tokio::io::stdin()),
            Box::new(tokio::io::stdout()),
        )
    }

    #[must_use]
    pub fn with_streams(
        endpoint: Endpoint,
        intake: CancellationToken,
        input: Input,
        output: Output,
    ) -> Self {
        Self {
            endpoint,
            intake,
            streams: Mutex::new(Some((input, output))),
        }
    }

    fn take_streams(&self) -> Result<(Input, Output), HandlerError> {
        self.streams
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or_else(|| HandlerError::Runtime("gateway streams already in use".to_string()))
    }
}

impl ClientGateway for ConnectGateway {
    async fn run(&self) -> Result<(), HandlerError> {
        let port = self.endpoint.validated_port()?;
        let host = self.endpoint.dial_host();
        let target = format!("{host}:{port}");

        let stream = TcpStream::connect((host, port))
            .await
            .map_err(|e| HandlerError::connection(target.clone(), e))?;
        debug!(%target, "gateway connected");

        let (mut input, mut output) = self.take_streams()?;
        let (mut from_server, mut to_server) = stream.into_split();
        let lost = |e: io::Error| HandlerError::connection(target.clone(), e);

        let upstream = async {
            tokio::io::copy(&mut input, &mut to_server).await?;
            to_server.shutdown().await
        };
        let downstream = async {
            tokio::io::copy(&mut from_server, &mut output).await?;
            output.flush().await
        };
        tokio::pin!(upstream, downstream);

        let mut client_closed = false;
        loop {
            tokio::select! {
                result = &mut upstream, if !client_closed => {
                    result.map_err(lost)?;
                    debug!("client closed its input; waiting for server to finish");
                    client_closed = true;
                }
                result = &mut downstream => {
                    debug!("server closed the connection");
                    return result.map_err(lost);
                }
                () = self.intake.cancelled() => return Ok(()),
            }
        }
    }
}
