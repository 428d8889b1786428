//! STDIO transport.
//!
//! The client speaks over this process's stdin/stdout while the management
//! API listens on the endpoint. The handler ends when the client closes
//! stdin or when intake stops.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::http::{bind, router, serve};
use crate::application::ports::{StateStore, Transport};
use crate::domain::{Endpoint, HandlerError};

type Input = Box<dyn AsyncRead + Send + Unpin>;

pub struct StdioTransport<S> {
    store: Arc<S>,
    intake: CancellationToken,
    input: Mutex<Option<Input>>,
}

impl<S: StateStore + 'static> StdioTransport<S> {
    /// Transport reading this process's stdin.
    pub fn new(store: Arc<S>, intake: CancellationToken) -> Self {
        Self::with_input(store, intake, Box::new(tokio::io::stdin()))
    }

    pub fn with_input(store: Arc<S>, intake: CancellationToken, input: Input) -> Self {
        Self {
            store,
            intake,
            input: Mutex::new(Some(input)),
        }
    }

    fn take_input(&self) -> Result<Input, HandlerError> {
        self.input
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or_else(|| {
                HandlerError::Runtime("stdin is already attached to a session".to_string())
            })
    }
}

/// Drain `input` until EOF.
async fn until_eof(mut input: Input) -> Result<(), HandlerError> {
    let mut buf = [0u8; 8192];
    loop {
        match input.read(&mut buf).await {
            Ok(0) => return Ok(()),
            Ok(_) => {}
            Err(e) => return Err(HandlerError::Runtime(format!("reading stdin failed: {e}"))),
        }
    }
}

impl<S: StateStore + 'static> Transport for StdioTransport<S> {
    async fn run(&self, endpoint: &Endpoint) -> Result<(), HandlerError> {
        let listener = bind(endpoint).await?;
        let input = self.take_input()?;
        info!(%endpoint, "STDIO transport ready; management API listening");

        let server = serve(listener, router(Arc::clone(&self.store)), self.intake.clone());
        tokio::select! {
            result = server => {
                info!("STDIO transport stopped");
                result
            }
            result = until_eof(input) => {
                info!("STDIO client disconnected");
                result
            }
        }
    }
}
