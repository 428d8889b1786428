//! HTTP transport and the management API shared with the STDIO transport.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::application::ports::{DbStatus, StateStore, Transport};
use crate::domain::{Endpoint, HandlerError};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseInfo>,
}

#[derive(Debug, Serialize)]
pub struct DatabaseInfo {
    pub path: String,
    pub table_count: usize,
    pub size_bytes: Option<u64>,
}

impl From<DbStatus> for DatabaseInfo {
    fn from(s: DbStatus) -> Self {
        DatabaseInfo {
            path: s.path,
            table_count: s.table_count,
            size_bytes: s.size_bytes,
        }
    }
}

async fn health<S: StateStore>(State(store): State<Arc<S>>) -> (StatusCode, Json<HealthResponse>) {
    match store.status() {
        Ok(db_status) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                database: Some(DatabaseInfo::from(db_status)),
            }),
        ),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "degraded".to_string(),
                database: None,
            }),
        ),
    }
}

/// Management API router.
pub fn router<S: StateStore + 'static>(store: Arc<S>) -> Router {
    Router::new()
        .route("/health", get(health::<S>))
        .with_state(store)
}

/// Bind `endpoint` after checking its port.
pub(crate) async fn bind(endpoint: &Endpoint) -> Result<TcpListener, HandlerError> {
    let port = endpoint.validated_port()?;
    let host = endpoint.host.trim_start_matches('[').trim_end_matches(']');
    TcpListener::bind((host, port))
        .await
        .map_err(|e| HandlerError::Runtime(format!("cannot bind {endpoint}: {e}")))
}

/// Serve `app` until `intake` is cancelled, then drain in-flight requests.
pub(crate) async fn serve(
    listener: TcpListener,
    app: Router,
    intake: CancellationToken,
) -> Result<(), HandlerError> {
    axum::serve(listener, app)
        .with_graceful_shutdown(intake.cancelled_owned())
        .await
        .map_err(|e| HandlerError::Runtime(format!("HTTP server failed: {e}")))
}

pub struct HttpTransport<S> {
    store: Arc<S>,
    intake: CancellationToken,
}

impl<S: StateStore + 'static> HttpTransport<S> {
    pub fn new(store: Arc<S>, intake: CancellationToken) -> Self {
        Self { store, intake }
    }
}

impl<S: StateStore + 'static> Transport for HttpTransport<S> {
    async fn run(&self, endpoint: &Endpoint) -> Result<(), HandlerError> {
        let listener = bind(endpoint).await?;
        info!(%endpoint, "HTTP transport ready");

        serve(listener, router(Arc::clone(&self.store)), self.intake.clone()).await?;
        info!("HTTP transport stopped");
        Ok(())
    }
}
