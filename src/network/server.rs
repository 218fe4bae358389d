//! HTTP Server
//!
//! Binds the listener and routes requests to the Books resource.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{ConnectInfo, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::error::{BookError, Result};
use crate::model::BookId;
use crate::protocol::ReadAck;
use crate::resource::BooksResource;
use super::Connection;

/// Body of a successful single-record read that found nothing
pub const NOT_FOUND_IN_EITHER_SOURCE: &str = "Record not found in external and internal source.";

const INTERNAL_ERROR: &str = "Internal Server Error";
const INVALID_JSON: &str = "Invalid JSON";

/// HTTP/WebSocket server for Bookhub
pub struct Server {
    config: Config,
    resource: Arc<BooksResource>,
}

impl Server {
    /// Create a new server with the given config and resource
    pub fn new(config: Config, resource: Arc<BooksResource>) -> Self {
        Self { config, resource }
    }

    /// Bind `listen_addr` and serve until Ctrl+C
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(&self.config.listen_addr)
            .await
            .map_err(|e| {
                BookError::Network(format!("failed to bind {}: {}", self.config.listen_addr, e))
            })?;

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already-bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!("Listening on {}", listener.local_addr()?);

        let app = router(self.resource).into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server stopped accepting connections");
        Ok(())
    }
}

/// Routes for the Books resource
pub fn router(resource: Arc<BooksResource>) -> Router {
    Router::new()
        .route("/Books", get(list_or_upgrade).post(create_book))
        .route("/Books/:id", get(read_book))
        .with_state(resource)
}

async fn list_or_upgrade(
    State(resource): State<Arc<BooksResource>>,
    peer: Option<ConnectInfo<SocketAddr>>,
    upgrade: Option<WebSocketUpgrade>,
) -> Response {
    if let Some(upgrade) = upgrade {
        let peer_addr = peer
            .map(|ConnectInfo(addr)| addr.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        return upgrade.on_upgrade(move |socket| async move {
            if let Err(e) = Connection::new(socket, resource, peer_addr).handle().await {
                tracing::warn!("WebSocket session ended with error: {}", e);
            }
        });
    }

    tracing::debug!("GET /Books");
    match resource.read_all().await {
        Ok((local_books, external_books)) => Json(ReadAck::All {
            local_books,
            external_books,
        })
        .into_response(),
        Err(e) => {
            tracing::error!("Error fetching all records: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": INTERNAL_ERROR })),
            )
                .into_response()
        }
    }
}

async fn read_book(
    State(resource): State<Arc<BooksResource>>,
    Path(id): Path<String>,
) -> Response {
    tracing::debug!("GET /Books/{}", id);

    match resource.read_one(&BookId::from(id)).await {
        Ok(Some(book)) => Json(book).into_response(),
        Ok(None) => Json(json!({ "error": NOT_FOUND_IN_EITHER_SOURCE })).into_response(),
        Err(e) => {
            tracing::error!("Error fetching record: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": INTERNAL_ERROR })),
            )
                .into_response()
        }
    }
}

async fn create_book(State(resource): State<Arc<BooksResource>>, body: String) -> Response {
    tracing::debug!("POST /Books");

    match resource.create(body.into()).await {
        Ok(book) => Json(book).into_response(),
        Err(BookError::InvalidPayload(reason)) => {
            tracing::warn!("Failed to parse payload: {}", reason);
            (StatusCode::BAD_REQUEST, Json(json!({ "error": INVALID_JSON }))).into_response()
        }
        Err(e) => {
            tracing::error!("Error creating record: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": INTERNAL_ERROR, "details": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Resolves on Ctrl+C; never resolves if the handler cannot be installed
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C, initiating shutdown..."),
        Err(e) => {
            tracing::warn!("Cannot listen for Ctrl+C: {}", e);
            futures::future::pending::<()>().await;
        }
    }
}
