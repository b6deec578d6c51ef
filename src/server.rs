//! HTTP server for the site backend.
//!
//! This module provides an HTTP server that:
//! - Accepts contact form submissions via POST /send-message (JSON or
//!   url-encoded)
//! - Re-validates them and relays accepted ones by email
//! - Optionally serves the static site as a fallback
//!
//! # Architecture
//!
//! ```text
//! Browser ──→ POST /send-message ──→ FormGateway ──→ Mailer ──→ inbox
//!                                         ↓
//!                                   [validation]
//! ```

use crate::contact::{FormGateway, GatewayOutcome, Mailer, Submission};
use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Serialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Message returned after a successful relay.
pub const SUCCESS_MESSAGE: &str = "Message sent successfully!";

/// Message returned when validation fails.
pub const VALIDATION_MESSAGE: &str = "Validation failed";

/// Message returned when delivery fails.
pub const DELIVERY_FAILURE_MESSAGE: &str =
    "An error occurred while sending your message. Please try again later.";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind: IpAddr,
    /// Port to bind to (0 for random)
    pub port: u16,
    /// Static site root served for unmatched paths
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(bind: IpAddr, port: u16, static_dir: Option<PathBuf>) -> Self {
        Self {
            bind,
            port,
            static_dir,
        }
    }

    /// Loopback-only configuration, mostly for tests
    pub fn local(port: u16) -> Self {
        Self::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port, None)
    }
}

/// Shared server state
pub struct AppState {
    gateway: FormGateway,
}

impl AppState {
    /// Create new server state
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self {
            gateway: FormGateway::new(mailer),
        }
    }
}

/// Response body of POST /send-message
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// A submission read from either a JSON or a url-encoded body.
pub struct SubmissionBody(pub Submission);

#[async_trait]
impl<S> FromRequest<S> for SubmissionBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(submission) = Form::<Submission>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(submission))
        } else {
            let Json(submission) = Json::<Submission>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(submission))
        }
    }
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /send-message
///
/// Validates the submission and relays it by email.
async fn send_message(
    State(state): State<Arc<AppState>>,
    SubmissionBody(submission): SubmissionBody,
) -> (StatusCode, Json<SendMessageResponse>) {
    match state.gateway.submit(&submission).await {
        GatewayOutcome::Delivered => (
            StatusCode::OK,
            Json(SendMessageResponse {
                success: true,
                message: SUCCESS_MESSAGE.to_string(),
                errors: None,
            }),
        ),
        GatewayOutcome::Rejected(errors) => (
            StatusCode::BAD_REQUEST,
            Json(SendMessageResponse {
                success: false,
                message: VALIDATION_MESSAGE.to_string(),
                errors: Some(errors.into_iter().map(|e| e.message).collect()),
            }),
        ),
        GatewayOutcome::Failed(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(SendMessageResponse {
                success: false,
                message: DELIVERY_FAILURE_MESSAGE.to_string(),
                errors: None,
            }),
        ),
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>, static_dir: Option<PathBuf>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/send-message", post(send_message));

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .with_state(state)
}

/// Handle to a running server.
#[derive(Debug)]
pub struct ServerHandle {
    /// Address the server is bound to
    pub addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Signal graceful shutdown and wait for the server task to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.task.await {
            tracing::error!("Server task failed: {}", e);
        }
    }
}

/// Run the HTTP server
pub async fn run(config: ServerConfig, mailer: Arc<dyn Mailer>) -> anyhow::Result<ServerHandle> {
    let state = Arc::new(AppState::new(mailer));
    let app = router(state, config.static_dir.clone());

    let addr = SocketAddr::new(config.bind, config.port);
    let listener = TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    tracing::info!("Server running on http://{}", actual_addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("Server shutdown signal received");
            })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(ServerHandle {
        addr: actual_addr,
        shutdown_tx,
        task,
    })
}
