//! HTTP surface over the detector.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use glossa_core::{DetectRequest, DetectResponse, ErrorResponse};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::{DetectError, Detector};

#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Answer blank `text` with 422 instead of a degenerate prediction.
    pub reject_empty: bool,
}

/// Shared application state for the HTTP server.
pub struct AppState {
    detector: Arc<Detector>,
    config: ServerConfig,
}

impl AppState {
    pub fn new(detector: Arc<Detector>, config: ServerConfig) -> Self {
        Self { detector, config }
    }

    pub fn detector(&self) -> Arc<Detector> {
        self.detector.clone()
    }
}

/// Build the HTTP router for the service.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/detect", post(detect))
        .route("/healthz", get(health))
        .route("/readyz", get(readiness))
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C or SIGTERM.
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn detect(State(state): State<Arc<AppState>>, Json(req): Json<DetectRequest>) -> Response {
    let result = if state.config.reject_empty {
        state.detector.detect_non_empty(&req.text).await
    } else {
        state.detector.detect(&req.text).await
    };

    match result {
        Ok(prediction) => Json(DetectResponse::from(prediction)).into_response(),
        Err(DetectError::EmptyInput) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, "empty input")
        }
        Err(DetectError::Bootstrap(e)) => {
            warn!(error = %e, "model unavailable");
            error_response(StatusCode::SERVICE_UNAVAILABLE, "model unavailable")
        }
        Err(e) => {
            error!(error = %e, "detection failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

/// Liveness probe endpoint.
async fn health() -> &'static str {
    "OK"
}

/// Readiness probe: the model has been loaded or trained.
async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.detector.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Wait for a shutdown signal.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
