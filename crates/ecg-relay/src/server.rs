//! Router assembly and server startup.

use std::any::Any;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use ecg_core::ANALYZE_PATH;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::config::RelayConfig;
use crate::error::{RelayError, Result};
use crate::gemini::GeminiClient;
use crate::handler;
use crate::upstream::Upstream;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<RelayConfig>,
    /// Model API client
    pub upstream: Arc<dyn Upstream>,
}

impl AppState {
    /// Creates state around an arbitrary upstream.
    pub fn new(config: RelayConfig, upstream: Arc<dyn Upstream>) -> Self {
        Self {
            config: Arc::new(config),
            upstream,
        }
    }

    /// Creates state with a Gemini client built from `config`.
    pub fn from_config(config: RelayConfig) -> Result<Self> {
        let upstream = GeminiClient::new(&config)?;
        Ok(Self::new(config, Arc::new(upstream)))
    }
}

/// Builds the relay router.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route(ANALYZE_PATH, post(handler::analyze))
        .route("/health", get(handler::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A panicking handler still answers with the generic internal error.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };
    RelayError::internal(format!("handler panicked: {detail}")).into_response()
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn serve(config: RelayConfig) -> anyhow::Result<()> {
    let bind = config.bind;
    let state = AppState::from_config(config)?;
    let listener = tokio::net::TcpListener::bind(bind).await?;

    tracing::info!(addr = %listener.local_addr()?, "ECG relay listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("ECG relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
