use axum::{
    extract::{DefaultBodyLimit, State},
    http::HeaderValue,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::predict::predict_handler;
use crate::classifier::PneumoniaClassifier;
use crate::vision::image_utils::MAX_IMAGE_SIZE;

/// Fixed status message returned by `GET /`
pub const ROOT_MESSAGE: &str = "Pneumonia Detection API Running";

/// Headroom on top of the image limit for multipart boundaries and headers
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub classifier: PneumoniaClassifier,
}

impl AppState {
    pub fn new(classifier: PneumoniaClassifier) -> Self {
        Self { classifier }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub version: String,
}

/// Build the router with CORS restricted to `allowed_origin`
///
/// Requests from any other origin get no `Access-Control-Allow-Origin`
/// header. A wildcard is refused.
pub fn create_router(state: AppState, allowed_origin: &str) -> anyhow::Result<Router> {
    if allowed_origin.trim() == "*" {
        anyhow::bail!("Wildcard allowed origin is not supported, configure a single origin");
    }

    let origin = HeaderValue::from_str(allowed_origin)
        .map_err(|e| anyhow::anyhow!("Invalid allowed origin '{}': {}", allowed_origin, e))?;

    let app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/predict", post(predict_handler))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + MULTIPART_OVERHEAD))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list([origin]))
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    Ok(app)
}

pub async fn start_server(
    state: AppState,
    addr: SocketAddr,
    allowed_origin: &str,
) -> anyhow::Result<()> {
    let app = create_router(state, allowed_origin)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);
    tracing::info!("CORS allowed origin: {}", allowed_origin);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}

async fn root_handler() -> impl IntoResponse {
    Json(RootResponse {
        message: ROOT_MESSAGE.to_string(),
    })
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: state.classifier.model_name().to_string(),
        version: crate::version::VERSION.to_string(),
    })
}
