//! API route definitions

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use svrlab_pipeline::TrainingPipeline;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::ServerConfig;
use crate::envelope::ApiResponse;
use crate::handlers;

/// Room for multipart framing and the `parameters` field on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared, immutable per-process state.
pub struct AppState {
    pub config: ServerConfig,
    pub pipeline: TrainingPipeline,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        AppState {
            config,
            pipeline: TrainingPipeline::new(),
        }
    }
}

async fn handle_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        ApiResponse::<()>::failure("Not found", "No route matches this path"),
    )
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origin = if config.allows_any_origin() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = %o, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_file_size.saturating_add(MULTIPART_OVERHEAD);
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/v1/upload-info", post(handlers::upload_info))
        .route("/api/v1/train-svr", post(handlers::train_svr))
        .fallback(handle_404)
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
