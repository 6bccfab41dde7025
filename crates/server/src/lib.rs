use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub mod handlers;
pub mod state;

pub use state::AppState;

/// Address used when `REFERENT_ADDR` is not set.
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Upper bound for one request, provider round trips included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/parse", post(handlers::parse))
        .route("/api/translate", post(handlers::translate))
        .route("/api/summary", post(handlers::summary))
        .route("/api/theses", post(handlers::theses))
        .route("/api/telegram", post(handlers::telegram))
        .route("/api/image-prompt", post(handlers::image_prompt))
        .route("/api/generate-image", post(handlers::generate_image))
        .route("/api/illustration", post(handlers::illustration))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}
