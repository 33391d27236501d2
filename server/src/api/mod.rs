//! HTTP API for the image task collection.
//!
//! Handlers stay thin: they validate payload shape, call into the registry or
//! orchestrator, and map outcomes to status codes. Nothing else lives here.

pub mod health;
pub mod images;
pub mod infer;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Build the full API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health))
        .merge(images::router())
        .merge(infer::router())
}
