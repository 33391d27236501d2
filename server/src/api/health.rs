//! Health check and index endpoints.

use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

/// GET / - greeting, handy for checking the server is up at all.
pub async fn index() -> &'static str {
    "Hello, World!"
}

/// GET /health - Health check endpoint.
pub async fn health() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
