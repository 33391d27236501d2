//! Error types for the recognition server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Errors surfaced by the registry and orchestrator.
///
/// These are local outcomes, not process failures: the API layer is the only
/// place that maps them to status codes, and nothing is retried.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("not found")]
    NotFound,

    #[error("missing json data")]
    MissingJson,

    #[error("missing URL field")]
    MissingUrl,

    #[error("no images pending inference")]
    NothingPending,

    /// Reserved for the auth gate in front of the API; no route maps to it
    /// while authentication stays disabled.
    #[allow(dead_code)]
    #[error("unauthorized access")]
    Unauthorized,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::NotFound | Error::NothingPending => StatusCode::NOT_FOUND,
            Error::MissingJson => StatusCode::BAD_REQUEST,
            Error::MissingUrl => StatusCode::GONE,
            Error::Unauthorized => StatusCode::FORBIDDEN,
        };

        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
