//! Inference endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{post, put};
use axum::{Json, Router};

use recognition_common::{AddImagesRequest, ImageRecord, ImageResponse, ImagesResponse};

use crate::error::{Error, Result};
use crate::state::AppState;

use super::images::accept_status;

/// Build the inference router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/infer/:id", put(infer_image))
        .route("/inferundone", put(infer_undone))
        .route("/imagesinfer", post(add_images_infer))
}

/// PUT /infer/:id - run inference on one existing record.
///
/// The request must carry a JSON body, though only the path id is used. An
/// unknown id wins over a malformed body, matching the check order clients
/// already rely on.
async fn infer_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    payload: std::result::Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<ImageResponse>> {
    state.registry.get(id).await?;
    payload.map_err(|_| Error::MissingJson)?;

    let img = state.orchestrator.infer_one(id).await?;
    Ok(Json(ImageResponse { img }))
}

/// PUT /inferundone - run inference on every record still lacking results.
async fn infer_undone(State(state): State<Arc<AppState>>) -> Result<Json<ImagesResponse>> {
    let images = state.orchestrator.infer_pending().await?;
    Ok(Json(ImagesResponse { images }))
}

/// POST /imagesinfer - add records and classify them in one call.
///
/// Same 201/410 partial-acceptance contract as POST /images; every returned
/// record carries a computed outcome, success or failure.
async fn add_images_infer(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<AddImagesRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<ImageRecord>>)> {
    let Json(request) = payload.map_err(|_| Error::MissingJson)?;

    let batch = state.orchestrator.create_and_infer(request.new_imgs).await;
    Ok((accept_status(batch.missing_url), Json(batch.created)))
}
