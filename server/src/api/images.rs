//! Image collection endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use recognition_common::{
    AddImagesRequest, DeleteResponse, ImageRecord, ImageResponse, ImagesResponse,
};

use crate::error::{Error, Result};
use crate::state::AppState;

/// Build the images router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/images", get(list_images).post(add_images))
        .route("/images/:id", get(get_image).delete(delete_image))
}

/// GET /images - the full collection, in insertion order.
async fn list_images(State(state): State<Arc<AppState>>) -> Json<ImagesResponse> {
    Json(ImagesResponse {
        images: state.registry.list().await,
    })
}

/// GET /images/:id - a single record.
async fn get_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<ImageResponse>> {
    let img = state.registry.get(id).await?;
    Ok(Json(ImageResponse { img }))
}

/// POST /images - add records without running inference.
///
/// 201 when every entry carried a URL, 410 when some were skipped; the body
/// is the accepted subset either way.
async fn add_images(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<AddImagesRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<ImageRecord>>)> {
    let Json(request) = payload.map_err(|_| Error::MissingJson)?;

    let batch = state.registry.create_batch(request.new_imgs).await;
    tracing::info!(
        "Added {} record(s){}",
        batch.created.len(),
        if batch.missing_url {
            ", some entries lacked a URL"
        } else {
            ""
        }
    );

    Ok((accept_status(batch.missing_url), Json(batch.created)))
}

/// DELETE /images/:id - remove a record; its id is never reused.
async fn delete_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteResponse>> {
    state.registry.delete(id).await?;
    Ok(Json(DeleteResponse { result: true }))
}

/// Partial acceptance reports 410, full acceptance 201.
pub(super) fn accept_status(missing_url: bool) -> StatusCode {
    if missing_url {
        StatusCode::GONE
    } else {
        StatusCode::CREATED
    }
}
