//! Wire protocol for the recognition HTTP API.

use serde::{Deserialize, Serialize};

use crate::record::{ImageRecord, InferenceOutcome};

/// One candidate entry in a batch add request.
///
/// `url` is required for the entry to be accepted; entries without one are
/// skipped rather than failing the whole batch. A pre-computed `results`
/// payload, if supplied, is stored verbatim on the new record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewImage {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<InferenceOutcome>,
}

impl NewImage {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }
}

/// Body of `POST /images` and `POST /imagesinfer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddImagesRequest {
    pub new_imgs: Vec<NewImage>,
}

/// Response envelope for endpoints returning the full collection or a subset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesResponse {
    pub images: Vec<ImageRecord>,
}

/// Response envelope for endpoints returning a single record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResponse {
    pub img: ImageRecord,
}

/// Response of `DELETE /images/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub result: bool,
}

/// Generic error envelope carried with 400/403/404/410 responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
