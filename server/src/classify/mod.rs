//! Classification pipeline collaborators.
//!
//! The orchestrator only knows these two seams: fetch bytes for a URL, and
//! turn bytes into a ranked label list. Both are injected so the core stays
//! testable against stubs while production wires in the HTTP implementations.

mod fetch;
mod remote;

pub use fetch::HttpImageFetcher;
pub use remote::RemoteClassifier;

use async_trait::async_trait;

use recognition_common::Prediction;

/// A pipeline stage failure for one record.
///
/// These never escape the orchestrator as HTTP errors; the message becomes the
/// error payload stored on the record.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("unsupported image extension: {0}")]
    UnsupportedExtension(String),

    #[error("failed to fetch image: {0}")]
    Fetch(String),

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("classifier error: {0}")]
    Classifier(String),
}

/// Downloads and decodes the image behind a record's URL.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch_and_decode(&self, url: &str) -> Result<Vec<u8>, PipelineError>;
}

/// Maps decoded image bytes to a ranked label list, best match first.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, image: &[u8]) -> Result<Vec<Prediction>, PipelineError>;
}
