//! HTTP image fetching and decode validation.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::FetchConfig;

use super::{ImageFetcher, PipelineError};

/// Extensions the classification pipeline accepts.
const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Fetches image bytes over HTTP and verifies they decode.
pub struct HttpImageFetcher {
    http_client: Client,
    max_image_bytes: usize,
}

impl HttpImageFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http_client,
            max_image_bytes: config.max_image_bytes,
        })
    }
}

/// Check the URL path against the supported extensions, case-insensitively.
fn supported_extension(url: &str) -> Result<(), PipelineError> {
    // Strip query/fragment before looking at the extension.
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url)
        .to_ascii_lowercase();

    if SUPPORTED_EXTENSIONS
        .iter()
        .any(|ext| path.ends_with(&format!(".{ext}")))
    {
        Ok(())
    } else {
        Err(PipelineError::UnsupportedExtension(url.to_string()))
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch_and_decode(&self, url: &str) -> Result<Vec<u8>, PipelineError> {
        supported_extension(url)?;

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PipelineError::Fetch(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PipelineError::Fetch(e.to_string()))?;

        if bytes.len() > self.max_image_bytes {
            return Err(PipelineError::Fetch(format!(
                "image body of {} bytes exceeds the {} byte limit",
                bytes.len(),
                self.max_image_bytes
            )));
        }

        // Validate the content actually decodes before handing it to the
        // classifier; a 200 response can still carry an HTML error page.
        image::load_from_memory(&bytes).map_err(|e| PipelineError::Decode(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}
