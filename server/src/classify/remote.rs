//! Remote model-server classifier.
//!
//! The neural network itself lives behind an HTTP model server; this client
//! posts raw image bytes and gets back the ranked label list.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use recognition_common::Prediction;

use crate::config::ClassifierConfig;

use super::{Classifier, PipelineError};

/// Classifier backed by a remote model server.
pub struct RemoteClassifier {
    http_client: Client,
    base_url: String,
}

/// Response from the model server's classify endpoint.
#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    predictions: Vec<RawPrediction>,
}

#[derive(Debug, Deserialize)]
struct RawPrediction {
    label: String,
    score: f32,
}

impl RemoteClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn classify(&self, image: &[u8]) -> Result<Vec<Prediction>, PipelineError> {
        let url = format!("{}/v1/classify", self.base_url);

        tracing::debug!("Sending {} image bytes to {}", image.len(), url);

        let response = self
            .http_client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| PipelineError::Classifier(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Classifier(format!("{status}: {body}")));
        }

        let parsed: ClassifyResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::Classifier(e.to_string()))?;

        Ok(parsed
            .predictions
            .into_iter()
            .map(|p| Prediction::new(p.label, p.score))
            .collect())
    }
}
