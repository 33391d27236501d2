//! Inference orchestration.
//!
//! Decides which records need classification, drives the fetch/classify
//! pipeline against the injected collaborators, and merges outcomes back into
//! the registry. The pipeline runs without holding the registry lock; only
//! the final result write takes it, briefly.

use std::sync::Arc;

use recognition_common::{ImageRecord, InferenceOutcome, NewImage, Prediction};

use crate::classify::{Classifier, ImageFetcher, PipelineError};
use crate::error::{Error, Result};
use crate::registry::{BatchCreate, TaskRegistry};

pub struct InferenceOrchestrator {
    registry: Arc<TaskRegistry>,
    fetcher: Arc<dyn ImageFetcher>,
    classifier: Arc<dyn Classifier>,
    top_k: usize,
}

impl InferenceOrchestrator {
    pub fn new(
        registry: Arc<TaskRegistry>,
        fetcher: Arc<dyn ImageFetcher>,
        classifier: Arc<dyn Classifier>,
        top_k: usize,
    ) -> Self {
        Self {
            registry,
            fetcher,
            classifier,
            top_k,
        }
    }

    /// Run inference for one record and attach the outcome.
    ///
    /// Pipeline failures become the record's stored outcome rather than an
    /// error; the only failure that escapes is `NotFound`, either on lookup
    /// or when the record was deleted while inference was in flight.
    pub async fn infer_one(&self, id: u64) -> Result<ImageRecord> {
        let record = self.registry.get(id).await?;
        let outcome = self.run_pipeline(&record.url).await;
        self.registry.set_results(id, outcome).await
    }

    /// Run inference for every record still lacking an outcome.
    ///
    /// Returns the updated subset in insertion order, or `NothingPending`
    /// when there was nothing to do. A second call right after a successful
    /// one reports `NothingPending`: failures count as computed outcomes too.
    pub async fn infer_pending(&self) -> Result<Vec<ImageRecord>> {
        let pending = self.registry.pending_ids().await;
        if pending.is_empty() {
            return Err(Error::NothingPending);
        }

        tracing::info!("Running inference on {} pending record(s)", pending.len());

        let mut updated = Vec::new();
        for id in pending {
            match self.infer_one(id).await {
                Ok(record) => updated.push(record),
                Err(Error::NotFound) => {
                    tracing::debug!("Record {} deleted while inference was in flight", id);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(updated)
    }

    /// Create records from a batch of entries and classify each one.
    ///
    /// Partial acceptance works exactly as in plain batch create; one entry's
    /// classification failure never blocks its siblings, it just becomes that
    /// record's stored outcome.
    pub async fn create_and_infer(&self, entries: Vec<NewImage>) -> BatchCreate {
        let batch = self.registry.create_batch(entries).await;

        let mut created = Vec::new();
        for record in batch.created {
            let outcome = self.run_pipeline(&record.url).await;
            match self.registry.set_results(record.id, outcome).await {
                Ok(updated) => created.push(updated),
                Err(_) => {
                    tracing::debug!("Record {} deleted while inference was in flight", record.id);
                }
            }
        }

        BatchCreate {
            created,
            missing_url: batch.missing_url,
        }
    }

    async fn run_pipeline(&self, url: &str) -> InferenceOutcome {
        match self.classify_url(url).await {
            Ok(mut predictions) => {
                predictions.truncate(self.top_k);
                InferenceOutcome::Ranked(predictions)
            }
            Err(e) => {
                tracing::warn!("Inference failed for {}: {}", url, e);
                InferenceOutcome::failed(e.to_string())
            }
        }
    }

    async fn classify_url(&self, url: &str) -> std::result::Result<Vec<Prediction>, PipelineError> {
        let image = self.fetcher.fetch_and_decode(url).await?;
        self.classifier.classify(&image).await
    }
}
