//! Image task records and classification outcomes.

use serde::{Deserialize, Serialize};

/// One tracked image task: a remote URL plus an optional classification
/// outcome.
///
/// Records are identified by a lifetime-unique id assigned by the registry.
/// `url` is opaque here; whether it is fetchable is decided by the fetch
/// pipeline, not the data model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    pub url: String,
    /// `None` until inference has run for this record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<InferenceOutcome>,
    /// Reserved for future resize support, never mutated.
    #[serde(default)]
    pub resize: bool,
    /// Reserved metadata, never mutated.
    #[serde(default)]
    pub size: String,
}

impl ImageRecord {
    /// Whether inference has not yet produced an outcome for this record.
    pub fn is_pending(&self) -> bool {
        self.results.is_none()
    }
}

/// Completed classification outcome for a record.
///
/// A failed pipeline run is an outcome too: the error payload is attached to
/// the record instead of being raised, so one bad URL never poisons a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InferenceOutcome {
    /// Ranked label list, best match first.
    Ranked(Vec<Prediction>),
    /// The pipeline failed for this record (unreachable URL, undecodable
    /// content, classifier error).
    Failed { error: String },
}

impl InferenceOutcome {
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }
}

/// A single (label, score) pair from the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    /// Serialized with fixed four-decimal precision; consumers compare the
    /// formatted strings, so the precision is part of the wire contract.
    #[serde(with = "score_format")]
    pub score: f32,
}

impl Prediction {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Fixed four-decimal score formatting.
mod score_format {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(score: &f32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{score:.4}"))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f32, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(f64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text.parse::<f32>().map_err(serde::de::Error::custom),
            Raw::Number(number) => Ok(number as f32),
        }
    }
}
