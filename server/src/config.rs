//! Configuration for the recognition server.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

/// Main configuration structure for the recognition server.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Remote classifier endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// Base URL of the model server that performs the actual classification.
    #[serde(default = "default_classifier_url")]
    pub base_url: String,
    /// Number of top predictions attached to a record.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: default_classifier_url(),
            top_k: default_top_k(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Image download configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Largest image body accepted, in bytes.
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_classifier_url() -> String {
    "http://localhost:8501".to_string()
}
fn default_top_k() -> usize {
    5
}
fn default_timeout() -> u64 {
    30
}
fn default_max_image_bytes() -> usize {
    10 * 1024 * 1024
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration sources (in order of precedence):
    /// 1. Environment variables (RECOG__SECTION__KEY format)
    /// 2. config.toml file (if present)
    /// 3. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("RECOG")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
