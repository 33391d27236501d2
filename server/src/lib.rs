//! Image recognition task server.
//!
//! Keeps a collection of image tasks (remote URL plus optional classification
//! outcome) and exposes HTTP operations to add, list, delete and classify
//! them. The classifier itself lives behind an injected collaborator; see
//! [`classify`].

pub mod api;
pub mod classify;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod registry;
pub mod state;

pub use config::Config;
pub use error::Error;
pub use orchestrator::InferenceOrchestrator;
pub use registry::TaskRegistry;
pub use state::AppState;
