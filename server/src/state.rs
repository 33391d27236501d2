//! Shared application state.

use std::sync::Arc;

use crate::config::Config;
use crate::orchestrator::InferenceOrchestrator;
use crate::registry::TaskRegistry;

/// Shared application state passed to all handlers.
pub struct AppState {
    #[allow(dead_code)]
    pub config: Config,
    pub registry: Arc<TaskRegistry>,
    pub orchestrator: Arc<InferenceOrchestrator>,
}

impl AppState {
    pub fn new(
        config: Config,
        registry: Arc<TaskRegistry>,
        orchestrator: Arc<InferenceOrchestrator>,
    ) -> Self {
        Self {
            config,
            registry,
            orchestrator,
        }
    }
}
