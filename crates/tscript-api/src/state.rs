//! Application state.

use std::sync::Arc;

use tscript_fetch::{FetchResult, RetrievalOrchestrator};
use tscript_models::LanguagePreferenceBuilder;

use crate::config::ApiConfig;

/// Shared application state. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub orchestrator: Arc<RetrievalOrchestrator>,
    pub languages: Arc<LanguagePreferenceBuilder>,
}

impl AppState {
    /// Create new application state with the HTTP upstream and the
    /// compiled-in transcript library.
    pub fn new(config: ApiConfig) -> FetchResult<Self> {
        let orchestrator = RetrievalOrchestrator::from_config(&config.fetch)?;
        Ok(Self::with_orchestrator(config, orchestrator))
    }

    /// State around an already built orchestrator.
    pub fn with_orchestrator(config: ApiConfig, orchestrator: RetrievalOrchestrator) -> Self {
        let languages = config.fetch.language_builder();
        Self {
            config,
            orchestrator: Arc::new(orchestrator),
            languages: Arc::new(languages),
        }
    }
}
