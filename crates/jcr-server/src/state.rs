use std::sync::Arc;

use jcr_ai::{HttpSummaryService, LocalSummaryService, SummaryService};

use crate::config::AppConfig;
use crate::error::ServerResult;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub summarizer: Arc<dyn SummaryService>,
}

impl AppState {
    /// Use the HTTP summary service when `ai.enabled`, the local one otherwise.
    pub fn new(config: AppConfig) -> ServerResult<Self> {
        let summarizer: Arc<dyn SummaryService> = if config.ai.enabled {
            Arc::new(HttpSummaryService::new(&config.ai)?)
        } else {
            Arc::new(LocalSummaryService)
        };
        Ok(Self {
            config: Arc::new(config),
            summarizer,
        })
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn SummaryService>) -> Self {
        self.summarizer = summarizer;
        self
    }
}
