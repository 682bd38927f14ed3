use std::sync::Arc;

use crate::analysis::pipeline::EngineConfig;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Engine tunables, built once from `config` and shared with blocking workers.
    pub engine: Arc<EngineConfig>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let engine = Arc::new(config.engine());
        Self { config, engine }
    }
}
