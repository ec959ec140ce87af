use std::sync::Arc;

use crate::config::Config;
use crate::optimizer::orchestrator::Orchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Generative backend present only when an API key is configured.
    pub orchestrator: Arc<Orchestrator>,
}
