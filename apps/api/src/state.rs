use std::sync::Arc;

use crate::config::Config;
use crate::generation::generator::ContentGenerator;
use crate::layout::PageEstimator;
use crate::store::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Process-lifetime document storage. Default: InMemoryStore.
    pub store: Arc<dyn DocumentStore>,
    /// Pluggable content source. Default: GeminiGenerator.
    pub generator: Arc<dyn ContentGenerator>,
    pub config: Config,
    /// Page estimator for page maps and standalone estimates. Stateless and Copy.
    pub estimator: PageEstimator,
}
