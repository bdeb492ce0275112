use crate::config::Config;
use crate::screening::pipeline::EvaluationPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: EvaluationPipeline,
    /// Kept for handlers that need deployment settings (none yet).
    #[allow(dead_code)]
    pub config: Config,
}
