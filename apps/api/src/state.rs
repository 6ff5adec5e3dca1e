use std::sync::Arc;

use crate::config::Config;
use crate::optimizer::Optimizer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub optimizer: Arc<Optimizer>,
    #[allow(dead_code)]
    pub config: Config,
}
