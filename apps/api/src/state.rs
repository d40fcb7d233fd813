use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmProvider;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Only the stateless transport is shared; credentials travel with each request.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn LlmProvider>,
    pub config: Config,
}
