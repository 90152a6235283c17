use std::sync::Arc;

use crate::llm_client::LlmClient;
use crate::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable record store. Postgres in production.
    pub store: Arc<dyn RecordStore>,
    pub llm: LlmClient,
}
