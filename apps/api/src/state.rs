use std::sync::Arc;

use crate::llm_client::CompletionProvider;
use crate::recommendation::advisor::AdvisorSettings;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; requests share nothing else.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend. `OpenAiClient` in production, a fake in tests.
    pub llm: Arc<dyn CompletionProvider>,
    pub advisor: AdvisorSettings,
}
