use std::sync::Arc;

use crate::config::Config;
use crate::interview::store::SessionStore;
use crate::llm_client::TextGenerator;
use crate::persistence::CandidateStore;
use crate::transcription::Transcriber;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Adapter handles are `None` when their credentials are not configured; each
/// call site then resolves to its fallback.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub transcriber: Option<Arc<dyn Transcriber>>,
    pub store: Option<Arc<dyn CandidateStore>>,
    /// Degradations detected at startup, listed by `/health`.
    pub startup_warnings: Arc<Vec<String>>,
}

impl AppState {
    pub fn generator(&self) -> Option<&dyn TextGenerator> {
        self.generator.as_deref()
    }

    pub fn store(&self) -> Option<&dyn CandidateStore> {
        self.store.as_deref()
    }
}
