use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Service status, which adapters are live, and any startup degradations.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "talentflow-api",
        "features": {
            "generation": state.generator.is_some(),
            "transcription": state.transcriber.is_some(),
            "persistence": state.store.as_ref().map(|store| store.backend()),
        },
        "active_sessions": state.sessions.len().await,
        "warnings": state.startup_warnings.as_ref(),
    }))
}
