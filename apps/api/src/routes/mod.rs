pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::interview::handlers as interview;
use crate::report::handlers as report;
use crate::screening::handlers as screening;
use crate::state::AppState;

/// Large enough for a resume PDF or a long audio chunk.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions
        .route("/api/v1/sessions", post(interview::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(interview::handle_get_session).delete(interview::handle_delete_session),
        )
        // Screening
        .route(
            "/api/v1/sessions/:id/screening",
            post(screening::handle_screen_resume),
        )
        // Interview
        .route(
            "/api/v1/sessions/:id/modality",
            put(interview::handle_set_modality),
        )
        .route(
            "/api/v1/sessions/:id/answers",
            post(interview::handle_submit_answer),
        )
        .route(
            "/api/v1/sessions/:id/audio",
            post(interview::handle_append_audio).delete(interview::handle_clear_audio),
        )
        .route(
            "/api/v1/sessions/:id/audio/process",
            post(interview::handle_process_audio),
        )
        .route("/api/v1/sessions/:id/advance", post(interview::handle_advance))
        // Report
        .route(
            "/api/v1/sessions/:id/report",
            get(report::handle_preview_report).post(report::handle_generate_report),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
