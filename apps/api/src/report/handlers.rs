use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::handlers::session_handle;
use crate::report::assembler::{assemble_report, preview_report, ReportPreview};
use crate::report::summary::SummaryOptions;
use crate::state::AppState;

pub const NOTICES_HEADER: &str = "x-report-notices";
pub const PERSISTED_HEADER: &str = "x-report-persisted";

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// Overrides `REPORT_EXTENDED_CHARS` for this request.
    pub extended: Option<bool>,
}

/// GET /api/v1/sessions/:id/report
/// Scores for a completed interview. Nothing is persisted or rendered.
pub async fn handle_preview_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReportPreview>, AppError> {
    let handle = session_handle(&state, id).await?;
    let session = handle.lock().await;
    Ok(Json(preview_report(&session)?))
}

/// POST /api/v1/sessions/:id/report
/// Saves the candidate record (best effort) and returns the PDF report.
pub async fn handle_generate_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, AppError> {
    let handle = session_handle(&state, id).await?;
    let session = handle.lock().await;

    let options = SummaryOptions {
        extended_chars: query.extended.unwrap_or(state.config.report_extended_chars),
        max_chars: state.config.report_max_chars,
    };
    let report = assemble_report(&session, state.generator(), state.store(), options).await?;
    info!(
        "Session {id}: report generated (persisted: {}, notices: {})",
        report.persisted,
        report.notices.len()
    );

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    headers.insert(
        header::CONTENT_DISPOSITION,
        header_value(&format!("attachment; filename=\"{}\"", report.file_name)),
    );
    headers.insert(
        PERSISTED_HEADER,
        HeaderValue::from_static(if report.persisted { "true" } else { "false" }),
    );
    if !report.notices.is_empty() {
        headers.insert(NOTICES_HEADER, header_value(&report.notices.join(" | ")));
    }

    Ok((headers, report.pdf).into_response())
}

/// Header-safe rendering: anything outside visible ASCII becomes `?`.
fn header_value(text: &str) -> HeaderValue {
    let safe: String = text
        .chars()
        .map(|c| if c == ' ' || c.is_ascii_graphic() { c } else { '?' })
        .collect();
    HeaderValue::from_str(&safe).unwrap_or_else(|_| HeaderValue::from_static("unavailable"))
}
