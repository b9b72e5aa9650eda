use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::interview::session::SessionError;
use crate::report::assembler::ReportError;
use crate::screening::extract::ExtractError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A required user input (answer text, recorded audio) was absent.
    #[error("Missing input: {0}")]
    UserInputMissing(String),

    /// The action is not allowed in the session's current state.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            e if e.is_input_missing() => AppError::UserInputMissing(e.to_string()),
            SessionError::SampleRateMismatch { .. }
            | SessionError::UnsupportedSampleRate(_)
            | SessionError::AudioBufferFull => {
                AppError::Validation(e.to_string())
            }
            SessionError::NoQuestions => AppError::Internal(anyhow::anyhow!(e)),
            e => AppError::Conflict(e.to_string()),
        }
    }
}

impl From<ExtractError> for AppError {
    fn from(e: ExtractError) -> Self {
        match e {
            ExtractError::Unsupported(_) => AppError::Validation(e.to_string()),
            ExtractError::Pdf(_) | ExtractError::Empty => {
                AppError::UnprocessableEntity(e.to_string())
            }
        }
    }
}

impl From<ReportError> for AppError {
    fn from(e: ReportError) -> Self {
        match e {
            ReportError::Session(e) => e.into(),
            ReportError::TooFewAnswers { .. } => AppError::Conflict(e.to_string()),
            ReportError::Render(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UserInputMissing(msg) => {
                (StatusCode::BAD_REQUEST, "USER_INPUT_MISSING", msg.clone())
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "SESSION_CONFLICT", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    msg.clone(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::interview::Modality;

    fn status_of(e: AppError) -> StatusCode {
        e.into_response().status()
    }

    #[test]
    fn test_session_errors_map_to_statuses() {
        assert_eq!(status_of(SessionError::EmptyAnswer.into()), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(SessionError::NoAudio.into()), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(SessionError::AudioBufferFull.into()), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(SessionError::UnsupportedSampleRate(u32::MAX).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(SessionError::AlreadyAnswered(0).into()), StatusCode::CONFLICT);
        assert_eq!(status_of(SessionError::NotStarted.into()), StatusCode::CONFLICT);
        assert_eq!(
            status_of(
                SessionError::WrongModality {
                    current: Modality::Voice,
                    requested: Modality::Text,
                }
                .into()
            ),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_report_gate_is_conflict() {
        let e = ReportError::TooFewAnswers { got: 2, required: 5 };
        assert_eq!(status_of(e.into()), StatusCode::CONFLICT);
    }

    #[test]
    fn test_extract_errors_map_to_client_errors() {
        assert_eq!(
            status_of(ExtractError::Unsupported("docx".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ExtractError::Empty.into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = AppError::UserInputMissing("Answer is empty".into()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "USER_INPUT_MISSING");
        assert_eq!(body["error"]["message"], "Answer is empty");
    }
}
