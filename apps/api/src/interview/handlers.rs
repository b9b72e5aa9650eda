use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::evaluation::{self, evaluate_answer};
use crate::interview::session::{
    InterviewSession, SessionStatus, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE,
};
use crate::interview::store::SessionHandle;
use crate::models::candidate::Candidate;
use crate::models::interview::{AnswerRecord, Modality};
use crate::state::AppState;
use crate::transcription::decode_pcm16le;

pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;

/// JSON rendering of a session, returned by every interview action.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub status: SessionStatus,
    pub stage: usize,
    pub total_questions: usize,
    pub current_question: Option<String>,
    pub modality: Modality,
    pub candidate: Option<Candidate>,
    pub answers: Vec<AnswerRecord>,
    pub pending_audio_samples: usize,
    /// Fallbacks taken while serving this request.
    pub notices: Vec<String>,
}

impl SessionView {
    pub fn render(session: &InterviewSession, notices: Vec<String>) -> Self {
        Self {
            session_id: session.id(),
            status: session.status(),
            stage: session.stage(),
            total_questions: session.questions().len(),
            current_question: session.questions().get(session.stage()).cloned(),
            modality: session.modality(),
            candidate: session.candidate().cloned(),
            answers: session.answers().to_vec(),
            pending_audio_samples: session.pending_audio_samples(),
            notices,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ModalityRequest {
    pub modality: Modality,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct AudioQuery {
    pub sample_rate: Option<u32>,
}

/// Looks up a session or fails with 404.
pub async fn session_handle(state: &AppState, id: Uuid) -> Result<SessionHandle, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let (_, handle) = state.sessions.create().await;
    let session = handle.lock().await;
    (StatusCode::CREATED, Json(SessionView::render(&session, Vec::new())))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = session_handle(&state, id).await?;
    let session = handle.lock().await;
    Ok(Json(SessionView::render(&session, Vec::new())))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {id} not found")))
    }
}

/// PUT /api/v1/sessions/:id/modality
pub async fn handle_set_modality(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ModalityRequest>,
) -> Result<Json<SessionView>, AppError> {
    let handle = session_handle(&state, id).await?;
    let mut session = handle.lock().await;
    session.set_modality(req.modality)?;
    info!("Session {id}: modality set to {:?}", req.modality);
    Ok(Json(SessionView::render(&session, Vec::new())))
}

/// POST /api/v1/sessions/:id/answers
/// Submits a typed answer for the current question.
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<SessionView>, AppError> {
    let handle = session_handle(&state, id).await?;
    let mut session = handle.lock().await;
    session.ensure_accepting(Modality::Text)?;
    let notices = submit_answer(&state, &mut session, &req.answer).await?;
    Ok(Json(SessionView::render(&session, notices)))
}

/// POST /api/v1/sessions/:id/audio?sample_rate=
/// Appends a chunk of little-endian 16-bit mono PCM to the capture buffer.
pub async fn handle_append_audio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<AudioQuery>,
    body: Bytes,
) -> Result<Json<SessionView>, AppError> {
    let sample_rate = query.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE);
    if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&sample_rate) {
        return Err(AppError::Validation(format!(
            "sample_rate must be between {MIN_SAMPLE_RATE} and {MAX_SAMPLE_RATE} Hz, got {sample_rate}"
        )));
    }
    let samples = decode_pcm16le(&body).ok_or_else(|| {
        AppError::Validation("Audio must be 16-bit PCM (even number of bytes)".to_string())
    })?;

    let handle = session_handle(&state, id).await?;
    let mut session = handle.lock().await;
    let buffered = session.append_audio(samples, sample_rate)?;
    tracing::debug!("Session {id}: {buffered} samples buffered");
    Ok(Json(SessionView::render(&session, Vec::new())))
}

/// DELETE /api/v1/sessions/:id/audio
pub async fn handle_clear_audio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = session_handle(&state, id).await?;
    let mut session = handle.lock().await;
    session.clear_audio();
    Ok(Json(SessionView::render(&session, Vec::new())))
}

/// POST /api/v1/sessions/:id/audio/process
/// Transcribes the buffered audio and submits the transcript as the answer.
/// On transcription failure the buffer is kept so the user can retry.
pub async fn handle_process_audio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = session_handle(&state, id).await?;
    let mut session = handle.lock().await;
    let clip = session.voice_clip()?;

    let transcriber = state.transcriber.as_deref().ok_or_else(|| {
        AppError::ServiceUnavailable(
            "Transcription is not configured (TRANSCRIPTION_API_KEY); switch to text input"
                .to_string(),
        )
    })?;

    let transcript = match transcriber.transcribe(&clip.samples, clip.sample_rate).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Session {id}: transcription failed: {e}");
            return Err(AppError::ServiceUnavailable(format!(
                "Transcription failed ({e}); your recording was kept, retry or switch to text input"
            )));
        }
    };

    let transcript = transcript.trim();
    if transcript.is_empty() {
        return Err(AppError::UserInputMissing(
            "No speech was recognised in the recording".to_string(),
        ));
    }
    info!(
        "Session {id}: transcribed {} samples into {} characters",
        clip.samples.len(),
        transcript.len()
    );

    let notices = submit_answer(&state, &mut session, transcript).await?;
    Ok(Json(SessionView::render(&session, notices)))
}

/// POST /api/v1/sessions/:id/advance
pub async fn handle_advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = session_handle(&state, id).await?;
    let mut session = handle.lock().await;
    let status = session.advance()?;
    info!("Session {id}: advanced to {status:?}");
    Ok(Json(SessionView::render(&session, Vec::new())))
}

/// Evaluates `answer` against the current question and records it.
/// Evaluation never blocks the transition; its fallback becomes a notice.
async fn submit_answer(
    state: &AppState,
    session: &mut InterviewSession,
    answer: &str,
) -> Result<Vec<String>, AppError> {
    let question = session.current_question()?.to_string();
    if answer.trim().is_empty() {
        return Err(AppError::UserInputMissing("Answer is empty".to_string()));
    }

    let mut notices = Vec::new();
    let feedback = evaluate_answer(state.generator(), &question, answer.trim()).await;
    let is_fallback = feedback.is_degraded();
    let feedback = feedback.collect_notice(evaluation::FEATURE, &mut notices);

    let id = session.id();
    let record = session.record_answer(answer, feedback, is_fallback)?;
    info!(
        "Session {id}: answer recorded for \"{}\" ({:?})",
        record.question, record.modality
    );
    Ok(notices)
}
