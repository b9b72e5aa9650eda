use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::handlers::{session_handle, SessionView};
use crate::interview::session::SessionError;
use crate::models::candidate::Candidate;
use crate::screening::analysis::{self, analyze_resume};
use crate::screening::extract::extract_resume_text;
use crate::screening::questions::{self, generate_questions};
use crate::state::AppState;

/// Uploaded resume file as received from the form.
struct ResumeUpload {
    data: Bytes,
    content_type: Option<String>,
    file_name: Option<String>,
}

/// POST /api/v1/sessions/:id/screening
///
/// Multipart form:
/// - `job_description`: text
/// - `resume`: PDF or plain-text file
///
/// Analyses the resume, generates the interview questions and starts the
/// interview at the first question. Adapter fallbacks are listed in `notices`.
pub async fn handle_screen_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<SessionView>, AppError> {
    let mut job_description: Option<String> = None;
    let mut resume: Option<ResumeUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_description" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable job_description: {e}")))?;
                job_description = Some(text);
            }
            "resume" => {
                let content_type = field.content_type().map(str::to_string);
                let file_name = field.file_name().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable resume upload: {e}")))?;
                resume = Some(ResumeUpload {
                    data,
                    content_type,
                    file_name,
                });
            }
            _ => {}
        }
    }

    let job_description = job_description
        .map(|jd| jd.trim().to_string())
        .filter(|jd| !jd.is_empty())
        .ok_or_else(|| AppError::Validation("job_description is required".to_string()))?;
    let resume = resume
        .filter(|upload| !upload.data.is_empty())
        .ok_or_else(|| AppError::Validation("A resume file is required".to_string()))?;

    let handle = session_handle(&state, id).await?;
    let mut session = handle.lock().await;
    if session.candidate().is_some() {
        return Err(SessionError::AlreadyStarted.into());
    }

    let resume_text = extract_resume_text(
        resume.data,
        resume.content_type.as_deref(),
        resume.file_name.as_deref(),
    )
    .await?;

    let mut notices = Vec::new();
    let details = analyze_resume(state.generator(), &job_description, &resume_text)
        .await
        .collect_notice(analysis::FEATURE, &mut notices);
    let question_list = generate_questions(
        state.generator(),
        &job_description,
        &resume_text,
        state.config.question_count,
    )
    .await
    .collect_notice(questions::FEATURE, &mut notices);

    let candidate = Candidate::new(details, resume_text, job_description);
    info!(
        "Session {id}: screened {} (resume score {}), {} questions",
        candidate.name,
        candidate.resume_score,
        question_list.len()
    );
    session.begin(candidate, question_list)?;

    Ok(Json(SessionView::render(&session, notices)))
}
