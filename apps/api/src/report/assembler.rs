//! Report assembly: gate, score, persist, summarise, render.

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::interview::session::{InterviewSession, SessionError};
use crate::llm_client::TextGenerator;
use crate::models::candidate::Candidate;
use crate::models::interview::AnswerRecord;
use crate::models::report::CandidateRecord;
use crate::persistence::CandidateStore;
use crate::report::pdf::{render_report, ReportDocument};
use crate::report::scoring::{ScoreCard, MIN_REPORT_ANSWERS};
use crate::report::summary::{self, prepare_summary, SummaryOptions};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("A report needs at least {required} answers, this interview has {got}")]
    TooFewAnswers { got: usize, required: usize },

    #[error("Could not render the report: {0}")]
    Render(String),
}

/// Score summary returned by the preview endpoint.
#[derive(Debug, Serialize)]
pub struct ReportPreview {
    pub session_id: uuid::Uuid,
    pub report_id: uuid::Uuid,
    pub candidate: String,
    pub answers: usize,
    #[serde(flatten)]
    pub scores: ScoreCard,
}

#[derive(Debug)]
pub struct AssembledReport {
    pub scores: ScoreCard,
    pub pdf: Vec<u8>,
    pub persisted: bool,
    pub notices: Vec<String>,
    pub file_name: String,
}

/// Candidate and answers of a session that may be reported on.
pub fn report_inputs(
    session: &InterviewSession,
) -> Result<(&Candidate, &[AnswerRecord]), ReportError> {
    let (candidate, answers) = session.completed()?;
    if answers.len() < MIN_REPORT_ANSWERS {
        return Err(ReportError::TooFewAnswers {
            got: answers.len(),
            required: MIN_REPORT_ANSWERS,
        });
    }
    Ok((candidate, answers))
}

/// Scores without side effects.
pub fn preview_report(session: &InterviewSession) -> Result<ReportPreview, ReportError> {
    let (candidate, answers) = report_inputs(session)?;
    Ok(ReportPreview {
        session_id: session.id(),
        report_id: session.report_id(),
        candidate: candidate.name.clone(),
        answers: answers.len(),
        scores: ScoreCard::compute(candidate.resume_score, answers.len()),
    })
}

/// Builds the PDF report for a completed session.
///
/// One insert attempt is made against `store`; its failure is reported as a
/// notice and never prevents the document from being produced.
pub async fn assemble_report(
    session: &InterviewSession,
    generator: Option<&dyn TextGenerator>,
    store: Option<&dyn CandidateStore>,
    options: SummaryOptions,
) -> Result<AssembledReport, ReportError> {
    let (candidate, answers) = report_inputs(session)?;
    let scores = ScoreCard::compute(candidate.resume_score, answers.len());
    let mut notices = Vec::new();

    let record = CandidateRecord {
        report_id: session.report_id(),
        name: candidate.name.clone(),
        resume_score: score_column(scores.resume_score),
        interview_score: score_column(scores.interview_score),
        final_score: score_column(scores.final_score),
        created_at: Utc::now(),
    };
    let persisted = match store {
        Some(store) => match store.insert_candidate_record(&record).await {
            Ok(()) => {
                info!(
                    "Candidate record {} saved via {}",
                    record.report_id,
                    store.backend()
                );
                true
            }
            Err(e) => {
                warn!("Failed to save candidate record {}: {e}", record.report_id);
                notices.push(format!("Persistence: record not saved ({e})"));
                false
            }
        },
        None => {
            notices.push("Persistence: no database configured, record not saved".to_string());
            false
        }
    };

    let raw_summary = summary::write_summary(generator, candidate, answers, &scores)
        .await
        .collect_notice(summary::FEATURE, &mut notices);

    let document = ReportDocument {
        candidate_name: candidate.name.clone(),
        scores,
        summary: prepare_summary(&raw_summary, options),
        generated_on: record.created_at.date_naive(),
    };
    let pdf = tokio::task::spawn_blocking(move || render_report(&document))
        .await
        .map_err(|e| ReportError::Render(format!("render task aborted: {e}")))?
        .map_err(|e| ReportError::Render(e.to_string()))?;

    info!(
        "Report for {} rendered ({} bytes, final score {})",
        candidate.name,
        pdf.len(),
        scores.final_score
    );

    Ok(AssembledReport {
        scores,
        pdf,
        persisted,
        notices,
        file_name: report_file_name(&candidate.name),
    })
}

/// `{name}_TalentFlow_Report.pdf` with characters unsafe in a header or a
/// file system replaced by underscores.
pub fn report_file_name(name: &str) -> String {
    let safe: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let safe = if safe.is_empty() { "Candidate".to_string() } else { safe };
    format!("{safe}_TalentFlow_Report.pdf")
}

fn score_column(score: u32) -> i32 {
    i32::try_from(score).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::CandidateDetails;
    use crate::report::scoring::Recommendation;
    use crate::testing::{healthy_generator, FailingStore, RecordingStore, ScriptedGenerator};

    const OPTIONS: SummaryOptions = SummaryOptions {
        extended_chars: false,
        max_chars: 1200,
    };

    fn session_with_answers(questions: usize, answered: usize) -> InterviewSession {
        let mut session = InterviewSession::new();
        let details = CandidateDetails {
            name: "Asha Rao".to_string(),
            score: 90,
            ..CandidateDetails::fallback()
        };
        session
            .begin(
                Candidate::new(details, "resume".to_string(), "jd".to_string()),
                (0..questions).map(|i| format!("Q{i}?")).collect(),
            )
            .unwrap();
        for i in 0..answered {
            session
                .record_answer(&format!("answer {i}"), "fine".to_string(), false)
                .unwrap();
            session.advance().unwrap();
        }
        session
    }

    #[tokio::test]
    async fn test_incomplete_interview_is_refused() {
        let session = session_with_answers(5, 3);
        let err = assemble_report(&session, None, None, OPTIONS).await.unwrap_err();
        assert!(matches!(
            err,
            ReportError::Session(SessionError::InterviewIncomplete)
        ));
    }

    #[tokio::test]
    async fn test_too_few_answers_is_refused() {
        // Only reachable when fewer questions than the minimum were installed.
        let session = session_with_answers(3, 3);
        let store = RecordingStore::default();
        let err = assemble_report(&session, None, Some(&store), OPTIONS)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReportError::TooFewAnswers { got: 3, required: 5 }
        ));
        assert!(store.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unstarted_session_is_refused() {
        let session = InterviewSession::new();
        assert!(matches!(
            preview_report(&session),
            Err(ReportError::Session(SessionError::NotStarted))
        ));
    }

    #[tokio::test]
    async fn test_report_persists_one_record_keyed_by_report_id() {
        let session = session_with_answers(5, 5);
        let generator = healthy_generator();
        let store = RecordingStore::default();
        let report = assemble_report(&session, Some(&generator), Some(&store), OPTIONS)
            .await
            .unwrap();

        assert!(report.persisted);
        assert!(report.notices.is_empty());
        assert!(report.pdf.starts_with(b"%PDF"));
        assert_eq!(report.file_name, "Asha_Rao_TalentFlow_Report.pdf");
        assert_eq!(report.scores.final_score, 87);
        assert_eq!(report.scores.recommendation, Recommendation::StrongHire);

        let records = store.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].report_id, session.report_id());
        assert_eq!(records[0].resume_score, 90);
        assert_eq!(records[0].interview_score, 85);
        assert_eq!(records[0].final_score, 87);
    }

    #[tokio::test]
    async fn test_regenerating_reuses_report_id() {
        let session = session_with_answers(5, 5);
        let store = RecordingStore::default();
        for _ in 0..2 {
            assemble_report(&session, None, Some(&store), OPTIONS)
                .await
                .unwrap();
        }
        let records = store.records.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].report_id, records[1].report_id);
    }

    #[tokio::test]
    async fn test_persistence_failure_still_renders_pdf() {
        let session = session_with_answers(5, 5);
        let generator = ScriptedGenerator::failing();
        let report = assemble_report(&session, Some(&generator), Some(&FailingStore), OPTIONS)
            .await
            .unwrap();
        assert!(!report.persisted);
        assert!(report.pdf.starts_with(b"%PDF"));
        assert!(report.notices.iter().any(|n| n.starts_with("Persistence")));
        assert!(report.notices.iter().any(|n| n.starts_with("Report summary")));
    }

    #[tokio::test]
    async fn test_no_store_is_a_notice() {
        let session = session_with_answers(5, 5);
        let report = assemble_report(&session, None, None, OPTIONS).await.unwrap();
        assert!(!report.persisted);
        assert!(report
            .notices
            .iter()
            .any(|n| n.contains("no database configured")));
    }

    #[test]
    fn test_preview_has_scores() {
        let session = session_with_answers(6, 6);
        let preview = preview_report(&session).unwrap();
        assert_eq!(preview.answers, 6);
        assert_eq!(preview.scores.interview_score, 86);
        assert_eq!(preview.scores.final_score, 88);
    }

    #[test]
    fn test_file_name_replaces_unsafe_characters() {
        assert_eq!(report_file_name("Jo \"O'Neil\""), "Jo__O_Neil__TalentFlow_Report.pdf");
        assert_eq!(report_file_name("  "), "Candidate_TalentFlow_Report.pdf");
    }
}
