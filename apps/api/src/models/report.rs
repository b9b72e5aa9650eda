use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Row written to the `candidates` table once per generated report.
/// `report_id` is unique, so regenerating a report never duplicates the row.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateRecord {
    pub report_id: Uuid,
    pub name: String,
    pub resume_score: i32,
    pub interview_score: i32,
    pub final_score: i32,
    pub created_at: DateTime<Utc>,
}
