//! Candidate record persistence.
//!
//! Exactly one insert per report request, no retry. Every backend is keyed by
//! `report_id`, so regenerating a report for the same session is a no-op on
//! the database side.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::report::CandidateRecord;

pub mod postgres;
pub mod supabase;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Could not reach the database: {0}")]
    Connection(String),

    #[error("Database rejected the credentials: {0}")]
    Authorization(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait CandidateStore: Send + Sync {
    async fn insert_candidate_record(&self, record: &CandidateRecord) -> Result<(), PersistenceError>;

    /// Short backend name for logs and `/health`.
    fn backend(&self) -> &'static str;
}
