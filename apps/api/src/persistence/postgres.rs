use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::models::report::CandidateRecord;
use crate::persistence::{CandidateStore, PersistenceError};

const CREATE_CANDIDATES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS candidates (
    id              BIGSERIAL PRIMARY KEY,
    report_id       UUID NOT NULL UNIQUE,
    name            TEXT NOT NULL,
    resume_score    INTEGER NOT NULL,
    interview_score INTEGER NOT NULL,
    final_score     INTEGER NOT NULL,
    created_at      TIMESTAMPTZ NOT NULL
)
"#;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str, acquire_timeout: Duration) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(acquire_timeout)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the `candidates` table if it does not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(CREATE_CANDIDATES_TABLE).execute(pool).await?;
    Ok(())
}

pub struct PgCandidateStore {
    pool: PgPool,
    /// Bound on one insert, connection acquisition included.
    deadline: Duration,
}

impl PgCandidateStore {
    pub fn new(pool: PgPool, deadline: Duration) -> Self {
        Self { pool, deadline }
    }
}

/// Runs a query future under `deadline`; expiry counts as a connection failure.
async fn within_deadline<F, T>(deadline: Duration, query: F) -> Result<T, PersistenceError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    tokio::time::timeout(deadline, query)
        .await
        .map_err(|_| PersistenceError::Connection(format!("insert exceeded {deadline:?}")))?
        .map_err(classify)
}

#[async_trait]
impl CandidateStore for PgCandidateStore {
    async fn insert_candidate_record(&self, record: &CandidateRecord) -> Result<(), PersistenceError> {
        let insert = sqlx::query(
            r#"
            INSERT INTO candidates
                (report_id, name, resume_score, interview_score, final_score, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (report_id) DO NOTHING
            "#,
        )
        .bind(record.report_id)
        .bind(&record.name)
        .bind(record.resume_score)
        .bind(record.interview_score)
        .bind(record.final_score)
        .bind(record.created_at)
        .execute(&self.pool);
        let result = within_deadline(self.deadline, insert).await?;

        if result.rows_affected() == 0 {
            info!("Report {} already saved, insert skipped", record.report_id);
        } else {
            info!("Saved candidate record for report {}", record.report_id);
        }
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

fn classify(e: sqlx::Error) -> PersistenceError {
    match e {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            PersistenceError::Connection(e.to_string())
        }
        // 28xxx: invalid authorization specification; 42501: insufficient privilege
        sqlx::Error::Database(ref db)
            if db
                .code()
                .is_some_and(|code| code.starts_with("28") || code == "42501") =>
        {
            PersistenceError::Authorization(db.message().to_string())
        }
        other => PersistenceError::Database(other),
    }
}
