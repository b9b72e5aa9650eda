use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::info;

use crate::models::report::CandidateRecord;
use crate::persistence::{CandidateStore, PersistenceError};

/// Inserts candidate records through Supabase's PostgREST endpoint.
///
/// Uses the service-role key when configured so row-level security does not
/// block server-side inserts; otherwise the public key.
pub struct SupabaseStore {
    client: Client,
    table_url: String,
    api_key: String,
}

impl SupabaseStore {
    pub fn new(base_url: &str, api_key: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            table_url: candidates_url(base_url),
            api_key,
        }
    }
}

fn candidates_url(base_url: &str) -> String {
    format!(
        "{}/rest/v1/candidates?on_conflict=report_id",
        base_url.trim_end_matches('/')
    )
}

#[async_trait]
impl CandidateStore for SupabaseStore {
    async fn insert_candidate_record(&self, record: &CandidateRecord) -> Result<(), PersistenceError> {
        let response = self
            .client
            .post(&self.table_url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "resolution=ignore-duplicates,return=minimal")
            .json(record)
            .send()
            .await
            .map_err(|e| PersistenceError::Connection(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            info!("Saved candidate record for report {}", record.report_id);
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PersistenceError::Authorization(body),
            _ => PersistenceError::Connection(format!("status {status}: {body}")),
        })
    }

    fn backend(&self) -> &'static str {
        "supabase"
    }
}
