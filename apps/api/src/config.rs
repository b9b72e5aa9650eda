use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_TRANSCRIPTION_URL: &str = "https://api.openai.com/v1/audio/transcriptions";
const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Smallest and largest interview length a deployment may configure.
pub const MIN_QUESTION_COUNT: usize = 5;
pub const MAX_QUESTION_COUNT: usize = 8;

/// Application configuration loaded from environment variables.
///
/// Every external-service credential is optional. A missing value disables the
/// matching adapter and the service runs on its fallback instead of refusing
/// to start.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub transcription_api_key: Option<String>,
    pub transcription_api_url: String,
    pub transcription_model: String,
    pub database_url: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub supabase_service_role_key: Option<String>,
    pub question_count: usize,
    pub adapter_timeout: Duration,
    /// Idle time after which an interview session is discarded.
    pub session_ttl: Duration,
    pub report_max_chars: usize,
    pub report_extended_chars: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let question_count = parse_env("QUESTION_COUNT", MIN_QUESTION_COUNT)?;
        if !(MIN_QUESTION_COUNT..=MAX_QUESTION_COUNT).contains(&question_count) {
            bail!(
                "QUESTION_COUNT must be between {MIN_QUESTION_COUNT} and {MAX_QUESTION_COUNT}, got {question_count}"
            );
        }

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            transcription_api_key: optional_env("TRANSCRIPTION_API_KEY"),
            transcription_api_url: optional_env("TRANSCRIPTION_API_URL")
                .unwrap_or_else(|| DEFAULT_TRANSCRIPTION_URL.to_string()),
            transcription_model: optional_env("TRANSCRIPTION_MODEL")
                .unwrap_or_else(|| DEFAULT_TRANSCRIPTION_MODEL.to_string()),
            database_url: optional_env("DATABASE_URL"),
            supabase_url: optional_env("SUPABASE_URL"),
            supabase_key: optional_env("SUPABASE_KEY"),
            supabase_service_role_key: optional_env("SUPABASE_SERVICE_ROLE_KEY"),
            question_count,
            adapter_timeout: Duration::from_secs(parse_env("ADAPTER_TIMEOUT_SECS", 60)?),
            session_ttl: Duration::from_secs(parse_env("SESSION_TTL_SECS", 3600)?),
            report_max_chars: parse_env("REPORT_MAX_CHARS", 1200)?,
            report_extended_chars: parse_env("REPORT_EXTENDED_CHARS", false)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Human-readable notes for every feature running degraded because of
    /// missing configuration. Logged at startup and echoed by `/health`.
    pub fn missing_feature_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.gemini_api_key.is_none() {
            warnings.push(
                "GEMINI_API_KEY not set: resume analysis, questions, evaluation and report \
                 summaries use fixed fallbacks"
                    .to_string(),
            );
        }
        if self.transcription_api_key.is_none() {
            warnings.push(
                "TRANSCRIPTION_API_KEY not set: voice answers are unavailable, use text input"
                    .to_string(),
            );
        }
        let has_supabase = self.supabase_url.is_some()
            && (self.supabase_service_role_key.is_some() || self.supabase_key.is_some());
        if self.database_url.is_none() && !has_supabase {
            warnings.push(
                "Neither DATABASE_URL nor SUPABASE_URL with a key is set: candidate records \
                 will not be saved"
                    .to_string(),
            );
        }
        warnings
    }
}

#[cfg(test)]
impl Default for Config {
    fn default() -> Self {
        Config {
            gemini_api_key: None,
            transcription_api_key: None,
            transcription_api_url: DEFAULT_TRANSCRIPTION_URL.to_string(),
            transcription_model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
            database_url: None,
            supabase_url: None,
            supabase_key: None,
            supabase_service_role_key: None,
            question_count: MIN_QUESTION_COUNT,
            adapter_timeout: Duration::from_secs(5),
            session_ttl: Duration::from_secs(3600),
            report_max_chars: 1200,
            report_extended_chars: false,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

/// Reads a variable, treating empty or whitespace-only values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
