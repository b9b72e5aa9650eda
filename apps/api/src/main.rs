mod config;
mod errors;
mod fallback;
mod interview;
mod llm_client;
mod models;
mod persistence;
mod report;
mod routes;
mod screening;
mod state;
#[cfg(test)]
mod testing;
mod transcription;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::interview::store::SessionStore;
use crate::llm_client::{LlmClient, TextGenerator};
use crate::persistence::postgres::{create_pool, ensure_schema, PgCandidateStore};
use crate::persistence::supabase::SupabaseStore;
use crate::persistence::CandidateStore;
use crate::routes::build_router;
use crate::state::AppState;
use crate::transcription::{Transcriber, WhisperClient};

const SESSION_SWEEP_PERIOD: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails only on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TalentFlow API v{}", env!("CARGO_PKG_VERSION"));

    let mut startup_warnings = config.missing_feature_warnings();

    // Initialize generation client
    let generator: Option<Arc<dyn TextGenerator>> = config.gemini_api_key.as_ref().map(|key| {
        info!("LLM client initialized (model: {})", llm_client::MODEL);
        Arc::new(LlmClient::new(key.clone(), config.adapter_timeout)) as Arc<dyn TextGenerator>
    });

    // Initialize transcription client
    let transcriber: Option<Arc<dyn Transcriber>> =
        config.transcription_api_key.as_ref().map(|key| {
            info!(
                "Transcription client initialized (model: {})",
                config.transcription_model
            );
            Arc::new(WhisperClient::new(
                config.transcription_api_url.clone(),
                key.clone(),
                config.transcription_model.clone(),
                config.adapter_timeout,
            )) as Arc<dyn Transcriber>
        });

    // Initialize candidate store
    let store = build_store(&config, &mut startup_warnings).await;

    for warning in &startup_warnings {
        warn!("{warning}");
    }

    // Session registry with idle expiry
    let sessions = SessionStore::new(config.session_ttl);
    sessions.spawn_sweeper(SESSION_SWEEP_PERIOD);
    info!("Idle sessions expire after {:?}", config.session_ttl);

    let state = AppState {
        config: config.clone(),
        sessions,
        generator,
        transcriber,
        store,
        startup_warnings: Arc::new(startup_warnings),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Picks the persistence backend: Postgres when `DATABASE_URL` is set, else
/// Supabase REST, else none. A Postgres connection failure degrades
/// persistence instead of aborting startup.
async fn build_store(
    config: &Config,
    warnings: &mut Vec<String>,
) -> Option<Arc<dyn CandidateStore>> {
    if let Some(url) = &config.database_url {
        let connected = async {
            let pool = create_pool(url, config.adapter_timeout).await?;
            ensure_schema(&pool).await?;
            anyhow::Ok(pool)
        }
        .await;
        return match connected {
            Ok(pool) => {
                info!("Candidate records will be saved to Postgres");
                Some(Arc::new(PgCandidateStore::new(pool, config.adapter_timeout)) as Arc<dyn CandidateStore>)
            }
            Err(e) => {
                warnings.push(format!(
                    "Could not connect to DATABASE_URL ({e:#}): candidate records will not be saved"
                ));
                None
            }
        };
    }

    let url = config.supabase_url.as_ref()?;
    let key = config
        .supabase_service_role_key
        .as_ref()
        .or(config.supabase_key.as_ref())?;
    info!("Candidate records will be saved via Supabase REST");
    Some(Arc::new(SupabaseStore::new(
        url,
        key.clone(),
        config.adapter_timeout,
    )))
}
