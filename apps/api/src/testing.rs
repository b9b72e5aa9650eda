//! Stub adapters shared by unit and router tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::Config;
use crate::interview::store::SessionStore;
use crate::llm_client::{LlmError, TextGenerator};
use crate::models::report::CandidateRecord;
use crate::persistence::{CandidateStore, PersistenceError};
use crate::state::AppState;
use crate::transcription::{TranscriptionError, Transcriber};

type Responder = dyn Fn(&str) -> Result<String, LlmError> + Send + Sync;

/// Generator whose reply is computed from the prompt by a closure.
pub struct ScriptedGenerator {
    responder: Box<Responder>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    pub fn failing() -> Self {
        Self::new(|_| {
            Err(LlmError::Api {
                status: 503,
                message: "model overloaded".to_string(),
            })
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.responder)(prompt)
    }
}

/// Generator that answers each kind of prompt the way a healthy model would.
pub fn healthy_generator() -> ScriptedGenerator {
    ScriptedGenerator::new(|prompt| {
        if prompt.contains("score this resume") {
            Ok(r#"```json
{"name": "Asha Rao", "score": 90, "match_percentage": "90%",
 "strengths": ["Rust", "Distributed systems"], "gaps": ["No Kubernetes"],
 "summary": "Strong systems background"}
```"#
                .to_string())
        } else if prompt.contains("interview questions") {
            Ok((1..=8)
                .map(|i| format!("- Generated question {i}?"))
                .collect::<Vec<_>>()
                .join("\n"))
        } else if prompt.contains("Evaluate this answer") {
            Ok("Clear and specific. 8/10".to_string())
        } else {
            Ok("Asha is a strong systems engineer.\n\nRecommended for the next round.".to_string())
        }
    })
}

/// Transcriber returning a fixed transcript, or failing.
pub struct StubTranscriber {
    transcript: Option<String>,
    pub calls: AtomicUsize,
    pub last_sample_count: AtomicUsize,
}

impl StubTranscriber {
    pub fn replying(transcript: &str) -> Self {
        Self {
            transcript: Some(transcript.to_string()),
            calls: AtomicUsize::new(0),
            last_sample_count: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            transcript: None,
            calls: AtomicUsize::new(0),
            last_sample_count: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Transcriber for StubTranscriber {
    async fn transcribe(&self, samples: &[i16], _sample_rate: u32) -> Result<String, TranscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_sample_count.store(samples.len(), Ordering::SeqCst);
        match &self.transcript {
            Some(text) => Ok(text.clone()),
            None => Err(TranscriptionError::Api {
                status: 502,
                message: "upstream unavailable".to_string(),
            }),
        }
    }
}

/// Store that keeps inserted records in memory.
#[derive(Default)]
pub struct RecordingStore {
    pub records: Mutex<Vec<CandidateRecord>>,
}

#[async_trait]
impl CandidateStore for RecordingStore {
    async fn insert_candidate_record(&self, record: &CandidateRecord) -> Result<(), PersistenceError> {
        self.records
            .lock()
            .map_err(|_| PersistenceError::Connection("poisoned".to_string()))?
            .push(record.clone());
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Store whose every insert fails.
pub struct FailingStore;

#[async_trait]
impl CandidateStore for FailingStore {
    async fn insert_candidate_record(&self, _record: &CandidateRecord) -> Result<(), PersistenceError> {
        Err(PersistenceError::Connection("connection refused".to_string()))
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

/// App state with the given adapters and default configuration.
pub fn test_state(
    generator: Option<Arc<dyn TextGenerator>>,
    transcriber: Option<Arc<dyn Transcriber>>,
    store: Option<Arc<dyn CandidateStore>>,
) -> AppState {
    AppState {
        config: Config::default(),
        sessions: SessionStore::default(),
        generator,
        transcriber,
        store,
        startup_warnings: Arc::new(Vec::new()),
    }
}
