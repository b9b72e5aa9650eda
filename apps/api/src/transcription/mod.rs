//! Speech-to-text adapter.
//!
//! Buffered PCM is wrapped in a 16-bit mono WAV container and uploaded to an
//! OpenAI-compatible `/audio/transcriptions` endpoint. The client is built once
//! at startup and shared through `AppState`.

use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use hound::{WavSpec, WavWriter};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transcription API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Could not encode audio: {0}")]
    Encode(#[from] hound::Error),

    #[error("Transcription exceeded {0:?}")]
    Timeout(Duration),
}

/// Audio in, text out. Implemented by `WhisperClient`; stubbed in tests.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, samples: &[i16], sample_rate: u32) -> Result<String, TranscriptionError>;
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Clone)]
pub struct WhisperClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
    deadline: Duration,
}

impl WhisperClient {
    pub fn new(api_url: String, api_key: String, model: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            api_url,
            api_key,
            model,
            deadline: timeout,
        }
    }

    async fn upload(&self, wav: Vec<u8>) -> Result<String, TranscriptionError> {
        let file = Part::bytes(wav)
            .file_name("answer.wav")
            .mime_str("audio/wav")?;
        let form = Form::new()
            .text("model", self.model.clone())
            .text("response_format", "json")
            .part("file", file);

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: TranscriptionResponse = response.json().await?;
        Ok(body.text.trim().to_string())
    }
}

#[async_trait]
impl Transcriber for WhisperClient {
    async fn transcribe(&self, samples: &[i16], sample_rate: u32) -> Result<String, TranscriptionError> {
        let wav = encode_wav(samples, sample_rate)?;
        debug!(
            "Uploading {} samples at {} Hz ({} bytes)",
            samples.len(),
            sample_rate,
            wav.len()
        );
        let text = tokio::time::timeout(self.deadline, self.upload(wav))
            .await
            .map_err(|_| TranscriptionError::Timeout(self.deadline))??;
        info!("Transcribed {} characters", text.len());
        Ok(text)
    }
}

/// Encodes mono 16-bit PCM as an in-memory WAV file.
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = WavWriter::new(&mut cursor, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(cursor.into_inner())
}

/// Decodes little-endian 16-bit PCM bytes as sent by the capture widget.
pub fn decode_pcm16le(bytes: &[u8]) -> Option<Vec<i16>> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    Some(
        bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect(),
    )
}
