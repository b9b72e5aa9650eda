//! Interview session state machine.
//!
//! ```text
//! AwaitingResumeAnalysis
//!     └─ begin ──▶ AwaitingAnswer(0) ─ record_answer ─▶ AnswerSubmitted(0)
//!                        ▲                                     │
//!                        └──────────── advance ◀───────────────┘
//!                                         │ (last stage)
//!                                         ▼
//!                                 InterviewComplete
//! ```
//!
//! The session never calls an adapter. Handlers check the rules with
//! `current_question`, do the external work, and then commit the result with
//! `record_answer`; they hold the session's lock for the whole pass.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::candidate::Candidate;
use crate::models::interview::{AnswerRecord, Modality};

/// Longest voice answer kept in the capture buffer, in seconds.
pub const MAX_AUDIO_SECONDS: usize = 600;

/// Accepted capture sample rates, in Hz.
pub const MIN_SAMPLE_RATE: u32 = 8_000;
pub const MAX_SAMPLE_RATE: u32 = 48_000;

/// Hard cap on buffered samples, whatever rate the client reports.
pub const MAX_AUDIO_SAMPLES: usize = MAX_AUDIO_SECONDS * MAX_SAMPLE_RATE as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "stage")]
pub enum SessionStatus {
    AwaitingResumeAnalysis,
    AwaitingAnswer(usize),
    AnswerSubmitted(usize),
    InterviewComplete,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Resume analysis has not been completed for this session")]
    NotStarted,

    #[error("This session already has a screened candidate; start a new session")]
    AlreadyStarted,

    #[error("Question {} is already answered; advance to the next question", .0 + 1)]
    AlreadyAnswered(usize),

    #[error("Question {} has not been answered yet", .0 + 1)]
    NotAnswered(usize),

    #[error("The interview is complete; no further answers are accepted")]
    InterviewComplete,

    #[error("The interview is not complete yet")]
    InterviewIncomplete,

    #[error("Current input modality is {current:?}, not {requested:?}")]
    WrongModality {
        current: Modality,
        requested: Modality,
    },

    #[error("Answer is empty")]
    EmptyAnswer,

    #[error("No audio recorded. Please record your answer first.")]
    NoAudio,

    #[error("Audio chunk sample rate {got} Hz does not match buffered {expected} Hz")]
    SampleRateMismatch { expected: u32, got: u32 },

    #[error("Sample rate {0} Hz is not supported (8000 to 48000 Hz)")]
    UnsupportedSampleRate(u32),

    #[error("Audio buffer is full ({} seconds maximum)", MAX_AUDIO_SECONDS)]
    AudioBufferFull,

    #[error("No questions were generated for this session")]
    NoQuestions,
}

impl SessionError {
    /// Errors caused by missing user input rather than by the session's state.
    pub fn is_input_missing(&self) -> bool {
        matches!(self, SessionError::EmptyAnswer | SessionError::NoAudio)
    }
}

/// Audio captured for the current stage, not yet transcribed.
#[derive(Debug, Default, Clone)]
struct AudioCapture {
    chunks: Vec<Vec<i16>>,
    sample_rate: Option<u32>,
}

impl AudioCapture {
    fn sample_count(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }
}

/// Concatenated audio ready for transcription.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceClip {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

#[derive(Debug)]
pub struct InterviewSession {
    id: Uuid,
    /// Idempotency key for the persisted candidate record.
    report_id: Uuid,
    candidate: Option<Candidate>,
    questions: Vec<String>,
    answers: Vec<AnswerRecord>,
    stage: usize,
    modality: Modality,
    audio: AudioCapture,
}

impl InterviewSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            report_id: Uuid::new_v4(),
            candidate: None,
            questions: Vec::new(),
            answers: Vec::new(),
            stage: 0,
            modality: Modality::default(),
            audio: AudioCapture::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn report_id(&self) -> Uuid {
        self.report_id
    }

    pub fn candidate(&self) -> Option<&Candidate> {
        self.candidate.as_ref()
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn stage(&self) -> usize {
        self.stage
    }

    pub fn modality(&self) -> Modality {
        self.modality
    }

    pub fn pending_audio_samples(&self) -> usize {
        self.audio.sample_count()
    }

    pub fn status(&self) -> SessionStatus {
        if self.candidate.is_none() {
            SessionStatus::AwaitingResumeAnalysis
        } else if self.stage >= self.questions.len() {
            SessionStatus::InterviewComplete
        } else if self.answers.len() > self.stage {
            SessionStatus::AnswerSubmitted(self.stage)
        } else {
            SessionStatus::AwaitingAnswer(self.stage)
        }
    }

    /// Installs the screened candidate and their questions. Only once.
    pub fn begin(&mut self, candidate: Candidate, questions: Vec<String>) -> Result<(), SessionError> {
        if self.candidate.is_some() {
            return Err(SessionError::AlreadyStarted);
        }
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }
        self.candidate = Some(candidate);
        self.questions = questions;
        self.clear_transient();
        Ok(())
    }

    /// The question awaiting an answer, or why no answer is accepted now.
    pub fn current_question(&self) -> Result<&str, SessionError> {
        match self.status() {
            SessionStatus::AwaitingAnswer(stage) => Ok(&self.questions[stage]),
            SessionStatus::AwaitingResumeAnalysis => Err(SessionError::NotStarted),
            SessionStatus::AnswerSubmitted(stage) => Err(SessionError::AlreadyAnswered(stage)),
            SessionStatus::InterviewComplete => Err(SessionError::InterviewComplete),
        }
    }

    /// Checks that a submission in `modality` is acceptable right now.
    pub fn ensure_accepting(&self, modality: Modality) -> Result<&str, SessionError> {
        let question = self.current_question()?;
        if self.modality != modality {
            return Err(SessionError::WrongModality {
                current: self.modality,
                requested: modality,
            });
        }
        Ok(question)
    }

    /// Switches input modality for the current, unanswered stage.
    /// Any captured audio is discarded.
    pub fn set_modality(&mut self, modality: Modality) -> Result<(), SessionError> {
        self.current_question()?;
        self.modality = modality;
        self.audio = AudioCapture::default();
        Ok(())
    }

    /// Buffers one chunk of captured PCM audio for the current stage.
    pub fn append_audio(&mut self, samples: Vec<i16>, sample_rate: u32) -> Result<usize, SessionError> {
        self.ensure_accepting(Modality::Voice)?;
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&sample_rate) {
            return Err(SessionError::UnsupportedSampleRate(sample_rate));
        }
        if let Some(expected) = self.audio.sample_rate {
            if expected != sample_rate {
                return Err(SessionError::SampleRateMismatch {
                    expected,
                    got: sample_rate,
                });
            }
        }
        let limit = (MAX_AUDIO_SECONDS * sample_rate as usize).min(MAX_AUDIO_SAMPLES);
        if self.audio.sample_count() + samples.len() > limit {
            return Err(SessionError::AudioBufferFull);
        }
        if !samples.is_empty() {
            self.audio.sample_rate = Some(sample_rate);
            self.audio.chunks.push(samples);
        }
        Ok(self.audio.sample_count())
    }

    /// Drops captured audio without changing stage.
    pub fn clear_audio(&mut self) {
        self.audio = AudioCapture::default();
    }

    /// Concatenates the buffered chunks for transcription. The buffer is kept
    /// until an answer is recorded, so a failed transcription can be retried.
    pub fn voice_clip(&self) -> Result<VoiceClip, SessionError> {
        self.ensure_accepting(Modality::Voice)?;
        match self.audio.sample_rate {
            Some(sample_rate) if self.audio.sample_count() > 0 => Ok(VoiceClip {
                samples: self.audio.chunks.concat(),
                sample_rate,
            }),
            _ => Err(SessionError::NoAudio),
        }
    }

    /// Commits the answer for the current stage: `AwaitingAnswer → AnswerSubmitted`.
    pub fn record_answer(
        &mut self,
        answer: &str,
        feedback: String,
        feedback_is_fallback: bool,
    ) -> Result<&AnswerRecord, SessionError> {
        let question = self.current_question()?.to_string();
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(SessionError::EmptyAnswer);
        }
        self.answers.push(AnswerRecord {
            question,
            answer: answer.to_string(),
            feedback,
            modality: self.modality,
            feedback_is_fallback,
        });
        self.clear_transient();
        Ok(&self.answers[self.answers.len() - 1])
    }

    /// Moves past an answered stage: `AnswerSubmitted → AwaitingAnswer(next)`,
    /// or `InterviewComplete` after the last question.
    pub fn advance(&mut self) -> Result<SessionStatus, SessionError> {
        match self.status() {
            SessionStatus::AnswerSubmitted(_) => {
                self.stage += 1;
                self.clear_transient();
                Ok(self.status())
            }
            SessionStatus::AwaitingAnswer(stage) => Err(SessionError::NotAnswered(stage)),
            SessionStatus::AwaitingResumeAnalysis => Err(SessionError::NotStarted),
            SessionStatus::InterviewComplete => Err(SessionError::InterviewComplete),
        }
    }

    /// Candidate and answers of a completed interview.
    pub fn completed(&self) -> Result<(&Candidate, &[AnswerRecord]), SessionError> {
        match (self.status(), &self.candidate) {
            (SessionStatus::InterviewComplete, Some(candidate)) => Ok((candidate, &self.answers)),
            (SessionStatus::AwaitingResumeAnalysis, _) => Err(SessionError::NotStarted),
            _ => Err(SessionError::InterviewIncomplete),
        }
    }

    fn clear_transient(&mut self) {
        self.audio = AudioCapture::default();
    }
}

impl Default for InterviewSession {
    fn default() -> Self {
        Self::new()
    }
}
