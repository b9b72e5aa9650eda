use serde::{Deserialize, Serialize};

/// How the candidate answers the current question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modality {
    #[default]
    Text,
    Voice,
}

/// One answered question. Append-only once recorded.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerRecord {
    pub question: String,
    pub answer: String,
    pub feedback: String,
    pub modality: Modality,
    /// True when `feedback` is a placeholder rather than a model evaluation.
    pub feedback_is_fallback: bool,
}
