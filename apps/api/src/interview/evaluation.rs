//! Answer evaluation. Always produces displayable feedback.

use crate::fallback::{Degradation, Resolved};
use crate::interview::prompts::EVALUATION_PROMPT_TEMPLATE;
use crate::llm_client::TextGenerator;

pub const FEATURE: &str = "Answer evaluation";

pub const PLACEHOLDER_FEEDBACK: &str =
    "AI unavailable - placeholder feedback. Configure GEMINI_API_KEY to enable evaluation.";

/// Asks the generator to grade one answer.
///
/// Without a generator the placeholder is returned; when the call fails the
/// feedback names the failure. Neither case aborts the submission.
pub async fn evaluate_answer(
    generator: Option<&dyn TextGenerator>,
    question: &str,
    answer: &str,
) -> Resolved<String> {
    let Some(generator) = generator else {
        return Resolved::fallback(
            PLACEHOLDER_FEEDBACK.to_string(),
            Degradation::ConfigurationMissing("GEMINI_API_KEY".to_string()),
            FEATURE,
        );
    };

    let prompt = EVALUATION_PROMPT_TEMPLATE
        .replace("{question}", question)
        .replace("{answer}", answer);

    match generator.generate(&prompt).await {
        Ok(feedback) => Resolved::live(feedback.trim().to_string()),
        Err(e) => Resolved::fallback(
            format!("Automatic evaluation failed: {e}"),
            e.degradation(),
            FEATURE,
        ),
    }
}
