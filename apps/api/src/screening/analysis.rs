//! Resume analysis: scores a resume against a job description and extracts
//! the candidate's identity and academic details.

use tracing::info;

use crate::fallback::{Degradation, Resolved};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{decode_json, TextGenerator};
use crate::models::candidate::CandidateDetails;
use crate::screening::prompts::ANALYSIS_PROMPT_TEMPLATE;

pub const FEATURE: &str = "Resume analysis";

/// Asks the generator for structured candidate details.
///
/// Never fails: an absent generator, a failed call, an undecodable reply or a
/// reply violating `CandidateDetails::validate` all resolve to
/// `CandidateDetails::fallback()`.
pub async fn analyze_resume(
    generator: Option<&dyn TextGenerator>,
    job_description: &str,
    resume_text: &str,
) -> Resolved<CandidateDetails> {
    let Some(generator) = generator else {
        return Resolved::fallback(
            CandidateDetails::fallback(),
            Degradation::ConfigurationMissing("GEMINI_API_KEY".to_string()),
            FEATURE,
        );
    };

    let prompt = ANALYSIS_PROMPT_TEMPLATE
        .replace("{job_description}", job_description)
        .replace("{resume_text}", resume_text)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION);

    let details = generator
        .generate(&prompt)
        .await
        .and_then(|text| decode_json::<CandidateDetails>(&text));

    match details {
        Ok(details) => match details.validate() {
            Ok(()) => {
                info!("Resume analysed: {} scored {}/100", details.name, details.score);
                Resolved::live(details)
            }
            Err(reason) => Resolved::fallback(
                CandidateDetails::fallback(),
                Degradation::MalformedResponse(reason),
                FEATURE,
            ),
        },
        Err(e) => Resolved::fallback(CandidateDetails::fallback(), e.degradation(), FEATURE),
    }
}
