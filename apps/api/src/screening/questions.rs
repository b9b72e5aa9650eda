//! Interview question generation, one ordered list per candidate.

use tracing::info;

use crate::fallback::{Degradation, Resolved};
use crate::llm_client::TextGenerator;
use crate::screening::prompts::QUESTIONS_PROMPT_TEMPLATE;

pub const FEATURE: &str = "Question generation";

/// Questions used verbatim whenever the generator cannot supply any.
pub const FALLBACK_QUESTIONS: [&str; 5] = [
    "Tell me about a project relevant to this job.",
    "Describe a technical challenge you solved.",
    "How do you prioritize tasks under tight deadlines?",
    "Explain a piece of technology from your resume.",
    "Why are you interested in this role?",
];

/// Extra generic questions for padding a short reply up to eight.
const EXTRA_PADDING_QUESTIONS: [&str; 3] = [
    "Tell me about a time you received critical feedback and what you changed.",
    "Describe how you would get up to speed on an unfamiliar codebase.",
    "What would you want to accomplish in your first three months in this role?",
];

/// Generates exactly `count` questions, or the five fallback questions when
/// the generator is missing, fails, or returns nothing usable.
pub async fn generate_questions(
    generator: Option<&dyn TextGenerator>,
    job_description: &str,
    resume_text: &str,
    count: usize,
) -> Resolved<Vec<String>> {
    let Some(generator) = generator else {
        return Resolved::fallback(
            fallback_questions(),
            Degradation::ConfigurationMissing("GEMINI_API_KEY".to_string()),
            FEATURE,
        );
    };

    let prompt = QUESTIONS_PROMPT_TEMPLATE
        .replace("{count}", &count.to_string())
        .replace("{job_description}", job_description)
        .replace("{resume_text}", resume_text);

    let raw = match generator.generate(&prompt).await {
        Ok(raw) => raw,
        Err(e) => return Resolved::fallback(fallback_questions(), e.degradation(), FEATURE),
    };

    let parsed = parse_question_lines(&raw);
    if parsed.is_empty() {
        return Resolved::fallback(
            fallback_questions(),
            Degradation::MalformedResponse("no question lines in reply".to_string()),
            FEATURE,
        );
    }

    let generated = parsed.len();
    let questions = fit_to_count(parsed, count);
    info!("Generated {generated} questions, using {}", questions.len());
    Resolved::live(questions)
}

pub fn fallback_questions() -> Vec<String> {
    FALLBACK_QUESTIONS.iter().map(|q| q.to_string()).collect()
}

/// Splits a model reply into question strings: drops code-fence lines and
/// blanks, and strips bullet markers and list numbering.
pub fn parse_question_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.starts_with("```"))
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Truncates to `count`, or pads from the fixed pool skipping duplicates.
pub fn fit_to_count(mut questions: Vec<String>, count: usize) -> Vec<String> {
    questions.truncate(count);
    let pool = FALLBACK_QUESTIONS.iter().chain(EXTRA_PADDING_QUESTIONS.iter());
    for candidate in pool {
        if questions.len() >= count {
            break;
        }
        if !questions.iter().any(|q| q.as_str() == *candidate) {
            questions.push(candidate.to_string());
        }
    }
    questions
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim_start_matches(|c: char| matches!(c, '-' | '*' | '•') || c.is_whitespace());
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return rest.trim();
        }
    }
    line.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedGenerator;

    #[test]
    fn test_parse_strips_bullets_fences_and_blanks() {
        let raw = "```\n- What is ownership?\n\n* Explain lifetimes.\n• Why async?\n```";
        assert_eq!(
            parse_question_lines(raw),
            vec!["What is ownership?", "Explain lifetimes.", "Why async?"]
        );
    }

    #[test]
    fn test_parse_strips_numbering() {
        let raw = "1. First question?\n2) Second question?\n10. Tenth?";
        assert_eq!(
            parse_question_lines(raw),
            vec!["First question?", "Second question?", "Tenth?"]
        );
    }

    #[test]
    fn test_parse_keeps_leading_numbers_that_are_not_list_markers() {
        assert_eq!(
            parse_question_lines("3 years of Rust: what changed?"),
            vec!["3 years of Rust: what changed?"]
        );
    }

    #[test]
    fn test_fit_truncates_long_lists() {
        let questions: Vec<String> = (0..12).map(|i| format!("Q{i}")).collect();
        let fitted = fit_to_count(questions, 5);
        assert_eq!(fitted, vec!["Q0", "Q1", "Q2", "Q3", "Q4"]);
    }

    #[test]
    fn test_fit_pads_without_duplicates() {
        let questions = vec![
            "Describe a technical challenge you solved.".to_string(),
            "Custom?".to_string(),
        ];
        let fitted = fit_to_count(questions, 8);
        assert_eq!(fitted.len(), 8);
        assert_eq!(fitted[1], "Custom?");
        assert_eq!(fitted[2], FALLBACK_QUESTIONS[0]);
        let mut deduped = fitted.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), 8);
    }

    #[tokio::test]
    async fn test_generated_questions_are_fitted_to_count() {
        let generator = ScriptedGenerator::replying("- A?\n- B?\n- C?\n- D?\n- E?\n- F?\n- G?");
        let resolved = generate_questions(Some(&generator), "jd", "resume", 5).await;
        assert!(!resolved.is_degraded());
        assert_eq!(resolved.value, vec!["A?", "B?", "C?", "D?", "E?"]);
    }

    #[tokio::test]
    async fn test_prompt_requests_configured_count() {
        let generator = ScriptedGenerator::new(|prompt| {
            assert!(prompt.contains("exactly 8"));
            Ok("Only one?".to_string())
        });
        let resolved = generate_questions(Some(&generator), "jd", "resume", 8).await;
        assert_eq!(resolved.value.len(), 8);
        assert_eq!(resolved.value[0], "Only one?");
    }

    #[tokio::test]
    async fn test_failure_returns_exact_fallback_list() {
        let generator = ScriptedGenerator::failing();
        let resolved = generate_questions(Some(&generator), "jd", "resume", 8).await;
        assert!(resolved.is_degraded());
        assert_eq!(
            resolved.value,
            vec![
                "Tell me about a project relevant to this job.",
                "Describe a technical challenge you solved.",
                "How do you prioritize tasks under tight deadlines?",
                "Explain a piece of technology from your resume.",
                "Why are you interested in this role?",
            ]
        );
    }

    #[tokio::test]
    async fn test_blank_reply_returns_fallback_list() {
        let generator = ScriptedGenerator::replying("```\n\n```");
        let resolved = generate_questions(Some(&generator), "jd", "resume", 5).await;
        assert!(matches!(
            resolved.degradation,
            Some(Degradation::MalformedResponse(_))
        ));
        assert_eq!(resolved.value, fallback_questions());
    }

    #[tokio::test]
    async fn test_no_generator_returns_fallback_list() {
        let resolved = generate_questions(None, "jd", "resume", 5).await;
        assert_eq!(resolved.value, fallback_questions());
    }
}
