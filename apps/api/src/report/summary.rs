//! Hiring summary prose for the PDF report.
//!
//! The generator writes the summary; a templated summary replaces it when the
//! call is unavailable. Either way the text is sanitized for the builtin PDF
//! fonts and cut to a character budget.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::fallback::{Degradation, Resolved};
use crate::llm_client::TextGenerator;
use crate::models::candidate::Candidate;
use crate::models::interview::AnswerRecord;
use crate::report::prompts::SUMMARY_PROMPT_TEMPLATE;
use crate::report::scoring::ScoreCard;

pub const FEATURE: &str = "Report summary";

static BLANK_LINE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("valid blank-line regex"));
static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").expect("valid space regex"));

#[derive(Debug, Clone, Copy)]
pub struct SummaryOptions {
    /// Keep printable Latin-1 instead of restricting to ASCII.
    pub extended_chars: bool,
    pub max_chars: usize,
}

/// Asks the generator for summary prose, falling back to a template.
pub async fn write_summary(
    generator: Option<&dyn TextGenerator>,
    candidate: &Candidate,
    answers: &[AnswerRecord],
    scores: &ScoreCard,
) -> Resolved<String> {
    let Some(generator) = generator else {
        return Resolved::fallback(
            fallback_summary(candidate, scores),
            Degradation::ConfigurationMissing("GEMINI_API_KEY".to_string()),
            FEATURE,
        );
    };

    let prompt = SUMMARY_PROMPT_TEMPLATE
        .replace("{name}", &candidate.name)
        .replace("{resume_text}", &candidate.resume_text)
        .replace("{answers}", &format_answers(answers))
        .replace("{final_score}", &scores.final_score.to_string());

    match generator.generate(&prompt).await {
        Ok(text) if !text.trim().is_empty() => Resolved::live(text),
        Ok(_) => Resolved::fallback(
            fallback_summary(candidate, scores),
            Degradation::MalformedResponse("empty summary".to_string()),
            FEATURE,
        ),
        Err(e) => Resolved::fallback(fallback_summary(candidate, scores), e.degradation(), FEATURE),
    }
}

/// Templated summary used when the generator is unavailable.
pub fn fallback_summary(candidate: &Candidate, scores: &ScoreCard) -> String {
    format!(
        "Candidate: {}\nResume Score: {}/100\nInterview Score: {}/100\nFinal Score: {}/100\nRecommendation: {}\n",
        candidate.name,
        scores.resume_score,
        scores.interview_score,
        scores.final_score,
        scores.recommendation.label(),
    )
}

fn format_answers(answers: &[AnswerRecord]) -> String {
    answers
        .iter()
        .enumerate()
        .map(|(i, record)| format!("Q{}: {}\nA: {}", i + 1, record.question, record.answer))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Sanitizes then truncates raw summary text.
pub fn prepare_summary(raw: &str, options: SummaryOptions) -> String {
    truncate_at_boundary(&sanitize(raw, options.extended_chars), options.max_chars)
}

/// Restricts text to what the builtin PDF fonts can show.
///
/// Default: newline plus ASCII 32–126. Extended: newline, tab, and printable
/// Latin-1. Blank-line runs collapse to one blank line and space runs to one
/// space.
pub fn sanitize(text: &str, extended: bool) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let kept: String = normalized
        .chars()
        .filter(|&c| {
            let code = c as u32;
            c == '\n'
                || (32..=126).contains(&code)
                || (extended && (c == '\t' || (160..=255).contains(&code)))
        })
        .collect();
    let collapsed = BLANK_LINE_RUNS.replace_all(&kept, "\n\n");
    let collapsed = SPACE_RUNS.replace_all(&collapsed, " ");
    collapsed.trim().to_string()
}

/// Cuts `text` to at most `max_chars` characters, preferring to end just after
/// a sentence or line break in the second half of the budget.
pub fn truncate_at_boundary(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    let cut = cut.trim_end();
    if let Some(idx) = cut.rfind(|c: char| c == '.' || c == '\n') {
        if cut[..idx].chars().count() > max_chars / 2 {
            return cut[..=idx].trim_end().to_string();
        }
    }
    cut.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::CandidateDetails;
    use crate::models::interview::Modality;
    use crate::testing::ScriptedGenerator;

    fn candidate() -> Candidate {
        Candidate::new(
            CandidateDetails::fallback(),
            "Rust, Go".to_string(),
            "Backend role".to_string(),
        )
    }

    fn answers() -> Vec<AnswerRecord> {
        (1..=5)
            .map(|i| AnswerRecord {
                question: format!("Question {i}?"),
                answer: format!("Answer {i}"),
                feedback: "ok".to_string(),
                modality: Modality::Text,
                feedback_is_fallback: false,
            })
            .collect()
    }

    fn assert_no_blank_runs(text: &str) {
        let lines: Vec<&str> = text.split('\n').collect();
        for pair in lines.windows(2) {
            assert!(
                !(pair[0].trim().is_empty() && pair[1].trim().is_empty()),
                "consecutive blank lines in {text:?}"
            );
        }
    }

    #[test]
    fn test_sanitize_default_keeps_only_printable_ascii() {
        let raw = "Strong\u{0007} fit\u{00e9}\r\n\r\n\r\n\t\n**Skills**:  Rust\u{2014}Go\u{0000}\n\n\n\nDone";
        let clean = sanitize(raw, false);
        assert!(clean
            .chars()
            .all(|c| c == '\n' || (' '..='~').contains(&c)));
        assert_no_blank_runs(&clean);
        assert_eq!(clean, "Strong fit\n\n**Skills**: RustGo\n\nDone");
    }

    #[test]
    fn test_sanitize_extended_keeps_latin1_and_drops_controls() {
        let clean = sanitize("Caf\u{00e9}\u{0085} na\u{00ef}ve\u{4e2d}", true);
        assert_eq!(clean, "Caf\u{00e9} na\u{00ef}ve");
    }

    #[test]
    fn test_sanitize_collapses_space_runs() {
        assert_eq!(sanitize("a    b  c", false), "a b c");
    }

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_at_boundary("Short.", 100), "Short.");
    }

    #[test]
    fn test_truncate_ends_at_sentence_boundary() {
        let text = "First sentence here. Second sentence here. Third sentence runs long";
        let cut = truncate_at_boundary(text, 50);
        assert_eq!(cut, "First sentence here. Second sentence here.");
    }

    #[test]
    fn test_truncate_without_late_boundary_cuts_hard() {
        let text = "A. bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
        let cut = truncate_at_boundary(text, 20);
        assert_eq!(cut.chars().count(), 20);
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let text = "\u{00e9}".repeat(30);
        assert_eq!(truncate_at_boundary(&text, 10).chars().count(), 10);
    }

    #[test]
    fn test_prepare_summary_respects_budget() {
        let raw = "Sentence number one is here.\n\n\n".repeat(100);
        let prepared = prepare_summary(
            &raw,
            SummaryOptions {
                extended_chars: false,
                max_chars: 300,
            },
        );
        assert!(prepared.chars().count() <= 300);
        assert!(prepared.ends_with('.'));
        assert_no_blank_runs(&prepared);
    }

    #[tokio::test]
    async fn test_summary_prompt_lists_answers() {
        let generator = ScriptedGenerator::new(|prompt| {
            assert!(prompt.contains("Q5: Question 5?\nA: Answer 5"));
            assert!(prompt.contains("Final score: 85/100"));
            Ok("Great candidate.".to_string())
        });
        let scores = ScoreCard::compute(85, 5);
        let resolved = write_summary(Some(&generator), &candidate(), &answers(), &scores).await;
        assert!(!resolved.is_degraded());
        assert_eq!(resolved.value, "Great candidate.");
    }

    #[tokio::test]
    async fn test_summary_failure_uses_template() {
        let generator = ScriptedGenerator::failing();
        let scores = ScoreCard::compute(85, 5);
        let resolved = write_summary(Some(&generator), &candidate(), &answers(), &scores).await;
        assert!(resolved.is_degraded());
        assert!(resolved.value.contains("Candidate: Candidate"));
        assert!(resolved.value.contains("Final Score: 85/100"));
        assert!(resolved.value.contains("Recommendation: STRONG HIRE"));
    }
}
