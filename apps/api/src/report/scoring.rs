use serde::Serialize;

/// Fewest answers a report can be generated from.
pub const MIN_REPORT_ANSWERS: usize = 5;

const INTERVIEW_SCORE_BASE: u32 = 80;
const STRONG_HIRE_THRESHOLD: u32 = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    #[serde(rename = "STRONG HIRE")]
    StrongHire,
    #[serde(rename = "REVIEW")]
    Review,
}

impl Recommendation {
    pub fn for_score(final_score: u32) -> Self {
        if final_score >= STRONG_HIRE_THRESHOLD {
            Recommendation::StrongHire
        } else {
            Recommendation::Review
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::StrongHire => "STRONG HIRE",
            Recommendation::Review => "REVIEW",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreCard {
    pub resume_score: u32,
    pub interview_score: u32,
    pub final_score: u32,
    pub recommendation: Recommendation,
}

impl ScoreCard {
    pub fn compute(resume_score: u32, answer_count: usize) -> Self {
        let interview_score = interview_score(answer_count);
        let final_score = final_score(resume_score, interview_score);
        Self {
            resume_score,
            interview_score,
            final_score,
            recommendation: Recommendation::for_score(final_score),
        }
    }
}

/// Interview score: a flat base plus one point per answer, capped at 100.
pub fn interview_score(answer_count: usize) -> u32 {
    let answers = u32::try_from(answer_count).unwrap_or(u32::MAX);
    INTERVIEW_SCORE_BASE.saturating_add(answers).min(100)
}

/// Mean of the two scores, rounded down.
pub fn final_score(resume_score: u32, interview_score: u32) -> u32 {
    (resume_score + interview_score) / 2
}
