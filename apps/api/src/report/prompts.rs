// LLM prompt constants for the hiring summary.

/// Hiring summary prompt. Replace `{name}`, `{resume_text}`, `{answers}` and
/// `{final_score}` before sending.
pub const SUMMARY_PROMPT_TEMPLATE: &str = "Write a concise hiring summary for a candidate. \
Keep it short (about 6-10 sentences and 3-6 bullet points), professional, and suitable to fit in one page. Include:
- 1-line candidate summary (role fit & top skills)
- Short academic line (degree + key marks if present)
- 3 quick strengths (bulleted)
- 2 short improvement areas (bulleted)
- Final recommendation (one line)

Candidate name: {name}
Resume highlights: {resume_text}
Interview answers (short):
{answers}
Final score: {final_score}/100";
