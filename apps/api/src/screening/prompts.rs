// All LLM prompt constants for the Screening module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Resume analysis prompt. Replace `{job_description}`, `{resume_text}` and
/// `{json_only}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Job Description: {job_description}

Resume: {resume_text}

Extract the candidate's full name and academic marks/CGPA for 10th, PU (12th) and Engineering,
score this resume out of 100 against the job description, and return a JSON object with this EXACT schema:
{
  "name": "Full name from resume",
  "10th_marks": "CGPA or percentage",
  "pu_marks": "CGPA or percentage",
  "engineering_cgpa": "CGPA",
  "score": 88,
  "match_percentage": "88%",
  "strengths": ["Python", "ML", "3+ years"],
  "gaps": ["No AWS", "No leadership"],
  "summary": "Strong technical fit"
}

Rules:
- "score" is an integer between 0 and 100.
- Use null for marks that are not present in the resume.
- Do not invent details that are not in the resume.

{json_only}"#;

/// Question generation prompt. Replace `{count}`, `{job_description}` and
/// `{resume_text}` before sending.
pub const QUESTIONS_PROMPT_TEMPLATE: &str = "Based on this JD and the candidate's resume, \
generate exactly {count} relevant behavioral and technical interview questions tailored to \
the candidate's experience and skills mentioned in the resume:
JD: {job_description}
Resume: {resume_text}
Return only the questions, one per line.";
