use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Structured fields extracted from a resume by the analysis prompt.
///
/// `name` and `score` are required; everything else may be absent. Numbers
/// and strings are both accepted for marks because the model is inconsistent
/// about quoting them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDetails {
    pub name: String,
    #[serde(rename = "10th_marks", default, deserialize_with = "loose_text")]
    pub tenth_marks: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub pu_marks: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub engineering_cgpa: Option<String>,
    #[serde(deserialize_with = "resume_score")]
    pub score: u32,
    #[serde(default, deserialize_with = "loose_text")]
    pub match_percentage: Option<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub gaps: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl CandidateDetails {
    pub const DEFAULT_NAME: &'static str = "Candidate";
    pub const DEFAULT_SCORE: u32 = 85;

    /// Record used whenever resume analysis cannot produce a usable answer.
    pub fn fallback() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            tenth_marks: None,
            pu_marks: None,
            engineering_cgpa: None,
            score: Self::DEFAULT_SCORE,
            match_percentage: Some(format!("{}%", Self::DEFAULT_SCORE)),
            strengths: Vec::new(),
            gaps: Vec::new(),
            summary: Some("Good fit".to_string()),
        }
    }

    /// Checks the constraints serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is empty".to_string());
        }
        if self.score > 100 {
            return Err(format!("score {} is outside 0..=100", self.score));
        }
        Ok(())
    }
}

/// The screened candidate. Created once per session and never modified.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub name: String,
    pub resume_score: u32,
    #[serde(skip_serializing)]
    pub resume_text: String,
    #[serde(skip_serializing)]
    pub job_description: String,
    pub details: CandidateDetails,
}

impl Candidate {
    pub fn new(details: CandidateDetails, resume_text: String, job_description: String) -> Self {
        Self {
            name: details.name.trim().to_string(),
            resume_score: details.score,
            resume_text,
            job_description,
            details,
        }
    }
}

fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn resume_score<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) if n.is_finite() && n >= 0.0 => Ok(n.round() as u32),
        _ => Err(D::Error::custom(format!("invalid score: {value}"))),
    }
}
