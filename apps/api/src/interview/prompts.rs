// LLM prompt constants for answer evaluation.

/// Answer evaluation prompt. Replace `{question}` and `{answer}` before sending.
pub const EVALUATION_PROMPT_TEMPLATE: &str = "Evaluate this answer to the question.
Question: {question}
Answer: {answer}
Give feedback and score out of 10.";
