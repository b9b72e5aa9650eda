// Resume screening: text extraction, LLM analysis and interview question generation.
// All LLM calls go through llm_client; nothing here calls the generation API directly.

pub mod analysis;
pub mod extract;
pub mod handlers;
pub mod prompts;
pub mod questions;
