// Final report: score aggregation, best-effort persistence and PDF rendering.

pub mod assembler;
pub mod handlers;
pub mod pdf;
pub mod prompts;
pub mod scoring;
pub mod summary;
