// Mock interview: per-session state machine, answer evaluation and the HTTP
// actions that drive a session from first question to completion.

pub mod evaluation;
pub mod handlers;
pub mod prompts;
pub mod session;
pub mod store;
