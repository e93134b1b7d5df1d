// Suggestion generation: prompt → provider → tolerant parse → persist.
// Provider access goes through llm_client::TextGenerator only.

pub mod generator;
pub mod handlers;
pub mod parser;
pub mod prompts;
