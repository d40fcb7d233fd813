// Resume tailoring: language detection, translation, and document rewriting.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod documents;
pub mod handlers;
pub mod language;
pub mod payload;
pub mod pipeline;
pub mod prompts;
pub mod summary;
pub mod translation;
