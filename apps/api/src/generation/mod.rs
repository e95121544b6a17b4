// Profile text generation: prompt expansion and summarization.
// All LLM calls go through llm_client::CompletionService.

pub mod handlers;
pub mod profile;
pub mod prompts;
