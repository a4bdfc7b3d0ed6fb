// Content generation: the generator seam, its Gemini implementation and the
// generate/edit handlers. All LLM calls go through llm_client.

pub mod generator;
pub mod handlers;
pub mod prompts;
