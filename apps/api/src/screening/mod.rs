// Resume screening engine.
// Implements: prompt construction, reply parsing, and the evaluation pipeline.
// All LLM calls go through the `llm` backend trait — no direct HTTP calls here.

pub mod handlers;
pub mod parser;
pub mod pipeline;
pub mod prompts;
