// CV and cover letter generation.
// Prompt construction and marker parsing are pure; the only I/O is the backend
// call made by the orchestrator in generator.rs.

pub mod generator;
pub mod handlers;
pub mod markers;
pub mod prompt_builder;
pub mod prompts;
