// Recommendation pipeline: completion call, response validation, HTTP handler.
// All completion calls go through llm_client; nothing here talks to the endpoint directly.

pub mod advisor;
pub mod handlers;
pub mod models;
pub mod validator;
