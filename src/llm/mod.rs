//! Chat-completion plumbing shared by the LLM-backed services.

mod client;
pub mod config;
mod error;
mod json;


pub use client::ChatModel;
pub use config::ChatConfig;
pub use error::LlmError;
pub use json::extract_json_object;
