//! LLM Provider Contract
//!
//! The narrow surface the lesson pipeline consumes:
//! - Unified `LLMProvider` trait for generative backends
//! - Request/response types, including structured-output requests
//! - Error taxonomy for backend failures

mod error;
mod provider;
mod types;

pub use error::{LLMError, Result};
pub use provider::LLMProvider;
pub use types::{ChatMessage, ChatRequest, ChatResponse, MessageRole, ResponseFormat, TokenUsage};
