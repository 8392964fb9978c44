//! LLM Client Module
//!
//! Provides the generative-backend interface the lesson pipeline uses.
//!
//! # Module Structure
//!
//! - `router`: `LLMProvider` trait, request/response and error types
//! - `providers`: Individual provider implementations

pub mod providers;
pub mod router;

pub use providers::{create_provider, GoogleProvider};
pub use router::{
    ChatMessage, ChatRequest, ChatResponse, LLMError, LLMProvider, MessageRole, ResponseFormat,
    Result, TokenUsage,
};
