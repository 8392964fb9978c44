//! LLM Provider Trait
//!
//! Defines the trait that all LLM providers must implement.

use async_trait::async_trait;

use super::error::Result;
use super::types::{ChatRequest, ChatResponse};

/// Trait that all LLM providers must implement
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Get the provider's unique identifier
    fn id(&self) -> &'static str;

    /// Get the provider's display name
    fn name(&self) -> &'static str;

    /// Get the model being used
    fn model(&self) -> &str;

    /// Send a single, non-streaming completion request.
    ///
    /// When `request.response_format` is set the provider must ask the
    /// backend for output matching the attached schema.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Whether the provider can honor `ResponseFormat` schemas natively
    fn supports_structured_output(&self) -> bool {
        false
    }
}
