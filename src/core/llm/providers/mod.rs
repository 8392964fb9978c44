//! LLM Provider Implementations
//!
//! Concrete implementations of the `LLMProvider` trait.

mod google;

pub use google::GoogleProvider;

use super::router::LLMProvider;
use crate::config::LlmConfig;
use std::sync::Arc;
use std::time::Duration;

/// Build the configured provider, or `None` when no credential is set.
pub fn create_provider(config: &LlmConfig) -> Option<Arc<dyn LLMProvider>> {
    let api_key = config.api_key.as_deref()?.trim();
    if api_key.is_empty() {
        return None;
    }

    let provider = GoogleProvider::with_timeout(
        api_key.to_string(),
        config.model.clone(),
        Duration::from_secs(config.timeout_secs),
    )
    .with_base_url(config.base_url.clone());

    Some(Arc::new(provider))
}
