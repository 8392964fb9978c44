use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::types::{Result, SynthesisRequest, VoiceConfig, VoiceProviderType};

pub mod elevenlabs;
pub mod google_translate;

pub use elevenlabs::ElevenLabsProvider;
pub use google_translate::GoogleTranslateTtsProvider;

#[async_trait]
pub trait VoiceProvider: Send + Sync {
    /// Unique identifier for the provider (e.g., "elevenlabs")
    fn id(&self) -> &'static str;

    /// Synthesize speech from text, returning encoded audio bytes
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>>;
}

/// Build the configured provider; `None` when synthesis is disabled or
/// the selected provider lacks its credentials.
pub fn create_voice_provider(config: &VoiceConfig) -> Option<Arc<dyn VoiceProvider>> {
    let client = http_client(config.timeout_secs);
    log::debug!("Pronunciation backend: {}", config.provider.display_name());

    match config.provider {
        VoiceProviderType::GoogleTranslate => {
            let mut provider = GoogleTranslateTtsProvider::new(client);
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            Some(Arc::new(provider))
        }
        VoiceProviderType::ElevenLabs => match &config.elevenlabs {
            Some(cfg) => {
                let mut provider = ElevenLabsProvider::new(cfg.clone(), client);
                if let Some(base_url) = &config.base_url {
                    provider = provider.with_base_url(base_url.clone());
                }
                Some(Arc::new(provider))
            }
            None => {
                log::warn!("ElevenLabs selected but not configured; pronunciation disabled");
                None
            }
        },
        VoiceProviderType::Disabled => None,
    }
}

fn http_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("Falling back to default HTTP client: {}", e);
            Client::new()
        })
}
