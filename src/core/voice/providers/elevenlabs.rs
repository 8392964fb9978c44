use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use crate::core::voice::types::{Result, SynthesisRequest, VoiceError, ElevenLabsConfig};
use crate::core::voice::providers::VoiceProvider;

const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";
// Multilingual model so `language_code` is honored
const DEFAULT_MODEL: &str = "eleven_multilingual_v2";

pub struct ElevenLabsProvider {
    client: Client,
    config: ElevenLabsConfig,
    base_url: String,
}

impl ElevenLabsProvider {
    pub fn new(config: ElevenLabsConfig, client: Client) -> Self {
        Self {
            client,
            config,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl VoiceProvider for ElevenLabsProvider {
    fn id(&self) -> &'static str {
        "elevenlabs"
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>> {
        let url = format!(
            "{}/v1/text-to-speech/{}",
            self.base_url, self.config.voice_id
        );

        let settings = request.settings.clone().unwrap_or_default();

        let model_id = self.config.model_id.as_deref().unwrap_or(DEFAULT_MODEL);

        let body = json!({
            "text": request.text,
            "model_id": model_id,
            "language_code": request.language,
            "voice_settings": {
                "stability": settings.stability,
                "similarity_boost": settings.similarity_boost,
                "style": settings.style,
                "use_speaker_boost": settings.use_speaker_boost
            }
        });

        let response = self.client
            .post(&url)
            .header("xi-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .header("Accept", request.output_format.mime_type())
            .json(&body)
            .send()
            .await?;

        if response.status() == 429 {
            return Err(VoiceError::RateLimitExceeded);
        }

        if response.status() == 401 {
            return Err(VoiceError::ApiError("Invalid API key".to_string()));
        }

        if response.status() == 402 {
            return Err(VoiceError::QuotaExceeded);
        }

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(VoiceError::ApiError(format!(
                "ElevenLabs API error: {}", error_text
            )));
        }

        let audio = response.bytes().await?.to_vec();
        if audio.is_empty() {
            return Err(VoiceError::EmptyAudio);
        }
        Ok(audio)
    }
}
