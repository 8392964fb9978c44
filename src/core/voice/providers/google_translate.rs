//! Google Translate speech endpoint
//!
//! The endpoint behind translate.google.com's "listen" button. It needs no
//! key, answers with MP3 and caps each request at roughly 200 characters,
//! so longer text is split on word boundaries and the MP3 frames of each
//! part are concatenated.

use async_trait::async_trait;
use reqwest::Client;
use crate::core::voice::types::{Result, SynthesisRequest, VoiceError};
use crate::core::voice::providers::VoiceProvider;

const DEFAULT_BASE_URL: &str = "https://translate.google.com";
/// Per-request character cap of the endpoint.
pub const MAX_CHUNK_CHARS: usize = 200;

pub struct GoogleTranslateTtsProvider {
    client: Client,
    base_url: String,
}

impl GoogleTranslateTtsProvider {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        language: &str,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>> {
        let url = format!("{}/translate_tts", self.base_url);
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language),
                ("q", chunk),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await?;

        if response.status() == 429 {
            return Err(VoiceError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(VoiceError::ApiError(format!(
                "Translate TTS error {}: {}",
                status, error_text
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl VoiceProvider for GoogleTranslateTtsProvider {
    fn id(&self) -> &'static str {
        "google_translate"
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>> {
        let chunks = split_for_speech(&request.text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(VoiceError::ApiError("Nothing to synthesize".to_string()));
        }

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let bytes = self
                .fetch_chunk(chunk, &request.language, idx, chunks.len())
                .await?;
            audio.extend_from_slice(&bytes);
        }

        if audio.is_empty() {
            return Err(VoiceError::EmptyAudio);
        }
        Ok(audio)
    }
}

/// Split `text` into pieces of at most `max_chars` characters, breaking on
/// whitespace. A single word longer than the cap is hard-split.
pub fn split_for_speech(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { word_len + 1 };
        if current_len + needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
