//! Google Provider Implementation (API Key-based)
//!
//! Talks to the Generative Language API (`generateContent`) for Gemini
//! models. Structured output is requested through `responseMimeType` and
//! `responseSchema` in the generation config.

use crate::core::llm::router::{
    ChatRequest, ChatResponse, LLMError, LLMProvider, MessageRole, Result, TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Google provider (API key-based)
pub struct GoogleProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl GoogleProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_timeout(api_key, model, Duration::from_secs(300))
    }

    pub fn with_timeout(api_key: String, model: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        // Trim the API key at construction to ensure consistency with validation
        Self {
            api_key: api_key.trim().to_string(),
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            client,
        }
    }

    /// Point the provider at a different API host (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn flash(api_key: String) -> Self {
        Self::new(api_key, "gemini-2.0-flash".to_string())
    }

    /// Check if an API key has valid Google API key format.
    ///
    /// Google API keys typically start with "AIza". This is a pure format check
    /// and does not verify the key is actually valid with Google's API.
    pub fn is_valid_api_key_format(key: &str) -> bool {
        let trimmed = key.trim();
        !trimmed.is_empty() && trimmed.starts_with("AIza")
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn build_contents(&self, request: &ChatRequest) -> Vec<serde_json::Value> {
        request
            .messages
            .iter()
            .filter_map(|msg| {
                let role = match msg.role {
                    MessageRole::User => "user",
                    MessageRole::Assistant => "model",
                    MessageRole::System => return None,
                };
                Some(serde_json::json!({
                    "role": role,
                    "parts": [{ "text": msg.content }]
                }))
            })
            .collect()
    }

    /// Build the full `generateContent` request body.
    pub(crate) fn build_body(&self, request: &ChatRequest) -> serde_json::Value {
        let contents = self.build_contents(request);

        let mut body = serde_json::json!({ "contents": contents });

        // System-role messages and the explicit system prompt both end up here
        let mut system_parts: Vec<&str> = Vec::new();
        if let Some(system) = &request.system_prompt {
            system_parts.push(system);
        }
        system_parts.extend(
            request
                .messages
                .iter()
                .filter(|m| m.role == MessageRole::System)
                .map(|m| m.content.as_str()),
        );
        if !system_parts.is_empty() {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": system_parts.join("\n\n") }]
            });
        }

        let mut gen_config = serde_json::Map::new();
        if let Some(temp) = request.temperature {
            gen_config.insert("temperature".to_string(), serde_json::json!(temp));
        }
        if let Some(format) = &request.response_format {
            gen_config.insert(
                "responseMimeType".to_string(),
                serde_json::json!(format.mime_type),
            );
            gen_config.insert("responseSchema".to_string(), format.schema.clone());
        }
        if !gen_config.is_empty() {
            body["generationConfig"] = serde_json::Value::Object(gen_config);
        }

        body
    }
}

#[async_trait]
impl LLMProvider for GoogleProvider {
    fn id(&self) -> &'static str {
        "google"
    }

    fn name(&self) -> &'static str {
        "Google"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        if !Self::is_valid_api_key_format(&self.api_key) {
            return Err(LLMError::AuthError("Malformed Google API key".to_string()));
        }

        let body = self.build_body(&request);

        let start = std::time::Instant::now();
        let resp = self
            .client
            .post(self.endpoint())
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let latency = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(LLMError::from_status(status.as_u16(), text));
        }

        let json: serde_json::Value = resp.json().await?;

        if let Some(reason) = json["promptFeedback"]["blockReason"].as_str() {
            return Err(LLMError::InvalidResponse(format!("Prompt blocked: {}", reason)));
        }

        // Structured output can arrive split over several parts
        let content: String = json["candidates"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|c| c["content"]["parts"].as_array())
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p["text"].as_str())
                    .collect::<Vec<_>>()
                    .concat()
            })
            .ok_or_else(|| LLMError::InvalidResponse("Missing content".to_string()))?;

        let usage = json["usageMetadata"].as_object().map(|u| TokenUsage {
            input_tokens: u
                .get("promptTokenCount")
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as u32,
            output_tokens: u
                .get("candidatesTokenCount")
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as u32,
        });

        Ok(ChatResponse {
            content,
            model: self.model.clone(),
            provider: "google".to_string(),
            usage,
            finish_reason: json["candidates"]
                .as_array()
                .and_then(|arr| arr.first())
                .and_then(|c| c["finishReason"].as_str())
                .map(|s| s.to_string()),
            latency_ms: latency,
        })
    }

    fn supports_structured_output(&self) -> bool {
        true
    }
}
