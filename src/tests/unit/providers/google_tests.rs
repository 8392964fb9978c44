//! Google Provider Unit Tests
//!
//! Exercises `generateContent` calls against a wiremock server:
//! - API key header and endpoint path
//! - Structured output configuration in the body
//! - Multi-part content and usage parsing
//! - Error status mapping and blocked prompts

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::llm::providers::GoogleProvider;
use crate::core::llm::router::{ChatMessage, ChatRequest, LLMError, LLMProvider, ResponseFormat};

const API_KEY: &str = "AIzaTestApiKey";
const ENDPOINT: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

fn provider(server: &MockServer) -> GoogleProvider {
    GoogleProvider::new(API_KEY.to_string(), "gemini-2.0-flash".to_string())
        .with_base_url(server.uri())
}

fn candidate(parts: serde_json::Value) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": parts },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 42, "candidatesTokenCount": 17 }
    })
}

fn structured_request() -> ChatRequest {
    ChatRequest::new(vec![ChatMessage::user("Explain \"deur\"")])
        .with_system("You are a Dutch teacher")
        .with_temperature(0.1)
        .with_response_format(ResponseFormat::json(json!({
            "type": "OBJECT",
            "properties": { "headword": { "type": "STRING" } },
            "required": ["headword"]
        })))
}

// =============================================================================
// Identity
// =============================================================================

#[test]
fn test_provider_identity() {
    let provider = GoogleProvider::flash(API_KEY.to_string());
    assert_eq!(provider.id(), "google");
    assert_eq!(provider.name(), "Google");
    assert_eq!(provider.model(), "gemini-2.0-flash");
    assert!(provider.supports_structured_output());
}

// =============================================================================
// Request Formatting
// =============================================================================

#[tokio::test]
async fn test_request_carries_key_and_schema() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("x-goog-api-key", API_KEY))
        .and(body_partial_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "Explain \"deur\"" }] }],
            "systemInstruction": { "parts": [{ "text": "You are a Dutch teacher" }] },
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": { "type": "OBJECT", "required": ["headword"] }
            }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(candidate(json!([{ "text": "{\"headword\":\"deur\"}" }]))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = provider(&server).chat(structured_request()).await.unwrap();

    assert_eq!(response.content, "{\"headword\":\"deur\"}");
    assert_eq!(response.provider, "google");
    assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
    let usage = response.usage.unwrap();
    assert_eq!(usage.input_tokens, 42);
    assert_eq!(usage.output_tokens, 17);
}

// =============================================================================
// Response Parsing
// =============================================================================

#[tokio::test]
async fn test_multi_part_content_is_concatenated() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate(json!([
            { "text": "{\"headword\":" },
            { "text": "\"deur\"}" }
        ]))))
        .mount(&server)
        .await;

    let response = provider(&server).chat(structured_request()).await.unwrap();
    assert_eq!(response.content, "{\"headword\":\"deur\"}");
}

#[tokio::test]
async fn test_missing_candidates_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let result = provider(&server).chat(structured_request()).await;
    assert!(matches!(result, Err(LLMError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_blocked_prompt_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    match provider(&server).chat(structured_request()).await {
        Err(LLMError::InvalidResponse(msg)) => assert!(msg.contains("SAFETY")),
        other => panic!("expected blocked prompt error, got {:?}", other),
    }
}

// =============================================================================
// Error Handling
// =============================================================================

#[tokio::test]
async fn test_rate_limit_maps_to_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exhausted"))
        .mount(&server)
        .await;

    let result = provider(&server).chat(structured_request()).await;
    assert!(matches!(result, Err(LLMError::RateLimited(msg)) if msg.contains("quota")));
}

#[tokio::test]
async fn test_forbidden_maps_to_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let result = provider(&server).chat(structured_request()).await;
    assert!(matches!(result, Err(LLMError::AuthError(_))));
}

#[tokio::test]
async fn test_server_error_maps_to_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let result = provider(&server).chat(structured_request()).await;
    assert!(matches!(result, Err(LLMError::ApiError { status: 503, .. })));
}

#[tokio::test]
async fn test_malformed_key_never_reaches_server() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let provider = GoogleProvider::new("not-a-key".to_string(), "gemini-2.0-flash".to_string())
        .with_base_url(server.uri());
    let result = provider.chat(structured_request()).await;
    assert!(matches!(result, Err(LLMError::AuthError(_))));
}
