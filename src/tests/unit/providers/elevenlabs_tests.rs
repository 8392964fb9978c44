//! ElevenLabs Provider Unit Tests

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::voice::providers::ElevenLabsProvider;
use crate::core::voice::types::ElevenLabsConfig;
use crate::core::voice::{SynthesisRequest, VoiceError, VoiceProvider};

fn provider(server: &MockServer) -> ElevenLabsProvider {
    let config = ElevenLabsConfig {
        api_key: "xi-test-key".to_string(),
        voice_id: "voice123".to_string(),
        model_id: None,
    };
    ElevenLabsProvider::new(config, reqwest::Client::new()).with_base_url(server.uri())
}

#[tokio::test]
async fn test_synthesize_request_format() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/text-to-speech/voice123"))
        .and(header("xi-api-key", "xi-test-key"))
        .and(header("accept", "audio/mpeg"))
        .and(body_partial_json(json!({
            "text": "deur",
            "model_id": "eleven_multilingual_v2",
            "language_code": "nl"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3audio".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let audio = provider(&server)
        .synthesize(&SynthesisRequest::new("deur", "nl"))
        .await
        .unwrap();
    assert_eq!(audio, b"ID3audio");
}

fn matches_status(status: u16, err: &VoiceError) -> bool {
    match status {
        429 => matches!(err, VoiceError::RateLimitExceeded),
        401 => matches!(err, VoiceError::ApiError(msg) if msg.contains("API key")),
        402 => matches!(err, VoiceError::QuotaExceeded),
        _ => matches!(err, VoiceError::ApiError(_)),
    }
}

#[tokio::test]
async fn test_status_mapping() {
    for status in [429u16, 401, 402, 500] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let err = provider(&server)
            .synthesize(&SynthesisRequest::new("deur", "nl"))
            .await
            .unwrap_err();
        assert!(matches_status(status, &err), "status {} produced {:?}", status, err);
    }
}

#[tokio::test]
async fn test_empty_audio_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let result = provider(&server)
        .synthesize(&SynthesisRequest::new("deur", "nl"))
        .await;
    assert!(matches!(result, Err(VoiceError::EmptyAudio)));
}
