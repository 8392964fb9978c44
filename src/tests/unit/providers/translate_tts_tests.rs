//! Google Translate TTS Unit Tests

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::voice::providers::google_translate::{GoogleTranslateTtsProvider, MAX_CHUNK_CHARS};
use crate::core::voice::{SynthesisRequest, VoiceError, VoiceProvider};

fn provider(server: &MockServer) -> GoogleTranslateTtsProvider {
    GoogleTranslateTtsProvider::new(reqwest::Client::new()).with_base_url(server.uri())
}

#[tokio::test]
async fn test_single_chunk_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/translate_tts"))
        .and(query_param("ie", "UTF-8"))
        .and(query_param("client", "tw-ob"))
        .and(query_param("tl", "nl"))
        .and(query_param("q", "deur"))
        .and(query_param("idx", "0"))
        .and(query_param("total", "1"))
        .and(query_param("textlen", "4"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/mpeg")
                .set_body_bytes(b"ID3mp3".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let audio = provider(&server)
        .synthesize(&SynthesisRequest::new("deur", "nl"))
        .await
        .unwrap();
    assert_eq!(audio, b"ID3mp3");
}

#[tokio::test]
async fn test_long_text_is_chunked_and_concatenated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/translate_tts"))
        .and(query_param("idx", "0"))
        .and(query_param("total", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"first-".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/translate_tts"))
        .and(query_param("idx", "1"))
        .and(query_param("total", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"second".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    // 60 words of 4 chars: 299 chars, two chunks
    let text = vec!["deur"; 60].join(" ");
    assert!(text.chars().count() > MAX_CHUNK_CHARS);

    let audio = provider(&server)
        .synthesize(&SynthesisRequest::new(text, "nl"))
        .await
        .unwrap();
    assert_eq!(audio, b"first-second");
}

#[tokio::test]
async fn test_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let result = provider(&server)
        .synthesize(&SynthesisRequest::new("deur", "nl"))
        .await;
    assert!(matches!(result, Err(VoiceError::RateLimitExceeded)));
}

#[tokio::test]
async fn test_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("nope"))
        .mount(&server)
        .await;

    let result = provider(&server)
        .synthesize(&SynthesisRequest::new("deur", "nl"))
        .await;
    assert!(matches!(result, Err(VoiceError::ApiError(msg)) if msg.contains("500")));
}

#[tokio::test]
async fn test_empty_body_is_empty_audio() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let result = provider(&server)
        .synthesize(&SynthesisRequest::new("deur", "nl"))
        .await;
    assert!(matches!(result, Err(VoiceError::EmptyAudio)));
}

#[tokio::test]
async fn test_blank_text_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = provider(&server)
        .synthesize(&SynthesisRequest::new("   ", "nl"))
        .await;
    assert!(result.is_err());
}
