use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Quota exceeded")]
    QuotaExceeded,

    #[error("Backend returned no audio")]
    EmptyAudio,
}

pub type Result<T> = std::result::Result<T, VoiceError>;

// ============================================================================
// Voice Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub provider: VoiceProviderType,
    /// Language code of the voice, i.e. the language being taught.
    pub language: String,
    /// Override the provider's API host.
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub elevenlabs: Option<ElevenLabsConfig>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            provider: VoiceProviderType::GoogleTranslate,
            language: "nl".to_string(),
            base_url: None,
            timeout_secs: 20,
            elevenlabs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VoiceProviderType {
    /// Free translate.google.com speech endpoint
    GoogleTranslate,
    ElevenLabs,
    Disabled,
}

impl VoiceProviderType {
    /// Human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::GoogleTranslate => "Google Translate TTS",
            Self::ElevenLabs => "ElevenLabs",
            Self::Disabled => "Disabled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElevenLabsConfig {
    pub api_key: String,
    pub voice_id: String,
    pub model_id: Option<String>,
}

// ============================================================================
// Domain Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub stability: f32,        // 0.0 - 1.0
    pub similarity_boost: f32, // 0.0 - 1.0
    pub style: f32,            // 0.0 - 1.0 (ElevenLabs v2 only)
    pub use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
            style: 0.0,
            use_speaker_boost: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
    /// Voice language code (e.g. "nl")
    pub language: String,
    pub settings: Option<VoiceSettings>,
    pub output_format: OutputFormat,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
            settings: None,
            output_format: OutputFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    #[default]
    Mp3,
    Wav,
    Ogg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Ogg => "ogg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::Ogg => "audio/ogg",
        }
    }
}
