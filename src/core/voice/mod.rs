//! Voice Synthesis Module
//!
//! Text-to-speech providers used for pronunciation clips.

pub mod providers;
pub mod types;

pub use providers::{create_voice_provider, VoiceProvider};
pub use types::{OutputFormat, SynthesisRequest, VoiceConfig, VoiceError, VoiceProviderType};
