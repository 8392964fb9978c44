//! Pronunciation Synthesizer
//!
//! Produces a spoken clip of a headword or passage. Synthesis is best-effort:
//! every failure is logged and turned into `None` so the lesson itself is
//! never held back by the speech backend.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tempfile::NamedTempFile;

use crate::core::voice::{OutputFormat, SynthesisRequest, VoiceError, VoiceProvider};

// ============================================================================
// Audio Handle
// ============================================================================

/// Synthesized audio stored in a temporary file.
///
/// The file lives as long as the handle. Call [`AudioHandle::release`] once
/// the clip has been delivered; dropping the handle removes it as well.
#[derive(Debug)]
pub struct AudioHandle {
    file: NamedTempFile,
    size: usize,
}

impl AudioHandle {
    /// Write `bytes` to a fresh temp file with the format's extension.
    pub fn from_bytes(bytes: &[u8], format: OutputFormat) -> std::io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("pronunciation-")
            .suffix(&format!(".{}", format.extension()))
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;

        Ok(Self {
            file,
            size: bytes.len(),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Size of the clip in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Delete the backing file now.
    pub fn release(self) {
        let path = self.file.path().to_path_buf();
        if let Err(e) = self.file.close() {
            log::warn!("Failed to remove audio file {}: {}", path.display(), e);
        }
    }
}

// ============================================================================
// Synthesizer
// ============================================================================

pub struct PronunciationSynthesizer {
    provider: Option<Arc<dyn VoiceProvider>>,
    language: String,
}

impl PronunciationSynthesizer {
    /// `language` is the voice language, independent of the lesson languages.
    pub fn new(provider: Option<Arc<dyn VoiceProvider>>, language: impl Into<String>) -> Self {
        Self {
            provider,
            language: language.into(),
        }
    }

    /// A synthesizer that never produces audio.
    pub fn disabled() -> Self {
        Self::new(None, String::new())
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Speak `text`, or `None` if synthesis is disabled or fails.
    pub async fn synthesize(&self, text: &str) -> Option<AudioHandle> {
        let provider = self.provider.as_ref()?;

        match self.try_synthesize(provider.as_ref(), text).await {
            Ok(handle) => {
                log::debug!(
                    "Synthesized {} bytes of audio via {}",
                    handle.size(),
                    provider.id()
                );
                Some(handle)
            }
            Err(e) => {
                log::warn!("Audio generation failed for '{}': {}", text, e);
                None
            }
        }
    }

    async fn try_synthesize(
        &self,
        provider: &dyn VoiceProvider,
        text: &str,
    ) -> Result<AudioHandle, VoiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(VoiceError::ApiError("Nothing to synthesize".to_string()));
        }

        let request = SynthesisRequest::new(text, self.language.clone());
        let bytes = provider.synthesize(&request).await?;
        if bytes.is_empty() {
            return Err(VoiceError::EmptyAudio);
        }

        Ok(AudioHandle::from_bytes(&bytes, request.output_format)?)
    }
}
