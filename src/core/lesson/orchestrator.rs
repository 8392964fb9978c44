//! Lesson orchestration
//!
//! Runs one request through classification, generation, pronunciation and
//! composition, and folds every outcome into an [`Envelope`] the delivery
//! layer can send without further decisions.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::{JoinError, JoinSet};
use tracing::instrument;
use uuid::Uuid;

use crate::config::{AppConfig, ConfigError, GEMINI_KEY_VAR};
use crate::core::llm::create_provider;
use crate::core::voice::create_voice_provider;

use super::classifier::classify;
use super::composer::ResponseComposer;
use super::generator::ContentGenerator;
use super::pronunciation::{AudioHandle, PronunciationSynthesizer};
use super::schema::Lesson;
use super::templates::escape_html;
use super::Languages;

const EMPTY_INPUT_REPLY: &str = "Please send me a word or a short text to explain.";

/// Progress of a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Classified,
    Generating,
    Generated,
    Failed,
    Synthesizing,
    Synthesized,
    SynthFailed,
    Composed,
}

/// Uniform result handed to the delivery layer.
///
/// `text` is always delivered as a message. `caption`, when set, goes on the
/// audio clip; a clip without one is sent bare. The holder owns `audio` and
/// should release it after sending.
#[derive(Debug)]
pub struct Envelope {
    pub ok: bool,
    pub text: String,
    pub caption: Option<String>,
    pub audio: Option<AudioHandle>,
    pub error: Option<String>,
    /// Last stage reached
    pub stage: Stage,
}

impl Envelope {
    fn failure(text: String, error: impl std::fmt::Display) -> Self {
        Self {
            ok: false,
            text,
            caption: None,
            audio: None,
            error: Some(error.to_string()),
            stage: Stage::Failed,
        }
    }

    /// Delete any audio still attached.
    pub fn release_audio(&mut self) {
        if let Some(audio) = self.audio.take() {
            audio.release();
        }
    }
}

fn apology(text: &str) -> String {
    format!(
        "Sorry, I couldn't prepare an explanation for \"{}\". Please try again in a moment.",
        escape_html(text.trim())
    )
}

fn advance(stage: &mut Stage, next: Stage) {
    log::debug!("Lesson stage {:?} -> {:?}", stage, next);
    *stage = next;
}

// ============================================================================
// Pipeline
// ============================================================================

pub struct LessonPipeline {
    generator: ContentGenerator,
    synthesizer: PronunciationSynthesizer,
    composer: ResponseComposer,
}

impl LessonPipeline {
    pub fn new(
        generator: ContentGenerator,
        synthesizer: PronunciationSynthesizer,
        composer: ResponseComposer,
    ) -> Self {
        Self {
            generator,
            synthesizer,
            composer,
        }
    }

    /// Wire up backends from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let llm = create_provider(&config.llm)
            .ok_or_else(|| ConfigError::MissingCredential(GEMINI_KEY_VAR.to_string()))?;
        let voice = create_voice_provider(&config.voice);
        if voice.is_none() {
            log::info!("Pronunciation audio disabled");
        }

        Ok(Self::new(
            ContentGenerator::new(llm, config.lesson.clone(), config.llm.temperature),
            PronunciationSynthesizer::new(voice, config.voice.language.clone()),
            ResponseComposer::from_config(&config.lesson),
        ))
    }

    /// Explain `text` for a learner of `languages.source`.
    #[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
    pub async fn explain(&self, text: &str, languages: &Languages) -> Envelope {
        let mode = match classify(text) {
            Ok(mode) => mode,
            Err(e) => {
                log::info!("Rejected request: {}", e);
                return Envelope::failure(EMPTY_INPUT_REPLY.to_string(), e);
            }
        };
        let mut stage = Stage::Classified;
        log::info!("Explaining {} ({} chars)", mode, text.trim().chars().count());

        advance(&mut stage, Stage::Generating);
        let lesson = match self
            .generator
            .generate(text, &languages.source, &languages.target, mode)
            .await
        {
            Ok(lesson) => lesson,
            Err(e) => {
                log::warn!("Generation failed for '{}': {}", text.trim(), e);
                return Envelope::failure(apology(text), e);
            }
        };
        advance(&mut stage, Stage::Generated);

        let audio = if self.synthesizer.is_enabled() {
            advance(&mut stage, Stage::Synthesizing);
            let audio = self.synthesizer.synthesize(lesson.speech_text()).await;
            let next = if audio.is_some() {
                Stage::Synthesized
            } else {
                Stage::SynthFailed
            };
            advance(&mut stage, next);
            audio
        } else {
            None
        };

        self.finish(text, &lesson, audio, stage)
    }

    /// Compose the lesson into the final envelope. A composition failure is
    /// fatal for the request and releases any audio already produced.
    fn finish(
        &self,
        text: &str,
        lesson: &Lesson,
        audio: Option<AudioHandle>,
        mut stage: Stage,
    ) -> Envelope {
        match self.composer.compose(lesson) {
            Ok(composition) => {
                advance(&mut stage, Stage::Composed);
                Envelope {
                    ok: true,
                    text: composition.full,
                    caption: composition.caption,
                    audio,
                    error: None,
                    stage,
                }
            }
            Err(e) => {
                log::error!("Composition failed for '{}': {}", text.trim(), e);
                if let Some(audio) = audio {
                    audio.release();
                }
                Envelope::failure(apology(text), e)
            }
        }
    }

    /// Explain every non-blank line of `input` as its own request.
    ///
    /// Requests run concurrently; `deliver` receives each envelope as soon
    /// as its request finishes. Returns once input is exhausted and every
    /// request has been delivered.
    pub async fn serve<R>(
        self: Arc<Self>,
        input: R,
        languages: Languages,
        mut deliver: impl FnMut(Envelope),
    ) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let mut requests = JoinSet::new();

        loop {
            tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => {
                        let pipeline = Arc::clone(&self);
                        let languages = languages.clone();
                        requests.spawn(async move { pipeline.explain(&line, &languages).await });
                    }
                    None => break,
                },
                Some(done) = requests.join_next(), if !requests.is_empty() => {
                    settle(done, &mut deliver);
                }
            }
        }

        while let Some(done) = requests.join_next().await {
            settle(done, &mut deliver);
        }
        Ok(())
    }
}

fn settle(done: Result<Envelope, JoinError>, deliver: &mut impl FnMut(Envelope)) {
    match done {
        Ok(envelope) => deliver(envelope),
        Err(e) => log::error!("Request task failed: {}", e),
    }
}
