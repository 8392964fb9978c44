//! Content Generator
//!
//! Builds the instruction for a lesson, submits it together with the
//! response schema to the generative backend, and turns the reply into a
//! validated [`Lesson`].

use std::sync::Arc;

use crate::config::LessonConfig;
use crate::core::llm::{ChatMessage, ChatRequest, LLMError, LLMProvider, ResponseFormat};

use super::classifier::LessonMode;
use super::schema::{Lesson, PassageBreakdown, ValidationError, WordExplanation};
use super::templates::{TemplateError, Vars, PASSAGE_PROMPT, WORD_PROMPT};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GenerationFailure {
    #[error("Backend error: {0}")]
    Backend(#[from] LLMError),

    #[error("Backend returned an empty response")]
    EmptyResponse,

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid content: {0}")]
    Validation(String),

    #[error("Prompt error: {0}")]
    Prompt(#[from] TemplateError),
}

impl From<ValidationError> for GenerationFailure {
    fn from(e: ValidationError) -> Self {
        GenerationFailure::Validation(e.to_string())
    }
}

// ============================================================================
// Generator
// ============================================================================

pub struct ContentGenerator {
    provider: Arc<dyn LLMProvider>,
    settings: LessonConfig,
    temperature: f32,
}

impl ContentGenerator {
    pub fn new(provider: Arc<dyn LLMProvider>, settings: LessonConfig, temperature: f32) -> Self {
        if !provider.supports_structured_output() {
            log::warn!(
                "Provider {} does not enforce response schemas; relying on validation",
                provider.id()
            );
        }
        Self {
            provider,
            settings,
            temperature,
        }
    }

    /// Generate and validate the lesson for `text`.
    ///
    /// Single attempt; the caller decides what a failure means for the user.
    pub async fn generate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
        mode: LessonMode,
    ) -> Result<Lesson, GenerationFailure> {
        let text = text.trim();
        let request = self.build_request(text, source_language, target_language, mode)?;

        log::debug!(
            "Requesting {} lesson from {} ({})",
            mode,
            self.provider.name(),
            self.provider.model()
        );
        let response = self.provider.chat(request).await?;

        if let Some(usage) = &response.usage {
            log::debug!(
                "Generation finished in {}ms using {} tokens",
                response.latency_ms,
                usage.total()
            );
        }

        let payload = extract_json(&response.content);
        if payload.is_empty() {
            return Err(GenerationFailure::EmptyResponse);
        }

        parse_lesson(payload, text, mode)
    }

    /// Assemble the full backend request for one lesson.
    pub fn build_request(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
        mode: LessonMode,
    ) -> Result<ChatRequest, GenerationFailure> {
        let (template, schema) = match mode {
            LessonMode::Word => (WORD_PROMPT, WordExplanation::response_schema()),
            LessonMode::Passage => (PASSAGE_PROMPT, PassageBreakdown::response_schema()),
        };

        let vars = self.prompt_vars(mode, text, source_language, target_language);
        let (system, user) = template.render(&vars)?;

        Ok(ChatRequest::new(vec![ChatMessage::user(user)])
            .with_system(system)
            .with_temperature(self.temperature)
            .with_response_format(ResponseFormat::json(schema)))
    }

    fn prompt_vars(
        &self,
        mode: LessonMode,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Vars<'static> {
        let mut vars = Vars::from([
            ("source_language", source_language.to_string()),
            ("target_language", target_language.to_string()),
        ]);

        match mode {
            LessonMode::Word => {
                vars.insert("word", text.to_string());
                vars.insert("synonym_count", self.settings.synonym_count.clone());
                vars.insert("antonym_count", self.settings.antonym_count.clone());
                vars.insert("example_count", self.settings.example_count.to_string());
                vars.insert("collocation_count", self.settings.collocation_count.clone());
            }
            LessonMode::Passage => {
                vars.insert("text", text.to_string());
            }
        }
        vars
    }
}

/// Parse and validate a backend payload for the given mode.
pub fn parse_lesson(payload: &str, input: &str, mode: LessonMode) -> Result<Lesson, GenerationFailure> {
    match mode {
        LessonMode::Word => {
            let word: WordExplanation = serde_json::from_str(payload)
                .map_err(|e| GenerationFailure::Parse(e.to_string()))?;
            Ok(Lesson::Word(word.validate()?))
        }
        LessonMode::Passage => {
            let passage: PassageBreakdown = serde_json::from_str(payload)
                .map_err(|e| GenerationFailure::Parse(e.to_string()))?;
            Ok(Lesson::Passage(passage.validate(input)?))
        }
    }
}

/// The JSON body of a reply, with surrounding whitespace and any Markdown
/// code fence removed.
pub fn extract_json(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string ("json") on the opening fence line
    let body = match inner.find('\n') {
        Some(newline) => &inner[newline + 1..],
        None => inner,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}
