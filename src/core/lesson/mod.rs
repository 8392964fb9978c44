//! Lesson Pipeline
//!
//! Turns a word or passage into a structured explanation with optional
//! pronunciation audio:
//!
//! ```text
//! text -> classifier -> generator -> pronunciation -> composer -> Envelope
//! ```

use serde::{Deserialize, Serialize};

pub mod classifier;
pub mod composer;
pub mod generator;
pub mod orchestrator;
pub mod pronunciation;
pub mod schema;
pub mod templates;

pub use classifier::{classify, ClassificationError, LessonMode};
pub use composer::{Composition, CompositionError, ResponseComposer};
pub use generator::{ContentGenerator, GenerationFailure};
pub use orchestrator::{Envelope, LessonPipeline, Stage};
pub use pronunciation::{AudioHandle, PronunciationSynthesizer};
pub use schema::{Lesson, PassageBreakdown, ValidationError, WordExplanation};

/// Language pair for a lesson, as names the backend understands
/// ("dutch", "english").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Languages {
    /// Language being learned
    pub source: String,
    /// Learner's language, used for translations
    pub target: String,
}

impl Languages {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl Default for Languages {
    fn default() -> Self {
        Self::new("dutch", "english")
    }
}

/// How a passage's fragments are laid out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownStyle {
    /// One line per fragment
    #[default]
    Fragments,
    /// Each line repeats the text so far with the new fragment underlined
    Progressive,
}
