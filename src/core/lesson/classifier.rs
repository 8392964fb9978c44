//! Request classification
//!
//! Decides whether incoming text is a single lexical item or a passage.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    #[error("Input contains no words")]
    EmptyInput,
}

/// Generation strategy for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonMode {
    Word,
    Passage,
}

impl LessonMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Word => "word",
            Self::Passage => "passage",
        }
    }
}

impl std::fmt::Display for LessonMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify `text` by its number of whitespace-separated tokens.
///
/// Punctuation attached to a token does not split it, so `"deur."` is still
/// a word.
pub fn classify(text: &str) -> Result<LessonMode, ClassificationError> {
    let mut tokens = text.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (None, _) => Err(ClassificationError::EmptyInput),
        (Some(_), None) => Ok(LessonMode::Word),
        (Some(_), Some(_)) => Ok(LessonMode::Passage),
    }
}
