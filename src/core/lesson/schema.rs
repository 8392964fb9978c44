//! Structured lesson content
//!
//! Typed shapes of everything the generative backend produces, the response
//! schemas sent along with each request, and the validation step that turns
//! raw backend output into content the composer can trust.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

// ============================================================================
// Error Types
// ============================================================================

/// Backend output that parsed but does not meet the content contract
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Fragments do not cover the input text (expected {expected:?}, got {actual:?})")]
    FragmentCoverage { expected: String, actual: String },
}

// ============================================================================
// Sub-entities
// ============================================================================

/// A word paired with its translation (synonyms, antonyms, word-by-word gloss)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WordTranslation {
    pub word: String,
    pub translation: String,
}

impl WordTranslation {
    pub fn new(word: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            translation: translation.into(),
        }
    }
}

/// A sentence showing the word in context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsageExample {
    pub example_text: String,
    pub translation: String,
}

impl UsageExample {
    pub fn new(example_text: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            example_text: example_text.into(),
            translation: translation.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Collocation {
    pub phrase: String,
    pub meaning: String,
}

impl Collocation {
    pub fn new(phrase: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
            meaning: meaning.into(),
        }
    }
}

/// A contiguous span of a passage with its translation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Fragment {
    pub fragment_text: String,
    pub translation: String,
}

impl Fragment {
    pub fn new(fragment_text: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            fragment_text: fragment_text.into(),
            translation: translation.into(),
        }
    }
}

// ============================================================================
// Top-level entities
// ============================================================================

/// Explanation of a single lexical item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WordExplanation {
    pub headword: String,
    pub pronunciation: Option<String>,
    pub word_forms: Option<String>,
    pub part_of_speech: String,
    pub translation: String,
    pub simple_definition: String,
    pub synonyms: Vec<WordTranslation>,
    pub antonyms: Vec<WordTranslation>,
    pub examples: Vec<UsageExample>,
    pub collocations: Vec<Collocation>,
    pub memory_tip: Option<String>,
}

/// Breakdown of a multi-word passage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PassageBreakdown {
    pub original_text: String,
    pub full_translation: String,
    pub word_by_word: Vec<WordTranslation>,
    pub fragments: Vec<Fragment>,
}

/// Validated content for one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Lesson {
    Word(WordExplanation),
    Passage(PassageBreakdown),
}

impl Lesson {
    /// Text the pronunciation clip should speak
    pub fn speech_text(&self) -> &str {
        match self {
            Lesson::Word(word) => &word.headword,
            Lesson::Passage(passage) => &passage.original_text,
        }
    }
}

// ============================================================================
// Validation
// ============================================================================

fn required(value: String, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trim both members and drop entries where either is blank.
fn pairs<T>(
    items: Vec<T>,
    split: impl Fn(T) -> (String, String),
    join: impl Fn(String, String) -> T,
) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|item| {
            let (a, b) = split(item);
            let (a, b) = (a.trim().to_string(), b.trim().to_string());
            if a.is_empty() || b.is_empty() {
                None
            } else {
                Some(join(a, b))
            }
        })
        .collect()
}

fn word_pairs(items: Vec<WordTranslation>) -> Vec<WordTranslation> {
    pairs(items, |w| (w.word, w.translation), WordTranslation::new)
}

/// Text with all whitespace removed, for coverage comparisons.
pub fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

impl WordExplanation {
    /// Normalize and check the explanation.
    ///
    /// Required fields must be non-blank; blank optional fields become
    /// `None`; list entries with a blank member are dropped.
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            headword: required(self.headword, "headword")?,
            pronunciation: optional(self.pronunciation),
            word_forms: optional(self.word_forms),
            part_of_speech: required(self.part_of_speech, "partOfSpeech")?,
            translation: required(self.translation, "translation")?,
            simple_definition: required(self.simple_definition, "simpleDefinition")?,
            synonyms: word_pairs(self.synonyms),
            antonyms: word_pairs(self.antonyms),
            examples: pairs(
                self.examples,
                |e| (e.example_text, e.translation),
                UsageExample::new,
            ),
            collocations: pairs(
                self.collocations,
                |c| (c.phrase, c.meaning),
                Collocation::new,
            ),
            memory_tip: optional(self.memory_tip),
        })
    }
}

impl PassageBreakdown {
    /// Normalize and check the breakdown against the text the user sent.
    ///
    /// `originalText` is pinned to the trimmed input. Fragments must be
    /// present and, concatenated in order, reproduce the input ignoring
    /// whitespace. Word-by-word entries without a letter or digit are
    /// punctuation and get dropped.
    pub fn validate(self, input: &str) -> Result<Self, ValidationError> {
        let echoed = required(self.original_text, "originalText")?;
        let original_text = required(input.to_string(), "originalText")?;
        if echoed != original_text {
            log::debug!("Backend echo differs from input; keeping the input verbatim");
        }

        let full_translation = required(self.full_translation, "fullTranslation")?;
        let word_by_word = word_pairs(self.word_by_word)
            .into_iter()
            .filter(|w| w.word.chars().any(char::is_alphanumeric))
            .collect();

        // Punctuation fragments may come back untranslated
        let fragments: Vec<Fragment> = self
            .fragments
            .into_iter()
            .map(|f| Fragment::new(f.fragment_text.trim(), f.translation.trim()))
            .filter(|f| !f.fragment_text.is_empty())
            .collect();
        if fragments.is_empty() {
            return Err(ValidationError::MissingField("fragments"));
        }

        let expected = compact(&original_text);
        let actual: String = fragments.iter().map(|f| compact(&f.fragment_text)).collect();
        if expected != actual {
            return Err(ValidationError::FragmentCoverage { expected, actual });
        }

        Ok(Self {
            original_text,
            full_translation,
            word_by_word,
            fragments,
        })
    }
}

// ============================================================================
// Response Schemas
// ============================================================================
//
// OpenAPI-subset schemas in the shape Gemini's `responseSchema` expects.
// `propertyOrdering` keeps the generated JSON in presentation order.

fn string(description: &str) -> Value {
    json!({ "type": "STRING", "description": description })
}

fn list(description: &str, items: Value) -> Value {
    json!({ "type": "ARRAY", "description": description, "items": items })
}

fn object(properties: &[(&str, Value)], required: &[&str]) -> Value {
    let mut props = Map::new();
    for (name, schema) in properties {
        props.insert((*name).to_string(), schema.clone());
    }
    let ordering: Vec<&str> = properties.iter().map(|(name, _)| *name).collect();
    json!({
        "type": "OBJECT",
        "properties": Value::Object(props),
        "required": required,
        "propertyOrdering": ordering,
    })
}

fn word_translation_schema(word_desc: &str) -> Value {
    object(
        &[
            ("word", string(word_desc)),
            ("translation", string("Translation of the word")),
        ],
        &["word", "translation"],
    )
}

impl WordExplanation {
    /// Schema attached to word requests
    pub fn response_schema() -> Value {
        object(
            &[
                ("headword", string("The word being explained, as given")),
                ("pronunciation", string("Phonetic or simple pronunciation guide")),
                ("wordForms", string("Other forms of the word (plural, past tense, etc.)")),
                ("partOfSpeech", string("Part of speech (noun, verb, adjective, etc.)")),
                ("translation", string("Direct translation to the target language")),
                ("simpleDefinition", string("Simple, beginner-friendly definition")),
                (
                    "synonyms",
                    list("Synonyms with translations", word_translation_schema("The synonym")),
                ),
                (
                    "antonyms",
                    list("Antonyms with translations", word_translation_schema("The antonym")),
                ),
                (
                    "examples",
                    list(
                        "Practical examples from different contexts",
                        object(
                            &[
                                ("exampleText", string("Example sentence using the word")),
                                ("translation", string("Translation of the example")),
                            ],
                            &["exampleText", "translation"],
                        ),
                    ),
                ),
                (
                    "collocations",
                    list(
                        "Common word combinations",
                        object(
                            &[
                                ("phrase", string("Common phrase or collocation")),
                                ("meaning", string("Meaning of the collocation")),
                            ],
                            &["phrase", "meaning"],
                        ),
                    ),
                ),
                ("memoryTip", string("Memory aid or mnemonic")),
            ],
            &[
                "headword",
                "partOfSpeech",
                "translation",
                "simpleDefinition",
                "synonyms",
                "antonyms",
                "examples",
                "collocations",
            ],
        )
    }
}

impl PassageBreakdown {
    /// Schema attached to passage requests
    pub fn response_schema() -> Value {
        object(
            &[
                ("originalText", string("The original text exactly as provided")),
                ("fullTranslation", string("Complete, natural translation")),
                (
                    "wordByWord",
                    list(
                        "Word-by-word gloss in reading order, punctuation excluded",
                        word_translation_schema("A word of the text"),
                    ),
                ),
                (
                    "fragments",
                    list(
                        "Consecutive fragments that together cover the whole text",
                        object(
                            &[
                                ("fragmentText", string("A contiguous span of the text")),
                                ("translation", string("Translation of this fragment")),
                            ],
                            &["fragmentText", "translation"],
                        ),
                    ),
                ),
            ],
            &["originalText", "fullTranslation", "wordByWord", "fragments"],
        )
    }
}
