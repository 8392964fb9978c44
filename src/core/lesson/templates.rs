//! Templates - `{{placeholder}}` rendering for prompts and markup
//!
//! Prompt templates feed the content generator; markup templates are the
//! fixed line shapes the response composer fills in. Substituted values are
//! inserted verbatim and never re-scanned, so user text containing braces
//! cannot inject placeholders.

use std::collections::BTreeMap;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("Variable not provided: {0}")]
    MissingVariable(String),

    #[error("Unterminated placeholder at byte {0}")]
    Unterminated(usize),
}

/// Placeholder values keyed by name
pub type Vars<'a> = BTreeMap<&'a str, String>;

// ============================================================================
// Rendering
// ============================================================================

/// Substitute every `{{name}}` in `template` with its value from `vars`.
///
/// A placeholder whose value is absent or blank is an error; templates only
/// name fields they cannot render without.
pub fn render(template: &str, vars: &Vars<'_>) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let offset = template.len() - rest.len() + start;
        let after = &rest[start + 2..];
        let end = after.find("}}").ok_or(TemplateError::Unterminated(offset))?;

        let name = after[..end].trim();
        let value = vars
            .get(name)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| TemplateError::MissingVariable(name.to_string()))?;
        out.push_str(value);

        rest = &after[end + 2..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Escape the characters that are significant in Telegram HTML markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Prompt Templates
// ============================================================================

/// System and user prompt pair for one generation mode
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub system: &'static str,
    pub user: &'static str,
}

impl PromptTemplate {
    /// Render both prompts against the same variables.
    pub fn render(&self, vars: &Vars<'_>) -> Result<(String, String), TemplateError> {
        Ok((render(self.system, vars)?, render(self.user, vars)?))
    }
}

pub const WORD_PROMPT: PromptTemplate = PromptTemplate {
    name: "word",
    system: "You are a friendly {{source_language}} teacher explaining vocabulary to a \
beginner whose native language is {{target_language}}. Keep everything natural, \
conversational and beginner-appropriate. Use real situations the learner might \
encounter and avoid academic explanations.",
    user: r#"Explain the {{source_language}} word "{{word}}".

Provide:
1. The word exactly as given, in {{source_language}}
2. A pronunciation guide (phonetic or simple pronunciation)
3. Other forms of the word (plurals, verb conjugations, etc.) if applicable
4. The part of speech
5. A direct translation to {{target_language}}
6. A simple definition a beginner can understand
7. {{synonym_count}} synonyms (simpler alternatives first) with their {{target_language}} translations
8. {{antonym_count}} antonyms if applicable, with their {{target_language}} translations
9. {{example_count}} realistic examples, each from a different context where possible:
   daily conversation, social media/texting, workplace/school, news/media, books/stories
10. {{collocation_count}} common collocations (word combinations) with their meaning
11. A memory tip or mnemonic to help remember the word"#,
};

pub const PASSAGE_PROMPT: PromptTemplate = PromptTemplate {
    name: "passage",
    system: "You are a {{source_language}} teacher helping a student whose native \
language is {{target_language}} read real text. Keep translations simple and \
appropriate to the context.",
    user: r#"Help me understand this {{source_language}} text: "{{text}}"

Provide:
1. The original text exactly as provided
2. A complete, natural translation to {{target_language}}
3. A word-by-word breakdown with individual translations, in reading order, excluding punctuation
4. A breakdown of the text into consecutive fragments, each a short meaningful group of words with its translation

The fragments must follow each other without gaps or overlaps: joined in order they must reproduce the original text exactly."#,
};

// ============================================================================
// Markup Templates
// ============================================================================

/// Line shapes used by the response composer. Values are escaped before
/// substitution; the tags here are the only markup in a rendered message.
pub mod markup {
    pub const WORD_HEADER: &str = "📚 <b>{{headword}}</b>";
    pub const PRONUNCIATION: &str = "🔊 <i>{{pronunciation}}</i>";
    pub const WORD_FORMS: &str = "📝 <i>{{word_forms}}</i>";
    pub const PART_OF_SPEECH: &str = "🏷️ <i>{{part_of_speech}}</i>";
    pub const TRANSLATION: &str = "🌍 <b>{{translation}}</b>";
    pub const DEFINITION: &str = "💡 {{definition}}";
    pub const SECTION: &str = "<b>{{title}}</b>";
    pub const PAIR_LINE: &str = "• <b>{{word}}</b> - {{translation}}";
    pub const EXAMPLE_LINE: &str = "• <i>{{example}}</i>\n  {{translation}}";
    pub const COLLOCATION_LINE: &str = "• <b>{{phrase}}</b> - {{meaning}}";
    pub const MEMORY_TIP: &str = "🧠 <b>Memory tip:</b> <em>{{tip}}</em>";

    pub const PASSAGE_HEADER: &str = "📖 <b>{{original}}</b>";
    pub const FULL_TRANSLATION: &str = "🌍 <i>{{translation}}</i>";
    pub const FRAGMENT_LINE: &str = "• <b>{{fragment}}</b>";
    pub const PROGRESSIVE_FIRST: &str = "• <u>{{fragment}}</u>";
    /// `prefix` carries its own separator from the source text
    pub const PROGRESSIVE_LINE: &str = "• {{prefix}}<u>{{fragment}}</u>";
    /// Appended to breakdown lines whose fragment has a translation
    pub const GLOSS: &str = " - {{translation}}";

    pub const CAPTION_HEADER: &str = "📚 <b>{{headword}}</b> <i>({{part_of_speech}})</i>";
    pub const CAPTION_SYNONYMS: &str = "🔄 {{synonyms}}";
    pub const CAPTION_EXAMPLE: &str = "💬 <i>{{example}}</i> - {{translation}}";

    pub const SYNONYMS_TITLE: &str = "🔄 Synonyms";
    pub const ANTONYMS_TITLE: &str = "↔️ Antonyms";
    pub const EXAMPLES_TITLE: &str = "💬 Examples";
    pub const COLLOCATIONS_TITLE: &str = "🔗 Collocations";
    pub const BREAKDOWN_TITLE: &str = "🧩 Breakdown";
    pub const WORD_BY_WORD_TITLE: &str = "🔤 Word by word";
}
