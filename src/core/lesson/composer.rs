//! Response Composer
//!
//! Renders a validated lesson into Telegram-style HTML. Word lessons also get
//! a short caption that fits the platform's attachment caption limit, so the
//! pronunciation clip can carry the essentials.

use std::ops::Range;

use crate::config::LessonConfig;

use super::schema::{Fragment, Lesson, PassageBreakdown, WordExplanation};
use super::templates::{escape_html, markup, render, TemplateError, Vars};
use super::BreakdownStyle;

const ELLIPSIS: char = '…';

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompositionError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Malformed template: {0}")]
    Template(String),
}

impl From<TemplateError> for CompositionError {
    fn from(e: TemplateError) -> Self {
        match e {
            TemplateError::MissingVariable(name) => CompositionError::MissingField(name),
            other => CompositionError::Template(other.to_string()),
        }
    }
}

/// Rendered messages for one lesson
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub full: String,
    /// Short variant for attaching to the audio clip. `None` when the lesson
    /// has no caption form or nothing useful fits the limit.
    pub caption: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResponseComposer {
    caption_limit: usize,
    breakdown_style: BreakdownStyle,
}

impl ResponseComposer {
    pub fn new(caption_limit: usize, breakdown_style: BreakdownStyle) -> Self {
        Self {
            caption_limit,
            breakdown_style,
        }
    }

    pub fn from_config(config: &LessonConfig) -> Self {
        Self::new(config.caption_limit, config.breakdown_style)
    }

    pub fn compose(&self, lesson: &Lesson) -> Result<Composition, CompositionError> {
        match lesson {
            Lesson::Word(word) => Ok(Composition {
                full: self.render_word(word)?,
                caption: self.render_caption(word)?,
            }),
            Lesson::Passage(passage) => Ok(Composition {
                full: self.render_passage(passage)?,
                caption: None,
            }),
        }
    }

    // ========================================================================
    // Word
    // ========================================================================

    fn render_word(&self, word: &WordExplanation) -> Result<String, CompositionError> {
        let mut blocks = Vec::new();

        let mut header = vec![fill(markup::WORD_HEADER, &[("headword", &word.headword)])?];
        if let Some(pronunciation) = present(&word.pronunciation) {
            header.push(fill(markup::PRONUNCIATION, &[("pronunciation", pronunciation)])?);
        }
        if let Some(forms) = present(&word.word_forms) {
            header.push(fill(markup::WORD_FORMS, &[("word_forms", forms)])?);
        }
        header.push(fill(
            markup::PART_OF_SPEECH,
            &[("part_of_speech", &word.part_of_speech)],
        )?);
        blocks.push(header.join("\n"));

        blocks.push(
            [
                fill(markup::TRANSLATION, &[("translation", &word.translation)])?,
                fill(markup::DEFINITION, &[("definition", &word.simple_definition)])?,
            ]
            .join("\n"),
        );

        let synonyms = word
            .synonyms
            .iter()
            .map(|s| fill(markup::PAIR_LINE, &[("word", &s.word), ("translation", &s.translation)]))
            .collect::<Result<Vec<_>, _>>()?;
        blocks.extend(section(markup::SYNONYMS_TITLE, synonyms)?);

        let antonyms = word
            .antonyms
            .iter()
            .map(|a| fill(markup::PAIR_LINE, &[("word", &a.word), ("translation", &a.translation)]))
            .collect::<Result<Vec<_>, _>>()?;
        blocks.extend(section(markup::ANTONYMS_TITLE, antonyms)?);

        let examples = word
            .examples
            .iter()
            .map(|e| {
                fill(
                    markup::EXAMPLE_LINE,
                    &[("example", &e.example_text), ("translation", &e.translation)],
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        blocks.extend(section(markup::EXAMPLES_TITLE, examples)?);

        let collocations = word
            .collocations
            .iter()
            .map(|c| fill(markup::COLLOCATION_LINE, &[("phrase", &c.phrase), ("meaning", &c.meaning)]))
            .collect::<Result<Vec<_>, _>>()?;
        blocks.extend(section(markup::COLLOCATIONS_TITLE, collocations)?);

        if let Some(tip) = present(&word.memory_tip) {
            blocks.push(fill(markup::MEMORY_TIP, &[("tip", tip)])?);
        }

        Ok(blocks.join("\n\n"))
    }

    /// Caption for the audio clip, shrunk step by step until it fits: drop
    /// the example, drop the synonyms, then shorten the definition.
    fn render_caption(&self, word: &WordExplanation) -> Result<Option<String>, CompositionError> {
        let definition = word.simple_definition.as_str();

        for (synonyms, example) in [(true, true), (true, false), (false, false)] {
            let caption = caption_text(word, definition, synonyms, example)?;
            if fits(&caption, self.caption_limit) {
                return Ok(Some(caption));
            }
        }

        // Room left for the escaped definition once everything else is in place
        let skeleton = caption_text(word, &ELLIPSIS.to_string(), false, false)?;
        let overhead = skeleton.chars().count() - 1;
        let Some(budget) = self.caption_limit.checked_sub(overhead) else {
            log::debug!("Caption skipped: '{}' does not fit {} chars", word.headword, self.caption_limit);
            return Ok(None);
        };

        if let Some(shortened) = shorten(definition, budget) {
            let caption = caption_text(word, &shortened, false, false)?;
            if fits(&caption, self.caption_limit) {
                return Ok(Some(caption));
            }
        }

        log::debug!("Caption skipped: '{}' does not fit {} chars", word.headword, self.caption_limit);
        Ok(None)
    }

    // ========================================================================
    // Passage
    // ========================================================================

    fn render_passage(&self, passage: &PassageBreakdown) -> Result<String, CompositionError> {
        let mut blocks = vec![[
            fill(markup::PASSAGE_HEADER, &[("original", &passage.original_text)])?,
            fill(
                markup::FULL_TRANSLATION,
                &[("translation", &passage.full_translation)],
            )?,
        ]
        .join("\n")];

        let breakdown = match self.breakdown_style {
            BreakdownStyle::Fragments => passage
                .fragments
                .iter()
                .map(|f| {
                    glossed(
                        fill(markup::FRAGMENT_LINE, &[("fragment", &f.fragment_text)])?,
                        &f.translation,
                    )
                })
                .collect::<Result<Vec<_>, _>>()?,
            BreakdownStyle::Progressive => progressive_lines(passage)?,
        };
        blocks.extend(section(markup::BREAKDOWN_TITLE, breakdown)?);

        let gloss = passage
            .word_by_word
            .iter()
            .map(|w| fill(markup::PAIR_LINE, &[("word", &w.word), ("translation", &w.translation)]))
            .collect::<Result<Vec<_>, _>>()?;
        blocks.extend(section(markup::WORD_BY_WORD_TITLE, gloss)?);

        Ok(blocks.join("\n\n"))
    }
}

/// Each line repeats everything before it and underlines the new fragment.
///
/// Prefix and fragment are cut from `original_text` so punctuation keeps its
/// source spacing. Falls back to the fragment texts joined by spaces when
/// they do not cover the original.
fn progressive_lines(passage: &PassageBreakdown) -> Result<Vec<String>, CompositionError> {
    let original = passage.original_text.as_str();
    let spans = fragment_spans(original, &passage.fragments);
    let mut lines = Vec::with_capacity(passage.fragments.len());
    let mut joined = String::new();

    for (i, fragment) in passage.fragments.iter().enumerate() {
        let (prefix, shown) = match &spans {
            Some(spans) => (
                collapse_whitespace(&original[..spans[i].start]),
                collapse_whitespace(&original[spans[i].clone()]),
            ),
            None => (joined.clone(), fragment.fragment_text.trim().to_string()),
        };

        let line = if prefix.trim().is_empty() {
            fill(markup::PROGRESSIVE_FIRST, &[("fragment", &shown)])?
        } else {
            fill(
                markup::PROGRESSIVE_LINE,
                &[("prefix", &prefix), ("fragment", &shown)],
            )?
        };
        lines.push(glossed(line, &fragment.translation)?);

        joined.push_str(fragment.fragment_text.trim());
        joined.push(' ');
    }

    Ok(lines)
}

/// Byte range of each fragment within `original`, matching non-whitespace
/// characters one by one. `None` unless the fragments cover it exactly.
fn fragment_spans(original: &str, fragments: &[Fragment]) -> Option<Vec<Range<usize>>> {
    let mut source = original.char_indices().filter(|(_, c)| !c.is_whitespace());
    let mut spans = Vec::with_capacity(fragments.len());

    for fragment in fragments {
        let mut span: Option<Range<usize>> = None;
        for expected in fragment.fragment_text.chars().filter(|c| !c.is_whitespace()) {
            let (at, c) = source.next()?;
            if c != expected {
                return None;
            }
            let end = at + c.len_utf8();
            span = Some(span.map_or(at..end, |s| s.start..end));
        }
        spans.push(span?);
    }

    match source.next() {
        Some(_) => None,
        None => Some(spans),
    }
}

/// Runs of whitespace become one space so a line stays a line.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Append the translation to a breakdown line when there is one.
fn glossed(line: String, translation: &str) -> Result<String, CompositionError> {
    if translation.trim().is_empty() {
        return Ok(line);
    }
    Ok(line + &fill(markup::GLOSS, &[("translation", translation)])?)
}

fn caption_text(
    word: &WordExplanation,
    definition: &str,
    with_synonyms: bool,
    with_example: bool,
) -> Result<String, CompositionError> {
    let mut lines = vec![
        fill(
            markup::CAPTION_HEADER,
            &[("headword", &word.headword), ("part_of_speech", &word.part_of_speech)],
        )?,
        fill(markup::TRANSLATION, &[("translation", &word.translation)])?,
        fill(markup::DEFINITION, &[("definition", definition)])?,
    ];

    if with_synonyms && !word.synonyms.is_empty() {
        let synonyms = word
            .synonyms
            .iter()
            .take(2)
            .map(|s| format!("{} ({})", s.word, s.translation))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(fill(markup::CAPTION_SYNONYMS, &[("synonyms", &synonyms)])?);
    }

    if with_example {
        if let Some(example) = word.examples.first() {
            lines.push(fill(
                markup::CAPTION_EXAMPLE,
                &[("example", &example.example_text), ("translation", &example.translation)],
            )?);
        }
    }

    Ok(lines.join("\n"))
}

/// Longest prefix of `text` that, escaped and followed by an ellipsis, takes
/// at most `budget` characters. `None` if not even one character fits.
fn shorten(text: &str, budget: usize) -> Option<String> {
    let room = budget.checked_sub(1)?;
    let mut used = 0;
    let mut cut = String::new();

    for c in text.chars() {
        let cost = escape_html(c.encode_utf8(&mut [0; 4])).chars().count();
        if used + cost > room {
            break;
        }
        used += cost;
        cut.push(c);
    }

    let cut = cut.trim_end();
    if cut.is_empty() {
        return None;
    }
    Some(format!("{}{}", cut, ELLIPSIS))
}

/// `caption_limit` counts Unicode scalar values of the marked-up caption,
/// tags included. Telegram counts UTF-16 units after parsing, so astral
/// characters such as emoji weigh one here and two there.
fn fits(text: &str, limit: usize) -> bool {
    text.chars().count() <= limit
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Render one template with HTML-escaped values.
fn fill<S: AsRef<str>>(
    template: &str,
    values: &[(&'static str, S)],
) -> Result<String, CompositionError> {
    let vars: Vars<'static> = values
        .iter()
        .map(|(name, value)| (*name, escape_html(value.as_ref())))
        .collect();
    Ok(render(template, &vars)?)
}

/// A titled block, or nothing when there are no lines.
fn section(title: &str, lines: Vec<String>) -> Result<Option<String>, CompositionError> {
    if lines.is_empty() {
        return Ok(None);
    }
    let heading = fill(markup::SECTION, &[("title", title)])?;
    Ok(Some(format!("{}\n{}", heading, lines.join("\n"))))
}
