//! Property-based tests for the response composer
//!
//! Tests invariants:
//! - Rendering is deterministic
//! - Captions respect the configured limit
//! - List sections exist exactly when their data does
//! - Only the fixed tag vocabulary reaches the output

use proptest::prelude::*;

use crate::core::lesson::schema::{
    Collocation, Fragment, PassageBreakdown, UsageExample, WordExplanation, WordTranslation,
};
use crate::core::lesson::templates::markup;
use crate::core::lesson::{BreakdownStyle, Lesson, ResponseComposer};

// ============================================================================
// Strategies
// ============================================================================

/// Non-blank lowercase text, including characters that need escaping
fn arb_text() -> impl Strategy<Value = String> {
    "[a-z][a-z<>&' ]{0,30}"
}

fn arb_pair() -> impl Strategy<Value = WordTranslation> {
    (arb_text(), arb_text()).prop_map(|(w, t)| WordTranslation::new(w, t))
}

fn arb_style() -> impl Strategy<Value = BreakdownStyle> {
    prop_oneof![Just(BreakdownStyle::Fragments), Just(BreakdownStyle::Progressive)]
}

prop_compose! {
    fn arb_word()(
        headword in arb_text(),
        pronunciation in proptest::option::of(arb_text()),
        word_forms in proptest::option::of(arb_text()),
        part_of_speech in arb_text(),
        translation in arb_text(),
        simple_definition in "[a-z][a-z<>&' ]{0,400}",
        synonyms in prop::collection::vec(arb_pair(), 0..6),
        antonyms in prop::collection::vec(arb_pair(), 0..4),
        examples in prop::collection::vec((arb_text(), arb_text()), 0..6),
        collocations in prop::collection::vec((arb_text(), arb_text()), 0..5),
        memory_tip in proptest::option::of(arb_text())
    ) -> WordExplanation {
        WordExplanation {
            headword,
            pronunciation,
            word_forms,
            part_of_speech,
            translation,
            simple_definition,
            synonyms,
            antonyms,
            examples: examples.into_iter().map(|(e, t)| UsageExample::new(e, t)).collect(),
            collocations: collocations.into_iter().map(|(p, m)| Collocation::new(p, m)).collect(),
            memory_tip,
        }
    }
}

prop_compose! {
    fn arb_passage()(
        fragments in prop::collection::vec((arb_text(), arb_text()), 1..6),
        full_translation in arb_text(),
        word_by_word in prop::collection::vec(arb_pair(), 0..8)
    ) -> PassageBreakdown {
        let fragments: Vec<Fragment> = fragments
            .into_iter()
            .map(|(f, t)| Fragment::new(f, t))
            .collect();
        let original_text = fragments
            .iter()
            .map(|f| f.fragment_text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        PassageBreakdown { original_text, full_translation, word_by_word, fragments }
    }
}

fn strip_tags(text: &str) -> String {
    ["<b>", "</b>", "<i>", "</i>", "<u>", "</u>", "<em>", "</em>"]
        .iter()
        .fold(text.to_string(), |acc, tag| acc.replace(tag, ""))
}

/// Lines of the block introduced by `title`, without the heading
fn section_lines<'a>(full: &'a str, title: &str) -> Option<Vec<&'a str>> {
    let heading = format!("<b>{}</b>", title);
    full.split("\n\n")
        .find(|block| block.starts_with(&heading))
        .map(|block| block.lines().skip(1).collect())
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: composing the same lesson twice is byte-identical
    #[test]
    fn prop_compose_is_deterministic(
        word in arb_word(),
        passage in arb_passage(),
        style in arb_style()
    ) {
        let composer = ResponseComposer::new(1024, style);
        for lesson in [Lesson::Word(word), Lesson::Passage(passage)] {
            let first = composer.compose(&lesson).unwrap();
            let second = composer.compose(&lesson).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    /// Property: the caption never exceeds the configured limit
    #[test]
    fn prop_caption_within_limit(word in arb_word(), limit in 0usize..1200) {
        let composition = ResponseComposer::new(limit, BreakdownStyle::Fragments)
            .compose(&Lesson::Word(word))
            .unwrap();

        if let Some(caption) = composition.caption {
            prop_assert!(
                caption.chars().count() <= limit,
                "caption of {} chars exceeds limit {}",
                caption.chars().count(),
                limit
            );
        }
    }

    /// Property: with the default limit, ordinary words always get a caption
    #[test]
    fn prop_caption_present_at_default_limit(word in arb_word()) {
        let composition = ResponseComposer::new(1024, BreakdownStyle::Fragments)
            .compose(&Lesson::Word(word))
            .unwrap();
        prop_assert!(composition.caption.is_some());
    }

    /// Property: list sections exist exactly when they have entries, one line each
    #[test]
    fn prop_sections_match_data(word in arb_word()) {
        let full = ResponseComposer::new(1024, BreakdownStyle::Fragments)
            .compose(&Lesson::Word(word.clone()))
            .unwrap()
            .full;

        for (title, count) in [
            (markup::SYNONYMS_TITLE, word.synonyms.len()),
            (markup::ANTONYMS_TITLE, word.antonyms.len()),
            (markup::COLLOCATIONS_TITLE, word.collocations.len()),
        ] {
            match section_lines(&full, title) {
                Some(lines) => {
                    prop_assert_eq!(lines.len(), count);
                }
                None => {
                    prop_assert_eq!(count, 0);
                }
            }
        }

        prop_assert_eq!(full.contains("Memory tip"), word.memory_tip.is_some());
    }

    /// Property: no markup besides the fixed tags survives in the output
    #[test]
    fn prop_values_are_escaped(
        word in arb_word(),
        passage in arb_passage(),
        style in arb_style()
    ) {
        let composer = ResponseComposer::new(1024, style);
        for lesson in [Lesson::Word(word), Lesson::Passage(passage)] {
            let composition = composer.compose(&lesson).unwrap();
            let texts = std::iter::once(composition.full).chain(composition.caption);
            for text in texts {
                let stripped = strip_tags(&text);
                prop_assert!(!stripped.contains('<') && !stripped.contains('>'), "raw markup in {}", text);
            }
        }
    }

    /// Property: the breakdown has one line per fragment in either style
    #[test]
    fn prop_breakdown_line_per_fragment(passage in arb_passage(), style in arb_style()) {
        let full = ResponseComposer::new(1024, style)
            .compose(&Lesson::Passage(passage.clone()))
            .unwrap()
            .full;
        let lines = section_lines(&full, markup::BREAKDOWN_TITLE).unwrap();
        prop_assert_eq!(lines.len(), passage.fragments.len());
    }
}
