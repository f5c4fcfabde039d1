//! Language-aware text normalization for caption evaluation
//!
//! WER is only meaningful over canonical token streams: the same pipeline
//! must map `"100 million"` and `100,000,000`, `don't` and `do not`,
//! `ＧＰＴ` and `GPT` onto identical tokens. Everything here is a pure
//! function of its inputs; a given `(text, language, skip_events)` triple
//! always yields the same tokens.

pub mod english;
pub mod events;
pub mod multilingual;
pub mod numbers;

use capeval_core::Language;

pub use english::{expand_contractions, normalize_english};
pub use events::{
    clean_speaker_label, decode_html_entities, fold_width, is_event_only, remove_events,
    strip_speaker_prefix,
};
pub use multilingual::normalize_multilingual;
pub use numbers::canonicalize_numbers;

/// Normalize one utterance's text into comparison tokens.
///
/// Shared preprocessing (HTML entities, width folding, soft line breaks,
/// optional event-marker removal) runs first, then the language-specific
/// path: English canonicalization for [`Language::En`], CJK-aware
/// multilingual segmentation for everything else.
pub fn normalize(text: &str, language: &Language, skip_events: bool) -> Vec<String> {
    let text = decode_html_entities(text);
    let text = fold_width(&text);
    let text = strip_speaker_prefix(&text).to_string();
    let text = text.replace("\\N", " ").replace("\\n", " ");
    let text = text.replace("...", " ");

    let text = if skip_events {
        if is_event_only(&text) {
            return Vec::new();
        }
        remove_events(&text)
    } else {
        text.trim().to_string()
    };

    if text.is_empty() {
        return Vec::new();
    }

    match language {
        Language::En => normalize_english(&text),
        _ => normalize_multilingual(&text),
    }
}
