//! English text canonicalization
//!
//! Mirrors the usual ASR-benchmark treatment of English: contractions are
//! expanded before anything else (so `don't` and `do not` compare equal),
//! then case, punctuation and hesitation fillers are stripped, and
//! numbers are folded to digit strings.

use crate::numbers::canonicalize_numbers;

/// Contraction rules applied in order; longer patterns first so `won't`
/// is not caught by the generic `n't` rule.
fn expand_word(word: &str) -> Option<String> {
    let lower = word.to_ascii_lowercase();
    match lower.as_str() {
        "won't" => return Some("will not".to_string()),
        "can't" => return Some("cannot".to_string()),
        "shan't" => return Some("shall not".to_string()),
        "let's" => return Some("let us".to_string()),
        "i'm" => return Some("i am".to_string()),
        _ => {}
    }
    for (suffix, expansion) in [
        ("n't", " not"),
        ("'re", " are"),
        ("'ve", " have"),
        ("'ll", " will"),
        ("'d", " would"),
        ("'s", " is"),
    ] {
        if let Some(stem) = lower.strip_suffix(suffix) {
            if !stem.is_empty() {
                return Some(format!("{stem}{expansion}"));
            }
        }
    }
    None
}

/// Expand English contractions across a whole string. Trailing
/// punctuation is split off before matching so `don't,` still expands.
pub fn expand_contractions(text: &str) -> String {
    text.split_whitespace()
        .map(|w| {
            let core_end = w
                .rfind(|c: char| c.is_alphanumeric())
                .map(|i| i + w[i..].chars().next().map_or(1, char::len_utf8))
                .unwrap_or(w.len());
            let (core, tail) = w.split_at(core_end);
            match expand_word(core) {
                Some(expanded) => format!("{expanded}{tail}"),
                None => w.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Hesitation fillers removed from both sides of the comparison.
const FILLERS: &[&str] = &["uh", "um", "umm", "mhm", "mm-hmm", "hmm", "hm", "huh", "ah", "er"];

fn is_filler(word: &str) -> bool {
    FILLERS.contains(&word)
}

/// Normalize English text to a token sequence: contraction expansion,
/// lowercasing, punctuation-to-space mapping (apostrophes removed in
/// place), filler removal, number canonicalization.
pub fn normalize_english(text: &str) -> Vec<String> {
    let expanded = expand_contractions(text);
    let mut cleaned = String::with_capacity(expanded.len());
    for c in expanded.chars() {
        if c.is_alphanumeric() || c == ',' || c == '-' || c == '\'' {
            cleaned.extend(c.to_lowercase());
        } else {
            cleaned.push(' ');
        }
    }

    let tokens: Vec<String> = cleaned
        .split_whitespace()
        .map(strip_edge_punct)
        .filter(|t| !t.is_empty() && !is_filler(t))
        .collect();

    canonicalize_numbers(&tokens)
}

/// Drop commas/hyphens/apostrophes that survive only at token edges and
/// apostrophes inside words (`o'clock` → `oclock`). A comma between
/// digits is kept for the number pass.
fn strip_edge_punct(token: &str) -> String {
    let token = token.trim_matches(|c| c == ',' || c == '-' || c == '\'');
    let mut out = String::with_capacity(token.len());
    let chars: Vec<char> = token.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '\'' => {}
            ',' | '-' => {
                let digit_context = i > 0
                    && i + 1 < chars.len()
                    && chars[i - 1].is_ascii_digit()
                    && chars[i + 1].is_ascii_digit();
                let tens_context = c == '-'
                    && i > 0
                    && i + 1 < chars.len()
                    && chars[i - 1].is_alphabetic()
                    && chars[i + 1].is_alphabetic();
                if digit_context || tens_context {
                    out.push(c);
                }
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contractions() {
        assert_eq!(expand_contractions("I'm here"), "i am here");
        assert_eq!(expand_contractions("won't don't"), "will not do not");
        assert_eq!(expand_contractions("let's go, we're late"), "let us go, we are late");
        assert_eq!(expand_contractions("that's it"), "that is it");
    }

    #[test]
    fn test_normalize_basic() {
        assert_eq!(
            normalize_english("Hello, World!"),
            vec!["hello", "world"]
        );
        assert_eq!(
            normalize_english("Uh, I think... um, yes."),
            vec!["i", "think", "yes"]
        );
    }

    #[test]
    fn test_normalize_numbers() {
        assert_eq!(
            normalize_english("one hundred million people"),
            vec!["100000000", "people"]
        );
        assert_eq!(
            normalize_english("100,000,000 people"),
            vec!["100000000", "people"]
        );
        assert_eq!(normalize_english("twenty-five dollars"), vec!["25", "dollars"]);
    }

    #[test]
    fn test_apostrophes_and_case() {
        assert_eq!(normalize_english("It's O'Clock"), vec!["it", "is", "oclock"]);
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_english("Don't say one hundred, say 100!");
        let again = normalize_english(&once.join(" "));
        assert_eq!(once, again);
    }
}
