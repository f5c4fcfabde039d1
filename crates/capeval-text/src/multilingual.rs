//! Multilingual tokenization for logographic and mixed-script text
//!
//! Chinese and Japanese have no whitespace word boundaries, so WER over
//! whitespace tokens would be meaningless. Comparison units are instead:
//! each CJK character is its own token, while runs of non-CJK letters and
//! digits (Latin loanwords, numbers) group into word tokens. Punctuation
//! never becomes a token.

use crate::numbers::strip_comma_grouping;

fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'     // CJK Unified Ideographs
        | '\u{3400}'..='\u{4DBF}'   // CJK Extension A
        | '\u{F900}'..='\u{FAFF}'   // CJK Compatibility Ideographs
        | '\u{3040}'..='\u{309F}'   // Hiragana
        | '\u{30A0}'..='\u{30FF}'   // Katakana
        | '\u{31F0}'..='\u{31FF}'   // Katakana Phonetic Extensions
        | '\u{AC00}'..='\u{D7AF}'   // Hangul Syllables
    )
}

/// Segment text into comparison tokens: one token per CJK character, one
/// token per run of other letters/digits, everything lowercased.
pub fn normalize_multilingual(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();

    let flush = |word: &mut String, tokens: &mut Vec<String>| {
        if !word.is_empty() {
            tokens.push(strip_comma_grouping(word));
            word.clear();
        }
    };

    for c in text.chars() {
        if is_cjk(c) {
            flush(&mut word, &mut tokens);
            tokens.push(c.to_string());
        } else if c.is_alphanumeric() {
            word.extend(c.to_lowercase());
        } else if c == ',' {
            // Keep commas between digits for grouped numbers.
            if word.chars().last().is_some_and(|p| p.is_ascii_digit()) {
                word.push(c);
            } else {
                flush(&mut word, &mut tokens);
            }
        } else {
            flush(&mut word, &mut tokens);
        }
    }
    flush(&mut word, &mut tokens);

    // A trailing comma from `123, ` never made a valid group.
    tokens
        .into_iter()
        .map(|t| t.trim_matches(',').to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cjk_per_character() {
        assert_eq!(normalize_multilingual("你好世界"), vec!["你", "好", "世", "界"]);
        assert_eq!(normalize_multilingual("こんにちは"), vec!["こ", "ん", "に", "ち", "は"]);
    }

    #[test]
    fn test_mixed_script() {
        assert_eq!(
            normalize_multilingual("我用GPT-4o模型"),
            vec!["我", "用", "gpt", "4o", "模", "型"]
        );
    }

    #[test]
    fn test_punctuation_dropped() {
        assert_eq!(normalize_multilingual("你好，世界。"), vec!["你", "好", "世", "界"]);
        assert_eq!(normalize_multilingual("！？、"), Vec::<String>::new());
    }

    #[test]
    fn test_grouped_digits() {
        assert_eq!(normalize_multilingual("有100,000,000人"), vec!["有", "100000000", "人"]);
        assert_eq!(normalize_multilingual("一共123, 好"), vec!["一", "共", "123", "好"]);
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_multilingual("你好 hello 世界");
        let again = normalize_multilingual(&once.join(" "));
        assert_eq!(once, again);
    }
}
