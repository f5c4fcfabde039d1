//! Bracketed event markers, HTML entities, and Unicode width folding
//!
//! Caption sources mark non-speech with bracketed descriptions
//! (`[Laughter]`, `[♪ Music ♪]`, `[笑声]`). YouTube-style captions also
//! split a marker across cues, leaving a dangling `[speaking In` in one
//! cue and `Italian]` in the next; both halves must be removable.

/// Remove `[event]` markers from text, including split halves.
pub fn remove_events(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '[' {
            // Consume through the matching close; a missing close means a
            // marker split across cues, drop the rest of the text.
            let mut closed = false;
            for inner in chars.by_ref() {
                if inner == ']' {
                    closed = true;
                    break;
                }
            }
            if !closed {
                break;
            }
        } else {
            out.push(c);
        }
    }

    // Trailing half of a split marker: a single word then `]` at the end.
    let trimmed = out.trim();
    if let Some(stripped) = trimmed.strip_suffix(']') {
        let head = stripped.trim_end();
        if is_single_trailing_word(trimmed, head) {
            return String::new();
        }
    }
    trimmed.to_string()
}

fn is_single_trailing_word(whole: &str, head: &str) -> bool {
    // Matches `word]` / `word ]` occupying the entire remaining text.
    !whole.is_empty()
        && !head.is_empty()
        && head.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// True when the text contains only event markers, no actual speech.
pub fn is_event_only(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && remove_events(trimmed).is_empty()
}

/// Decode the HTML entities that show up in caption exports.
pub fn decode_html_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let Some(semi) = rest[..rest.len().min(12)].find(';') else {
            out.push('&');
            rest = &rest[1..];
            continue;
        };
        let entity = &rest[1..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some(' '),
            _ => decode_numeric_entity(entity),
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = if let Some(hex) = digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse::<u32>().ok()?
    };
    char::from_u32(code)
}

/// Fold fullwidth ASCII variants to halfwidth and smart quotes/primes to
/// their ASCII forms. Applied to both text and speaker labels so that
/// `ＡＬＩＣＥ：` and `ALICE:` compare equal.
pub fn fold_width(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => '\'',
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' => '"',
            '\u{3000}' => ' ',
            c if ('\u{FF01}'..='\u{FF5E}').contains(&c) => {
                char::from_u32(c as u32 - 0xFEE0).unwrap_or(c)
            }
            c => c,
        })
        .collect()
}

/// Strip an embedded speaker-label prefix from utterance text:
/// leading `>>` cue arrows and a short run of capitalized words ending
/// in `:` (`Alice:`, `>> DR SMITH: hello`). Lowercase or digit-bearing
/// heads (`10:30 meeting`) are left alone. Applied identically to
/// reference and hypothesis, so an over-eager strip cannot skew WER.
pub fn strip_speaker_prefix(text: &str) -> &str {
    let mut rest = text.trim_start();
    while let Some(stripped) = rest.strip_prefix(">>") {
        rest = stripped.trim_start();
    }
    let Some(colon) = rest.find(':') else {
        return rest;
    };
    let head = &rest[..colon];
    let tail = rest[colon + 1..].trim_start();
    let words: Vec<&str> = head.split_whitespace().collect();
    let looks_like_name = !words.is_empty()
        && words.len() <= 3
        && !tail.is_empty()
        && words.iter().all(|w| {
            w.chars().all(char::is_alphabetic)
                && w.chars().next().is_some_and(char::is_uppercase)
        });
    if looks_like_name {
        tail
    } else {
        rest
    }
}

/// Clean a speaker label: width folding, then trailing `:` and leading
/// `>` cue arrows are stripped.
pub fn clean_speaker_label(name: &str) -> String {
    let folded = fold_width(name);
    folded
        .trim()
        .trim_end_matches(':')
        .trim_start_matches('>')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_complete_events() {
        assert_eq!(remove_events("[Laughter] hello"), "hello");
        assert_eq!(remove_events("hello [Applause] world"), "hello  world");
        assert_eq!(remove_events("[♪ Music ♪]"), "");
    }

    #[test]
    fn test_remove_split_events() {
        assert_eq!(remove_events("[speaking In"), "");
        assert_eq!(remove_events("Italian]"), "");
        assert_eq!(remove_events("Italian ]"), "");
        // A real sentence ending in `]` after multiple words is kept.
        assert_eq!(remove_events("not an event marker ]"), "not an event marker ]");
    }

    #[test]
    fn test_is_event_only() {
        assert!(is_event_only("[Laughter]"));
        assert!(is_event_only(" [Music] [Applause] "));
        assert!(!is_event_only("[Laughter] ha ha"));
        assert!(!is_event_only(""));
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_html_entities("a &amp; b"), "a & b");
        assert_eq!(decode_html_entities("&gt;&gt; ALICE"), ">> ALICE");
        assert_eq!(decode_html_entities("&#39;tis"), "'tis");
        assert_eq!(decode_html_entities("no entity & here"), "no entity & here");
    }

    #[test]
    fn test_fold_width() {
        assert_eq!(fold_width("ＡＢＣ１２３"), "ABC123");
        assert_eq!(fold_width("\u{201C}quote\u{201D}"), "\"quote\"");
        assert_eq!(fold_width("a\u{3000}b"), "a b");
    }

    #[test]
    fn test_strip_speaker_prefix() {
        assert_eq!(strip_speaker_prefix("Alice: hello there"), "hello there");
        assert_eq!(strip_speaker_prefix(">> DR SMITH: good morning"), "good morning");
        assert_eq!(strip_speaker_prefix("10:30 is the meeting"), "10:30 is the meeting");
        assert_eq!(strip_speaker_prefix("we said: go"), "we said: go");
        assert_eq!(strip_speaker_prefix("no colon here"), "no colon here");
    }

    #[test]
    fn test_clean_speaker_label() {
        assert_eq!(clean_speaker_label("ＡＬＩＣＥ："), "ALICE");
        assert_eq!(clean_speaker_label(">> Bob:"), "Bob");
        assert_eq!(clean_speaker_label(" Carol "), "Carol");
    }
}
