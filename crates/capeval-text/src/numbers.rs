//! Deterministic number canonicalization
//!
//! "one hundred million" and "100,000,000" are the same quantity; leaving
//! them lexically different would charge three word errors for a correct
//! transcription. Both surface forms are folded to a bare digit string
//! (`100000000`). The policy is intentionally narrow and fixed:
//!
//! - digit tokens lose valid comma grouping (`1,234,567` → `1234567`);
//! - spelled-out English cardinals are folded greedily left-to-right,
//!   `and` is permitted inside a number (`one hundred and two` → `102`);
//! - a bare scale word (`million`) counts as one of that scale;
//! - ordinals, fractions and decimals-in-words pass through untouched.
//!
//! Reference and hypothesis go through this exact code path, so the
//! canonical form only has to be stable, not linguistically complete.

/// Rewrite a whitespace-tokenized word stream, folding number words and
/// comma-grouped digit strings into canonical digit tokens.
pub fn canonicalize_numbers(tokens: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if let Some((value, consumed)) = parse_spelled_number(&tokens[i..]) {
            out.push(value.to_string());
            i += consumed;
            continue;
        }
        out.push(strip_comma_grouping(&tokens[i]));
        i += 1;
    }
    out
}

/// Strip commas from a digit token when they form valid 3-digit groups.
/// `1,234,567` → `1234567`; `1,23` keeps its comma (not a grouped number).
pub fn strip_comma_grouping(token: &str) -> String {
    if !token.contains(',') {
        return token.to_string();
    }
    let groups: Vec<&str> = token.split(',').collect();
    let valid = groups.len() >= 2
        && !groups[0].is_empty()
        && groups[0].len() <= 3
        && groups[0].chars().all(|c| c.is_ascii_digit())
        && groups[1..]
            .iter()
            .all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()));
    if valid {
        groups.concat()
    } else {
        token.to_string()
    }
}

fn unit_value(word: &str) -> Option<u64> {
    Some(match word {
        "zero" => 0,
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        _ => return None,
    })
}

fn tens_value(word: &str) -> Option<u64> {
    Some(match word {
        "twenty" => 20,
        "thirty" => 30,
        "forty" => 40,
        "fifty" => 50,
        "sixty" => 60,
        "seventy" => 70,
        "eighty" => 80,
        "ninety" => 90,
        _ => return None,
    })
}

fn scale_value(word: &str) -> Option<u64> {
    Some(match word {
        "hundred" => 100,
        "thousand" => 1_000,
        "million" => 1_000_000,
        "billion" => 1_000_000_000,
        "trillion" => 1_000_000_000_000,
        _ => return None,
    })
}

/// A small word as it contributes to a running number.
enum NumberWord {
    Unit(u64),
    Tens(u64),
    Scale(u64),
    And,
}

fn classify(word: &str) -> Option<NumberWord> {
    if word == "and" {
        return Some(NumberWord::And);
    }
    // Hyphenated tens: twenty-five.
    if let Some((tens, unit)) = word.split_once('-') {
        if let (Some(t), Some(u)) = (tens_value(tens), unit_value(unit)) {
            if u >= 1 && u <= 9 {
                return Some(NumberWord::Unit(t + u));
            }
        }
    }
    if let Some(u) = unit_value(word) {
        return Some(NumberWord::Unit(u));
    }
    if let Some(t) = tens_value(word) {
        return Some(NumberWord::Tens(t));
    }
    scale_value(word).map(NumberWord::Scale)
}

/// Greedy left-to-right parse of a spelled cardinal at the head of
/// `tokens`. Returns the value and the number of tokens consumed, or
/// `None` if the head is not a number word. Trailing `and` that is not
/// followed by more number words is not consumed (`one hundred and then`
/// folds only `one hundred`).
fn parse_spelled_number(tokens: &[String]) -> Option<(u64, usize)> {
    // `and` alone never starts a number.
    match classify(&tokens[0]) {
        None | Some(NumberWord::And) => return None,
        Some(_) => {}
    }

    let mut total: u64 = 0;
    let mut current: u64 = 0;
    let mut consumed = 0;
    let mut pending_and = 0;

    // A unit may only fill an empty slot: `twenty five` and `one hundred
    // two` chain, but `four four` is two separate numbers.
    let unit_fits = |current: u64, unit: u64| {
        if current == 0 {
            return true;
        }
        if unit < 10 {
            let low = current % 100;
            low == 0 || (low >= 20 && low % 10 == 0)
        } else {
            current % 100 == 0
        }
    };

    for token in tokens {
        match classify(token) {
            Some(NumberWord::And) if consumed > 0 => {
                pending_and += 1;
            }
            Some(NumberWord::Unit(u)) if consumed == 0 || unit_fits(current, u) => {
                consumed += pending_and;
                pending_and = 0;
                current += u;
                consumed += 1;
            }
            Some(NumberWord::Tens(t)) if current % 100 == 0 => {
                consumed += pending_and;
                pending_and = 0;
                current += t;
                consumed += 1;
            }
            Some(NumberWord::Scale(s)) => {
                consumed += pending_and;
                pending_and = 0;
                if current == 0 {
                    current = 1;
                }
                if s == 100 {
                    current *= 100;
                } else {
                    total += current * s;
                    current = 0;
                }
                consumed += 1;
            }
            _ => break,
        }
    }

    Some((total + current, consumed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(words: &[&str]) -> Vec<String> {
        canonicalize_numbers(&words.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn test_spelled_cardinals() {
        assert_eq!(canon(&["one", "hundred", "million"]), vec!["100000000"]);
        assert_eq!(canon(&["twenty-five"]), vec!["25"]);
        assert_eq!(canon(&["one", "hundred", "and", "two"]), vec!["102"]);
        assert_eq!(
            canon(&["three", "thousand", "four", "hundred", "fifty", "six"]),
            vec!["3456"]
        );
        assert_eq!(canon(&["million"]), vec!["1000000"]);
    }

    #[test]
    fn test_comma_grouping() {
        assert_eq!(canon(&["100,000,000", "people"]), vec!["100000000", "people"]);
        assert_eq!(strip_comma_grouping("1,234"), "1234");
        assert_eq!(strip_comma_grouping("1,23"), "1,23");
        assert_eq!(strip_comma_grouping("abc,def"), "abc,def");
    }

    #[test]
    fn test_surrounding_words_untouched() {
        assert_eq!(
            canon(&["about", "two", "hundred", "people"]),
            vec!["about", "200", "people"]
        );
        assert_eq!(canon(&["and", "then"]), vec!["and", "then"]);
        // Trailing `and` outside a number is kept.
        assert_eq!(
            canon(&["one", "hundred", "and", "then"]),
            vec!["100", "and", "then"]
        );
    }

    #[test]
    fn test_adjacent_numbers_stay_separate() {
        assert_eq!(canon(&["four", "four"]), vec!["4", "4"]);
        assert_eq!(canon(&["nineteen", "eighty"]), vec!["19", "80"]);
        assert_eq!(canon(&["five", "twenty"]), vec!["5", "20"]);
    }

    #[test]
    fn test_reference_hypothesis_agreement() {
        // The §-defining scenario: both surface forms land on one token.
        let r = canon(&["one", "hundred", "million", "people"]);
        let h = canon(&["100,000,000", "people"]);
        assert_eq!(r, h);
    }

    #[test]
    fn test_idempotent() {
        let once = canon(&["one", "hundred", "million", "people"]);
        let twice = canonicalize_numbers(&once);
        assert_eq!(once, twice);
    }
}
