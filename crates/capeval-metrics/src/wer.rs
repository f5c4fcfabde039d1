//! Word error rate over normalized token sequences

/// Token-level Levenshtein distance, two-row DP.
pub fn edit_distance<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ta) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, tb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ta != tb);
            let deletion = prev[j + 1] + 1;
            let insertion = curr[j] + 1;
            curr[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// WER = edit distance / reference length. Unbounded above when the
/// hypothesis is much longer than the reference. An empty reference
/// scores 0.0 against an empty hypothesis and 1.0 otherwise.
pub fn word_error_rate<T: PartialEq>(reference: &[T], hypothesis: &[T]) -> f64 {
    if reference.is_empty() {
        return if hypothesis.is_empty() { 0.0 } else { 1.0 };
    }
    edit_distance(reference, hypothesis) as f64 / reference.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(s: &str) -> Vec<&str> {
        s.split_whitespace().collect()
    }

    #[test]
    fn test_edit_distance_classic() {
        let a: Vec<char> = "kitten".chars().collect();
        let b: Vec<char> = "sitting".chars().collect();
        assert_eq!(edit_distance(&a, &b), 3);
    }

    #[test]
    fn test_wer_zero_on_identical() {
        let r = tokens("the quick brown fox");
        assert_eq!(word_error_rate(&r, &r), 0.0);
    }

    #[test]
    fn test_wer_all_deletions() {
        let r = tokens("a b c");
        assert_eq!(word_error_rate(&r, &tokens("")), 1.0);
    }

    #[test]
    fn test_wer_mixed_errors() {
        let r = tokens("the quick brown fox jumps");
        let h = tokens("the quack brown dog fox jumps");
        // 1 substitution (quick→quack) + 1 insertion (dog) over 5 tokens.
        assert!((word_error_rate(&r, &h) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_wer_can_exceed_one() {
        let r = tokens("hi");
        let h = tokens("well hello there friend");
        assert!(word_error_rate(&r, &h) > 1.0);
    }

    #[test]
    fn test_empty_reference_policy() {
        assert_eq!(word_error_rate::<&str>(&[], &[]), 0.0);
        assert_eq!(word_error_rate(&[] as &[&str], &tokens("noise")), 1.0);
    }
}
