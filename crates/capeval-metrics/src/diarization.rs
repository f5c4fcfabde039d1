//! Diarization quality scoring: DER, JER, SCA/SCER
//!
//! DER follows the classic decomposition: reference and hypothesis
//! timelines are cropped to the collar-adjusted scoring regions, the
//! confusion-minimizing speaker mapping is solved by optimal assignment
//! over pairwise overlap, and an exact boundary sweep accumulates false
//! alarm, missed speech and confusion time. JER is deliberately not
//! time-weighted: a speaker with two seconds of speech counts as much as
//! one with twenty minutes.

use std::collections::BTreeMap;

use capeval_core::DerBreakdown;
use tracing::{debug, warn};

use crate::assignment::solve_max_assignment;
use crate::timeline::{
    overlap_duration, scoring_regions, total_duration, Span, Timeline,
};

/// Full diarization score for one reference/hypothesis pair.
#[derive(Debug, Clone)]
pub struct DiarizationScore {
    pub der: DerBreakdown,
    pub jer: f64,
    /// 1.0 when the hypothesis found the right number of speakers
    pub sca: f64,
    pub scer: f64,
    /// Confusion-minimizing hypothesis → reference label mapping
    pub mapping: BTreeMap<String, String>,
}

/// Score a hypothesis timeline against a reference timeline.
pub fn score_diarization(
    reference: &Timeline,
    hypothesis: &Timeline,
    collar: f64,
    skip_overlap: bool,
) -> DiarizationScore {
    // SCA/SCER compare raw speaker inventories, before any cropping.
    let sca = if reference.speaker_count() == hypothesis.speaker_count() {
        1.0
    } else {
        0.0
    };
    let scer = 1.0 - sca;

    let extent = reference.extent_end().max(hypothesis.extent_end());
    let regions = scoring_regions(reference, collar, skip_overlap, extent);
    let ref_cropped = reference.crop(&regions);
    let hyp_cropped = hypothesis.crop(&regions);

    // The denominator is the reference speech time with no collar applied
    // (overlap exclusion still counts): error time can only shrink as the
    // collar grows, so DER stays monotone in the collar. Dividing by the
    // collar-cropped duration instead would let a false alarm far from
    // any boundary gain weight with the collar.
    let total_regions = scoring_regions(reference, 0.0, skip_overlap, extent);
    let total = reference.crop(&total_regions).speech_duration();

    let mapping = optimal_mapping(&ref_cropped, &hyp_cropped);
    debug!(?mapping, "optimal speaker mapping");

    let der = der_components(&ref_cropped, &hyp_cropped, &mapping, total);
    let jer = jaccard_error_rate(&ref_cropped, &hyp_cropped, &mapping);

    DiarizationScore {
        der,
        jer,
        sca,
        scer,
        mapping,
    }
}

/// Solve the overlap-maximizing hypothesis → reference label mapping.
/// Labels are iterated in lexicographic order, so equal-overlap ties
/// resolve deterministically to the smallest hypothesis-label order.
pub fn optimal_mapping(reference: &Timeline, hypothesis: &Timeline) -> BTreeMap<String, String> {
    let ref_labels = reference.labels();
    let hyp_labels = hypothesis.labels();
    if ref_labels.is_empty() || hyp_labels.is_empty() {
        return BTreeMap::new();
    }

    let weights: Vec<Vec<f64>> = hyp_labels
        .iter()
        .map(|h| {
            ref_labels
                .iter()
                .map(|r| overlap_duration(hypothesis.spans(h), reference.spans(r)))
                .collect()
        })
        .collect();

    let assignment = solve_max_assignment(&weights);
    let mut mapping = BTreeMap::new();
    for (h_idx, r_idx) in assignment.into_iter().enumerate() {
        if let Some(r_idx) = r_idx {
            // A zero-overlap pairing is no mapping at all.
            if weights[h_idx][r_idx] > 0.0 {
                mapping.insert(
                    hyp_labels[h_idx].to_string(),
                    ref_labels[r_idx].to_string(),
                );
            }
        }
    }
    mapping
}

/// Exact boundary-sweep DER components. Error time accumulates over the
/// collar-cropped timelines; `total` is the collar-independent reference
/// speech duration supplied by the caller.
fn der_components(
    reference: &Timeline,
    hypothesis: &Timeline,
    mapping: &BTreeMap<String, String>,
    total: f64,
) -> DerBreakdown {
    if total <= 0.0 {
        // Documented policy: an empty reference scores 0 against an empty
        // hypothesis and maximal error otherwise. Never NaN.
        let rate = if hypothesis.speech_duration() <= 0.0 { 0.0 } else { 1.0 };
        warn!(rate, "reference has no scored speech, applying empty-reference policy");
        return DerBreakdown {
            rate,
            false_alarm: hypothesis.speech_duration(),
            missed: 0.0,
            confusion: 0.0,
            correct: 0.0,
            total: 0.0,
        };
    }

    let mut boundaries: Vec<f64> = Vec::new();
    for (_, spans) in reference.iter().chain(hypothesis.iter()) {
        for span in spans {
            boundaries.push(span.start);
            boundaries.push(span.end);
        }
    }
    boundaries.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    boundaries.dedup();

    let mut false_alarm = 0.0;
    let mut missed = 0.0;
    let mut confusion = 0.0;
    let mut correct = 0.0;

    for window in boundaries.windows(2) {
        let (start, end) = (window[0], window[1]);
        let duration = end - start;
        if duration <= 0.0 {
            continue;
        }
        let midpoint = (start + end) / 2.0;

        let ref_here: Vec<&str> = reference
            .iter()
            .filter(|(_, spans)| covers(spans, midpoint))
            .map(|(label, _)| label)
            .collect();
        let hyp_here: Vec<&str> = hypothesis
            .iter()
            .filter(|(_, spans)| covers(spans, midpoint))
            .map(|(label, _)| label)
            .collect();

        let matched = hyp_here
            .iter()
            .filter(|h| {
                mapping
                    .get(**h)
                    .is_some_and(|r| ref_here.contains(&r.as_str()))
            })
            .count();

        let n_ref = ref_here.len();
        let n_hyp = hyp_here.len();
        correct += matched as f64 * duration;
        missed += n_ref.saturating_sub(n_hyp) as f64 * duration;
        false_alarm += n_hyp.saturating_sub(n_ref) as f64 * duration;
        confusion += (n_ref.min(n_hyp) - matched) as f64 * duration;
    }

    DerBreakdown {
        rate: (false_alarm + missed + confusion) / total,
        false_alarm,
        missed,
        confusion,
        correct,
        total,
    }
}

fn covers(spans: &[Span], t: f64) -> bool {
    spans.iter().any(|s| s.start <= t && t < s.end)
}

/// JER: mean of `1 − IoU` over the union of reference speakers and
/// mapped hypothesis speakers. An unmapped reference speaker scores 1.0;
/// unmapped hypothesis speakers are false alarm and belong to DER.
fn jaccard_error_rate(
    reference: &Timeline,
    hypothesis: &Timeline,
    mapping: &BTreeMap<String, String>,
) -> f64 {
    let reverse: BTreeMap<&str, &str> = mapping
        .iter()
        .map(|(h, r)| (r.as_str(), h.as_str()))
        .collect();

    let mut entries = Vec::new();
    for (ref_label, ref_spans) in reference.iter() {
        let value = match reverse.get(ref_label) {
            Some(hyp_label) => {
                let hyp_spans = hypothesis.spans(hyp_label);
                let inter = overlap_duration(ref_spans, hyp_spans);
                let union = total_duration(ref_spans) + total_duration(hyp_spans) - inter;
                if union > 0.0 {
                    1.0 - inter / union
                } else {
                    0.0
                }
            }
            None => 1.0,
        };
        entries.push(value);
        if reverse.contains_key(ref_label) {
            // The mapped hypothesis speaker contributes the same pair
            // value once more, per the union definition.
            entries.push(value);
        }
    }

    if entries.is_empty() {
        // No reference speakers at all: mirror the empty-reference policy.
        return if hypothesis.is_empty() { 0.0 } else { 1.0 };
    }
    entries.iter().sum::<f64>() / entries.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::Span;

    fn timeline(entries: &[(&str, &[(f64, f64)])]) -> Timeline {
        Timeline::from_spans(
            entries
                .iter()
                .map(|(label, spans)| {
                    (
                        label.to_string(),
                        spans.iter().map(|&(s, e)| Span::new(s, e)).collect(),
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn test_identical_timelines_score_zero() {
        let tl = timeline(&[("A", &[(0.0, 5.0)]), ("B", &[(5.0, 10.0)])]);
        for collar in [0.0, 0.2, 1.0] {
            let score = score_diarization(&tl, &tl.clone(), collar, false);
            assert_eq!(score.der.rate, 0.0, "collar {collar}");
            assert_eq!(score.jer, 0.0, "collar {collar}");
            assert_eq!(score.sca, 1.0);
            assert_eq!(score.scer, 0.0);
        }
    }

    #[test]
    fn test_label_swap_is_free_after_mapping() {
        let reference = timeline(&[("A", &[(0.0, 5.0)]), ("B", &[(5.0, 10.0)])]);
        let hypothesis = timeline(&[("B", &[(0.0, 5.0)]), ("A", &[(5.0, 10.0)])]);
        let score = score_diarization(&reference, &hypothesis, 0.0, false);
        assert_eq!(score.der.rate, 0.0);
        assert_eq!(score.mapping.get("B").map(String::as_str), Some("A"));
        assert_eq!(score.mapping.get("A").map(String::as_str), Some("B"));
    }

    #[test]
    fn test_one_speaker_hypothesis_for_two_speaker_reference() {
        let reference = timeline(&[("A", &[(0.0, 5.0)]), ("B", &[(5.0, 10.0)])]);
        let hypothesis = timeline(&[("X", &[(0.0, 10.0)])]);
        let score = score_diarization(&reference, &hypothesis, 0.0, false);
        assert_eq!(score.sca, 0.0);
        assert_eq!(score.scer, 1.0);
        // X maps to one of the two; the other five seconds are confusion.
        assert!(score.der.rate > 0.0);
        assert!((score.der.confusion - 5.0).abs() < 1e-9);
        assert!((score.der.rate - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_false_alarm_and_miss() {
        let reference = timeline(&[("A", &[(0.0, 10.0)])]);
        let hypothesis = timeline(&[("A", &[(0.0, 12.0)])]);
        let score = score_diarization(&reference, &hypothesis, 0.0, false);
        assert!((score.der.false_alarm - 2.0).abs() < 1e-9);
        assert!((score.der.rate - 0.2).abs() < 1e-9);

        let hypothesis = timeline(&[("A", &[(0.0, 7.0)])]);
        let score = score_diarization(&reference, &hypothesis, 0.0, false);
        assert!((score.der.missed - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_collar_monotonicity() {
        let reference = timeline(&[("A", &[(0.0, 5.0)]), ("B", &[(5.0, 10.0)])]);
        let hypothesis = timeline(&[("A", &[(0.1, 5.2)]), ("B", &[(5.3, 9.8)])]);
        let mut last = f64::INFINITY;
        for collar in [0.0, 0.1, 0.25, 0.5, 1.0] {
            let score = score_diarization(&reference, &hypothesis, collar, false);
            assert!(
                score.der.rate <= last + 1e-12,
                "DER increased at collar {collar}"
            );
            last = score.der.rate;
        }
    }

    #[test]
    fn test_collar_does_not_inflate_distant_false_alarm() {
        // Many reference boundaries shrink the scored regions as the
        // collar grows; a false alarm far from every boundary must not
        // gain weight from that. The denominator ignores the collar.
        let ref_spans: Vec<(f64, f64)> = (0..10)
            .map(|i| (2.0 * i as f64, 2.0 * i as f64 + 1.0))
            .collect();
        let mut hyp_spans = ref_spans.clone();
        hyp_spans.push((100.0, 102.0));
        let reference = timeline(&[("A", ref_spans.as_slice())]);
        let hypothesis = timeline(&[("A", hyp_spans.as_slice())]);

        let strict = score_diarization(&reference, &hypothesis, 0.0, false);
        assert!((strict.der.rate - 0.2).abs() < 1e-9);
        assert!((strict.der.total - 10.0).abs() < 1e-9);

        let wide = score_diarization(&reference, &hypothesis, 0.5, false);
        assert!((wide.der.total - 10.0).abs() < 1e-9);
        assert!((wide.der.false_alarm - 2.0).abs() < 1e-9);
        assert!(wide.der.rate <= strict.der.rate + 1e-12);
        assert!((wide.der.rate - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_collar_forgives_boundary_jitter() {
        let reference = timeline(&[("A", &[(0.0, 5.0)])]);
        let hypothesis = timeline(&[("A", &[(0.05, 5.05)])]);
        let strict = score_diarization(&reference, &hypothesis, 0.0, false);
        assert!(strict.der.rate > 0.0);
        let tolerant = score_diarization(&reference, &hypothesis, 0.2, false);
        assert_eq!(tolerant.der.rate, 0.0);
    }

    #[test]
    fn test_empty_reference_policy() {
        let empty = timeline(&[]);
        let silent = score_diarization(&empty, &timeline(&[]), 0.0, false);
        assert_eq!(silent.der.rate, 0.0);
        assert_eq!(silent.jer, 0.0);

        let noisy = score_diarization(&empty, &timeline(&[("X", &[(0.0, 3.0)])]), 0.0, false);
        assert_eq!(noisy.der.rate, 1.0);
        assert_eq!(noisy.jer, 1.0);
    }

    #[test]
    fn test_jer_is_not_time_weighted() {
        // A is nearly perfect and long; B is short and completely missed.
        let reference = timeline(&[("A", &[(0.0, 100.0)]), ("B", &[(100.0, 101.0)])]);
        let hypothesis = timeline(&[("A", &[(0.0, 100.0)])]);
        let score = score_diarization(&reference, &hypothesis, 0.0, false);
        // Entries: A pair twice (0.0 each), unmapped B once (1.0).
        assert!((score.jer - 1.0 / 3.0).abs() < 1e-9);
        // DER, by contrast, barely notices the one missed second.
        assert!(score.der.rate < 0.02);
    }

    #[test]
    fn test_skip_overlap_removes_double_counting() {
        let reference = timeline(&[("A", &[(0.0, 4.0)]), ("B", &[(2.0, 6.0)])]);
        let hypothesis = timeline(&[("A", &[(0.0, 4.0)]), ("B", &[(2.0, 6.0)])]);
        let score = score_diarization(&reference, &hypothesis, 0.0, true);
        assert_eq!(score.der.rate, 0.0);
        assert!((score.der.total - 4.0).abs() < 1e-9);
    }
}
