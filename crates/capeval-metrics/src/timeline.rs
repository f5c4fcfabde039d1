//! Per-speaker timelines and exact interval algebra
//!
//! A [`Timeline`] maps each speaker to sorted, disjoint spans of speech.
//! All scoring is exact arithmetic over interval boundaries; nothing is
//! sampled onto a grid, so collar handling introduces no quantization
//! bias.

use std::collections::BTreeMap;

use capeval_core::Document;

/// Gap below which two adjacent spans of one speaker merge. Absorbs
/// spurious fragmentation from caption cue boundaries.
pub const MERGE_EPSILON: f64 = 1e-6;

/// Label used when a multi-speaker document leaves some cues unlabeled.
pub const UNKNOWN_SPEAKER: &str = "unknown";

/// Label synthesized for fully unlabeled (single-speaker) documents.
pub const SOLO_SPEAKER: &str = "speaker";

/// A half-open time interval in seconds. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start: f64,
    pub end: f64,
}

impl Span {
    pub fn new(start: f64, end: f64) -> Self {
        Span { start, end }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Sort spans and merge any that touch or overlap (gap ≤ epsilon).
pub fn merge_spans(mut spans: Vec<Span>) -> Vec<Span> {
    spans.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(std::cmp::Ordering::Equal));
    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        if span.duration() <= 0.0 {
            continue;
        }
        match merged.last_mut() {
            Some(last) if span.start <= last.end + MERGE_EPSILON => {
                last.end = last.end.max(span.end);
            }
            _ => merged.push(span),
        }
    }
    merged
}

/// Total duration of a set of disjoint spans.
pub fn total_duration(spans: &[Span]) -> f64 {
    spans.iter().map(Span::duration).sum()
}

/// Intersection of two sorted disjoint span sets.
pub fn intersect_spans(a: &[Span], b: &[Span]) -> Vec<Span> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let start = a[i].start.max(b[j].start);
        let end = a[i].end.min(b[j].end);
        if end > start {
            out.push(Span::new(start, end));
        }
        if a[i].end <= b[j].end {
            i += 1;
        } else {
            j += 1;
        }
    }
    out
}

/// Overlap duration between two sorted disjoint span sets.
pub fn overlap_duration(a: &[Span], b: &[Span]) -> f64 {
    total_duration(&intersect_spans(a, b))
}

/// Subtract sorted disjoint `holes` from sorted disjoint `spans`.
pub fn subtract_spans(spans: &[Span], holes: &[Span]) -> Vec<Span> {
    let mut out = Vec::new();
    for &span in spans {
        let mut cursor = span.start;
        for hole in holes {
            if hole.end <= cursor {
                continue;
            }
            if hole.start >= span.end {
                break;
            }
            if hole.start > cursor {
                out.push(Span::new(cursor, hole.start.min(span.end)));
            }
            cursor = cursor.max(hole.end);
            if cursor >= span.end {
                break;
            }
        }
        if cursor < span.end {
            out.push(Span::new(cursor, span.end));
        }
    }
    out
}

/// Speech timeline of one document: speaker label → disjoint spans.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    speakers: BTreeMap<String, Vec<Span>>,
}

impl Timeline {
    /// Build the timeline of a document.
    ///
    /// Cues without a speaker inherit the most recent labeled speaker
    /// (caption formats often label only the first cue of a turn). A
    /// leading unlabeled stretch in an otherwise labeled document falls
    /// to the [`UNKNOWN_SPEAKER`] pseudo-speaker; a document with no
    /// labels at all becomes one synthetic speaker covering all speech.
    pub fn from_document(document: &Document, skip_events: bool) -> Timeline {
        let any_labeled = document.utterances.iter().any(|u| u.speaker.is_some());
        let mut by_speaker: BTreeMap<String, Vec<Span>> = BTreeMap::new();
        let mut current: Option<String> = None;

        for utt in &document.utterances {
            if skip_events && utt.is_event {
                continue;
            }
            if let Some(label) = &utt.speaker {
                current = Some(label.clone());
            }
            let label = if any_labeled {
                current.clone().unwrap_or_else(|| UNKNOWN_SPEAKER.to_string())
            } else {
                SOLO_SPEAKER.to_string()
            };
            by_speaker
                .entry(label)
                .or_default()
                .push(Span::new(utt.start, utt.end));
        }

        let speakers = by_speaker
            .into_iter()
            .map(|(label, spans)| (label, merge_spans(spans)))
            .filter(|(_, spans)| !spans.is_empty())
            .collect();
        Timeline { speakers }
    }

    pub fn from_spans(entries: Vec<(String, Vec<Span>)>) -> Timeline {
        Timeline {
            speakers: entries
                .into_iter()
                .map(|(label, spans)| (label, merge_spans(spans)))
                .filter(|(_, spans)| !spans.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.speakers.is_empty()
    }

    pub fn speaker_count(&self) -> usize {
        self.speakers.len()
    }

    /// Speaker labels in lexicographic order.
    pub fn labels(&self) -> Vec<&str> {
        self.speakers.keys().map(String::as_str).collect()
    }

    pub fn spans(&self, label: &str) -> &[Span] {
        self.speakers.get(label).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Span])> {
        self.speakers.iter().map(|(l, s)| (l.as_str(), s.as_slice()))
    }

    /// Merged union of all speakers' spans.
    pub fn support(&self) -> Vec<Span> {
        merge_spans(self.speakers.values().flatten().copied().collect())
    }

    /// Total speech time summed over speakers (overlap counted once per
    /// speaker, as DER's reference total requires).
    pub fn speech_duration(&self) -> f64 {
        self.speakers.values().map(|s| total_duration(s)).sum()
    }

    /// Latest span end over all speakers.
    pub fn extent_end(&self) -> f64 {
        self.speakers
            .values()
            .flatten()
            .map(|s| s.end)
            .fold(0.0, f64::max)
    }

    /// Restrict every speaker to the given scoring regions.
    pub fn crop(&self, regions: &[Span]) -> Timeline {
        Timeline {
            speakers: self
                .speakers
                .iter()
                .map(|(label, spans)| (label.clone(), intersect_spans(spans, regions)))
                .filter(|(_, spans)| !spans.is_empty())
                .collect(),
        }
    }

    /// Regions where at least `min_speakers` speakers talk at once.
    pub fn concurrency_regions(&self, min_speakers: usize) -> Vec<Span> {
        let mut boundaries: Vec<(f64, i32)> = Vec::new();
        for spans in self.speakers.values() {
            for span in spans {
                boundaries.push((span.start, 1));
                boundaries.push((span.end, -1));
            }
        }
        boundaries.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.1.cmp(&a.1))
        });

        let mut out = Vec::new();
        let mut depth = 0i32;
        let mut open: Option<f64> = None;
        for (t, delta) in boundaries {
            depth += delta;
            if depth >= min_speakers as i32 && open.is_none() {
                open = Some(t);
            } else if depth < min_speakers as i32 {
                if let Some(start) = open.take() {
                    if t > start {
                        out.push(Span::new(start, t));
                    }
                }
            }
        }
        merge_spans(out)
    }
}

/// Scoring regions for a reference timeline: the common extent minus a
/// `collar / 2` window on each side of every reference boundary, and
/// minus reference overlap regions when `skip_overlap` is set.
pub fn scoring_regions(
    reference: &Timeline,
    collar: f64,
    skip_overlap: bool,
    extent_end: f64,
) -> Vec<Span> {
    let mut regions = vec![Span::new(0.0, extent_end.max(reference.extent_end()))];

    if collar > 0.0 {
        let half = collar / 2.0;
        let mut holes = Vec::new();
        for (_, spans) in reference.iter() {
            for span in spans {
                holes.push(Span::new(span.start - half, span.start + half));
                holes.push(Span::new(span.end - half, span.end + half));
            }
        }
        regions = subtract_spans(&regions, &merge_spans(holes));
    }

    if skip_overlap {
        let overlapped = reference.concurrency_regions(2);
        regions = subtract_spans(&regions, &overlapped);
    }

    regions
}
