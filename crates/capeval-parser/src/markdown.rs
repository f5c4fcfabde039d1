//! Markdown transcript parsing
//!
//! Transcripts exported as markdown carry paragraphs of running text with
//! inline bracketed timestamps and optional bold speaker prefixes:
//!
//! ```text
//! ## Chapter One
//!
//! [00:00:01.000] **Alice:** Welcome back everyone, today we are
//! talking about caption alignment. [00:00:09.500]
//!
//! [00:00:10.000] **Bob:** Thanks for having me. [00:00:12.000]
//! ```
//!
//! A paragraph's first timestamp is its start and its last is its end;
//! everything between is attributed to the paragraph's speaker. Fewer
//! than two timestamps in a paragraph is a hard error: without an end
//! the utterance has no duration and every timing metric downstream
//! would be silently wrong.

use std::path::Path;

use capeval_core::{CaptionError, Result, Utterance};
use capeval_text::{clean_speaker_label, is_event_only};
use tracing::debug;

use crate::timecode::parse_timestamp;

pub fn parse(content: &str, path: &Path) -> Result<Vec<Utterance>> {
    let mut raw = Vec::new(); // (paragraph index, start, end, speaker, text)
    let mut any_labeled = false;

    for (index, paragraph) in paragraphs(content).into_iter().enumerate() {
        let record = index + 1;
        let Some(parsed) = parse_paragraph(&paragraph, path, record)? else {
            continue;
        };
        if parsed.speaker.is_some() {
            any_labeled = true;
        }
        raw.push(parsed);
    }

    // A mixed document is multi-speaker with missing labels mapped to an
    // "unknown" pseudo-speaker; a fully unlabeled one is single-speaker.
    let utterances = raw
        .into_iter()
        .map(|p| Utterance {
            start: p.start,
            end: p.end,
            speaker: match (p.speaker, any_labeled) {
                (Some(s), _) => Some(s),
                (None, true) => Some("unknown".to_string()),
                (None, false) => None,
            },
            is_event: is_event_only(&p.text),
            text: p.text,
        })
        .collect::<Vec<_>>();

    debug!(paragraphs = utterances.len(), "parsed markdown transcript");
    Ok(utterances)
}

struct Paragraph {
    start: f64,
    end: f64,
    speaker: Option<String>,
    text: String,
}

/// Split into blank-line-separated paragraphs, dropping chapter headers.
fn paragraphs(content: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for line in content.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(current.join(" "));
                current.clear();
            }
        } else if line.trim_start().starts_with('#') {
            continue;
        } else {
            current.push(line.trim().to_string());
        }
    }
    if !current.is_empty() {
        out.push(current.join(" "));
    }
    out
}

fn parse_paragraph(paragraph: &str, path: &Path, record: usize) -> Result<Option<Paragraph>> {
    let mut stamps = Vec::new();
    let mut text = String::new();
    let mut rest = paragraph;

    while let Some(open) = rest.find('[') {
        text.push_str(&rest[..open]);
        let Some(close) = rest[open..].find(']') else {
            text.push_str(&rest[open..]);
            rest = "";
            break;
        };
        let inner = &rest[open + 1..open + close];
        match parse_timestamp(inner) {
            Some(t) => stamps.push(t),
            // Not a timestamp: an event marker or ordinary bracket, keep.
            None => text.push_str(&rest[open..=open + close]),
        }
        rest = &rest[open + close + 1..];
    }
    text.push_str(rest);
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if stamps.is_empty() && text.is_empty() {
        return Ok(None);
    }
    if stamps.len() < 2 {
        return Err(CaptionError::malformed(
            path,
            record,
            format!("paragraph has {} timestamp(s), need a start and an end", stamps.len()),
        ));
    }
    let start = stamps[0];
    let end = *stamps.last().expect("at least two stamps");
    if start > end {
        return Err(CaptionError::malformed(
            path,
            record,
            format!("start {start:.3} after end {end:.3}"),
        ));
    }

    let (speaker, text) = split_speaker_prefix(&text);
    Ok(Some(Paragraph {
        start,
        end,
        speaker,
        text,
    }))
}

/// Split a leading `**Speaker:**` (or `**Speaker**:`) prefix.
fn split_speaker_prefix(text: &str) -> (Option<String>, String) {
    let trimmed = text.trim_start();
    let Some(after_open) = trimmed.strip_prefix("**") else {
        return (None, text.trim().to_string());
    };
    let Some(close) = after_open.find("**") else {
        return (None, text.trim().to_string());
    };
    let label = &after_open[..close];
    let mut rest = &after_open[close + 2..];
    // Colon may sit inside or outside the bold markers.
    if !label.trim_end().ends_with(':') {
        let after_colon = rest.trim_start();
        let Some(stripped) = after_colon.strip_prefix(':') else {
            return (None, text.trim().to_string());
        };
        rest = stripped;
    }
    let speaker = clean_speaker_label(label);
    if speaker.is_empty() {
        return (None, text.trim().to_string());
    }
    (Some(speaker), rest.trim().to_string())
}
