//! WebVTT (`.vtt`) parsing
//!
//! Like SRT with a `WEBVTT` header, dot-separated milliseconds, optional
//! cue identifiers, cue settings after the timing arrow, and inline tags.
//! `<v Name>` voice tags carry the speaker; all other tags are stripped.

use std::path::Path;

use capeval_core::{CaptionError, Result, Utterance};
use capeval_text::{clean_speaker_label, is_event_only};
use tracing::debug;

use crate::srt::parse_timing;

pub fn parse(content: &str, path: &Path) -> Result<Vec<Utterance>> {
    let mut lines = content.lines().map(|l| l.trim_end_matches('\r')).peekable();

    match lines.next() {
        Some(header) if header.trim_start_matches('\u{FEFF}').starts_with("WEBVTT") => {}
        _ => {
            return Err(CaptionError::unsupported(path, "missing WEBVTT header"));
        }
    }

    let mut utterances = Vec::new();
    let mut cue_index = 0usize;

    while let Some(line) = lines.next() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        // NOTE/STYLE/REGION blocks run to the next blank line.
        if trimmed.starts_with("NOTE") || trimmed.starts_with("STYLE") || trimmed.starts_with("REGION") {
            for skipped in lines.by_ref() {
                if skipped.trim().is_empty() {
                    break;
                }
            }
            continue;
        }

        cue_index += 1;
        // Optional cue identifier line before the timing.
        let timing_line = if trimmed.contains("-->") {
            trimmed
        } else {
            match lines.next() {
                Some(next) if next.contains("-->") => next,
                _ => {
                    return Err(CaptionError::malformed(
                        path,
                        cue_index,
                        format!("expected timing line after cue identifier {trimmed:?}"),
                    ))
                }
            }
        };

        let (start, end) = parse_timing(timing_line)
            .ok_or_else(|| CaptionError::malformed(path, cue_index, format!("bad timing line {timing_line:?}")))?;
        if start > end {
            return Err(CaptionError::malformed(
                path,
                cue_index,
                format!("start {start:.3} after end {end:.3}"),
            ));
        }

        let mut text_lines = Vec::new();
        while let Some(&next) = lines.peek() {
            if next.trim().is_empty() {
                break;
            }
            text_lines.push(next.trim());
            lines.next();
        }
        let raw = text_lines.join(" ");
        let (speaker, text) = strip_cue_tags(&raw);

        utterances.push(Utterance {
            start,
            end,
            speaker: speaker.map(|s| clean_speaker_label(&s)).filter(|s| !s.is_empty()),
            is_event: is_event_only(&text),
            text,
        });
    }

    debug!(cues = utterances.len(), "parsed vtt document");
    Ok(utterances)
}

/// Remove inline `<...>` tags, returning the speaker from the first
/// `<v Name>` voice tag if present.
fn strip_cue_tags(text: &str) -> (Option<String>, String) {
    let mut speaker = None;
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let Some(close) = rest[open..].find('>') else {
            out.push_str(&rest[open..]);
            rest = "";
            break;
        };
        let tag = &rest[open + 1..open + close];
        if speaker.is_none() {
            if let Some(name) = tag.strip_prefix("v ") {
                speaker = Some(name.trim().to_string());
            } else if let Some(classed) = tag.strip_prefix("v.") {
                // `v.class Name` form carries the name after the class.
                if let Some((_, name)) = classed.split_once(' ') {
                    speaker = Some(name.trim().to_string());
                }
            }
        }
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    (speaker, out.trim().to_string())
}
