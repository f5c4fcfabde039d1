//! Advanced SubStation Alpha (`.ass`/`.ssa`) parsing
//!
//! Only the `[Events]` section matters for evaluation. The `Format:` line
//! defines the field order of subsequent `Dialogue:` lines; `Text` is
//! always last and may itself contain commas. The `Name` field carries
//! the speaker when present; some exports instead embed `Speaker:` in the
//! text, which the timeline layer resolves via carry-forward.

use std::path::Path;

use capeval_core::{CaptionError, Result, Utterance};
use capeval_text::{clean_speaker_label, is_event_only};
use tracing::debug;

use crate::timecode::parse_timestamp;

pub fn parse(content: &str, path: &Path) -> Result<Vec<Utterance>> {
    let mut in_events = false;
    let mut field_order: Vec<String> = Vec::new();
    let mut utterances = Vec::new();
    let mut dialogue_index = 0usize;

    for line in content.lines() {
        let line = line.trim_end_matches('\r');
        let trimmed = line.trim();

        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            in_events = trimmed.eq_ignore_ascii_case("[events]");
            continue;
        }
        if !in_events {
            continue;
        }

        if let Some(fields) = trimmed.strip_prefix("Format:") {
            field_order = fields.split(',').map(|f| f.trim().to_lowercase()).collect();
            continue;
        }

        let Some(rest) = trimmed.strip_prefix("Dialogue:") else {
            continue;
        };
        dialogue_index += 1;

        if field_order.is_empty() {
            // Default V4+ event order.
            field_order = ["layer", "start", "end", "style", "name", "marginl", "marginr", "marginv", "effect", "text"]
                .iter()
                .map(|s| s.to_string())
                .collect();
        }

        // Text is the last field and may contain commas.
        let fields: Vec<&str> = rest.trim().splitn(field_order.len(), ',').collect();
        if fields.len() < field_order.len() {
            return Err(CaptionError::malformed(
                path,
                dialogue_index,
                format!("dialogue line has {} fields, format declares {}", fields.len(), field_order.len()),
            ));
        }

        let field = |name: &str| -> Option<&str> {
            field_order.iter().position(|f| f == name).map(|i| fields[i].trim())
        };

        let start_raw = field("start").unwrap_or("");
        let end_raw = field("end").unwrap_or("");
        let start = parse_timestamp(start_raw).ok_or_else(|| {
            CaptionError::malformed(path, dialogue_index, format!("bad start timestamp {start_raw:?}"))
        })?;
        let end = parse_timestamp(end_raw).ok_or_else(|| {
            CaptionError::malformed(path, dialogue_index, format!("bad end timestamp {end_raw:?}"))
        })?;
        if start > end {
            return Err(CaptionError::malformed(
                path,
                dialogue_index,
                format!("start {start:.3} after end {end:.3}"),
            ));
        }

        let speaker = field("name")
            .map(clean_speaker_label)
            .filter(|s| !s.is_empty());
        let text = strip_override_tags(field("text").unwrap_or(""))
            .replace("\\N", " ")
            .replace("\\n", " ")
            .trim()
            .to_string();

        utterances.push(Utterance {
            start,
            end,
            speaker,
            is_event: is_event_only(&text),
            text,
        });
    }

    debug!(events = utterances.len(), "parsed ass document");
    Ok(utterances)
}

/// Remove `{\...}` style override blocks.
fn strip_override_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '{' => depth += 1,
            '}' if depth > 0 => depth -= 1,
            c if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}
