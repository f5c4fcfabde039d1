//! SubRip (`.srt`) parsing

use std::path::Path;

use capeval_core::{CaptionError, Result, Utterance};
use capeval_text::is_event_only;
use tracing::debug;

use crate::timecode::parse_timestamp;

pub fn parse(content: &str, path: &Path) -> Result<Vec<Utterance>> {
    let mut utterances = Vec::new();
    let mut cue_index = 0usize;
    let mut lines = content.lines().map(|l| l.trim_end_matches('\r')).peekable();

    while let Some(line) = lines.next() {
        if line.trim().is_empty() {
            continue;
        }
        cue_index += 1;

        // Sequence number line is optional in the wild; the timing line is
        // not. Accept either `N` followed by timing, or timing directly.
        let timing_line = if line.contains("-->") {
            line
        } else {
            if line.trim().parse::<u64>().is_err() {
                return Err(CaptionError::malformed(
                    path,
                    cue_index,
                    format!("expected cue number or timing line, got {:?}", line.trim()),
                ));
            }
            lines.next().ok_or_else(|| {
                CaptionError::malformed(path, cue_index, "cue number with no timing line")
            })?
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
        let text = text_lines.join(" ");

        utterances.push(Utterance {
            start,
            end,
            speaker: None,
            is_event: is_event_only(&text),
            text,
        });
    }

    debug!(cues = utterances.len(), "parsed srt document");
    Ok(utterances)
}

/// Parse `HH:MM:SS,mmm --> HH:MM:SS,mmm` (dots tolerated).
pub(crate) fn parse_timing(line: &str) -> Option<(f64, f64)> {
    let (lhs, rhs) = line.split_once("-->")?;
    // VTT puts cue settings after the end time; ignore them.
    let rhs = rhs.trim().split_whitespace().next()?;
    Some((parse_timestamp(lhs)?, parse_timestamp(rhs)?))
}
