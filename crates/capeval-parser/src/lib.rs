//! Caption document parsing
//!
//! Reads heterogeneous caption syntaxes into the shared [`Document`]
//! model: ASS/SSA subtitles, SRT, WebVTT, and markdown transcripts with
//! inline timestamps. Format is chosen by file extension with content
//! sniffing as fallback; anything unrecognized is an
//! [`UnsupportedFormat`](CaptionError::UnsupportedFormat) error, and
//! malformed records fail hard with the file and record index rather
//! than being repaired into wrong benchmark numbers.

pub mod ass;
pub mod markdown;
pub mod srt;
pub mod timecode;
pub mod vtt;
pub mod writer;

use std::fs;
use std::path::Path;

use capeval_core::{CaptionError, CaptionFormat, Document, Language, Result, Utterance};
use tracing::debug;

pub use writer::write_str;

/// Read and parse a caption file.
pub fn parse_path(path: impl AsRef<Path>, language: Language) -> Result<Document> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| CaptionError::io(path, e))?;
    let format = detect_format(path, &content)
        .ok_or_else(|| CaptionError::unsupported(path, "unrecognized caption syntax"))?;
    debug!(path = %path.display(), %format, "parsing caption document");
    parse_with_format(&content, format, path, language)
}

/// Parse caption content already in memory.
pub fn parse_str(content: &str, format: CaptionFormat, language: Language) -> Result<Document> {
    parse_with_format(content, format, Path::new("<memory>"), language)
}

fn parse_with_format(
    content: &str,
    format: CaptionFormat,
    path: &Path,
    language: Language,
) -> Result<Document> {
    let mut utterances = match format {
        CaptionFormat::Ass => ass::parse(content, path)?,
        CaptionFormat::Srt => srt::parse(content, path)?,
        CaptionFormat::Vtt => vtt::parse(content, path)?,
        CaptionFormat::Markdown => markdown::parse(content, path)?,
    };

    // Caption files do not guarantee on-disk ordering; the data model
    // does. Per-utterance inversions were already rejected by the format
    // parsers, so a stable sort on start is a normalization, not a repair.
    sort_utterances(&mut utterances);

    Ok(Document {
        utterances,
        language,
        format,
    })
}

fn sort_utterances(utterances: &mut [Utterance]) {
    utterances.sort_by(|a, b| {
        a.start
            .partial_cmp(&b.start)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Pick a format from the file extension, falling back to sniffing the
/// first non-blank content.
pub fn detect_format(path: &Path, content: &str) -> Option<CaptionFormat> {
    let by_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .and_then(|ext| match ext.as_str() {
            "ass" | "ssa" => Some(CaptionFormat::Ass),
            "srt" => Some(CaptionFormat::Srt),
            "vtt" => Some(CaptionFormat::Vtt),
            "md" | "markdown" => Some(CaptionFormat::Markdown),
            _ => None,
        });
    by_extension.or_else(|| sniff_format(content))
}

fn sniff_format(content: &str) -> Option<CaptionFormat> {
    let head = content.trim_start_matches('\u{FEFF}').trim_start();
    if head.starts_with("WEBVTT") {
        return Some(CaptionFormat::Vtt);
    }
    if head.starts_with("[Script Info]") || content.contains("\nDialogue:") {
        return Some(CaptionFormat::Ass);
    }
    // SRT cue shape: a bare number line followed by a timing arrow.
    let mut lines = head.lines().map(str::trim).filter(|l| !l.is_empty());
    if let (Some(first), Some(second)) = (lines.next(), lines.next()) {
        if first.parse::<u64>().is_ok() && second.contains("-->") {
            return Some(CaptionFormat::Srt);
        }
        if first.contains("-->") {
            return Some(CaptionFormat::Srt);
        }
    }
    // Markdown transcript: an inline clock stamp in brackets.
    for line in head.lines().take(50) {
        let mut rest = line;
        while let Some(open) = rest.find('[') {
            let tail = &rest[open + 1..];
            if let Some(close) = tail.find(']') {
                if timecode::parse_timestamp(&tail[..close]).is_some() {
                    return Some(CaptionFormat::Markdown);
                }
                rest = &tail[close + 1..];
            } else {
                break;
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(detect_format(Path::new("a.ass"), ""), Some(CaptionFormat::Ass));
        assert_eq!(detect_format(Path::new("a.SRT"), ""), Some(CaptionFormat::Srt));
        assert_eq!(detect_format(Path::new("a.vtt"), ""), Some(CaptionFormat::Vtt));
        assert_eq!(detect_format(Path::new("a.md"), ""), Some(CaptionFormat::Markdown));
    }

    #[test]
    fn test_sniff_without_extension() {
        assert_eq!(
            detect_format(Path::new("captions"), "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nhi\n"),
            Some(CaptionFormat::Vtt)
        );
        assert_eq!(
            detect_format(Path::new("captions"), "1\n00:00:01,000 --> 00:00:02,000\nhi\n"),
            Some(CaptionFormat::Srt)
        );
        assert_eq!(
            detect_format(Path::new("captions"), "[Script Info]\n"),
            Some(CaptionFormat::Ass)
        );
        assert_eq!(
            detect_format(Path::new("captions"), "[00:00:01.000] hello [00:00:02.000]\n"),
            Some(CaptionFormat::Markdown)
        );
        assert_eq!(detect_format(Path::new("captions"), "just some prose"), None);
    }

    #[test]
    fn test_parse_str_sorts_by_start() {
        let content = "1\n00:00:05,000 --> 00:00:06,000\nsecond\n\n2\n00:00:01,000 --> 00:00:02,000\nfirst\n";
        let doc = parse_str(content, CaptionFormat::Srt, Language::En).unwrap();
        assert_eq!(doc.utterances[0].text, "first");
        assert_eq!(doc.utterances[1].text, "second");
    }

    #[test]
    fn test_parse_path_missing_file() {
        let err = parse_path("/nonexistent/file.srt", Language::En).unwrap_err();
        assert!(matches!(err, CaptionError::Io { .. }));
    }
}
