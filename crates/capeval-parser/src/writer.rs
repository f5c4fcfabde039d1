//! Document serialization
//!
//! Writes a parsed document back out as SRT or ASS. Used by round-trip
//! tests and for dumping intermediate documents while debugging; the
//! evaluation path itself never writes captions.

use capeval_core::{CaptionFormat, Document};

use crate::timecode::{format_ass, format_srt};

/// Serialize a document to the given format. Markdown and VTT documents
/// serialize as SRT (the timing-complete lowest common denominator);
/// speaker labels are folded into the text as `Name: ` prefixes for SRT.
pub fn write_str(document: &Document, format: CaptionFormat) -> String {
    match format {
        CaptionFormat::Ass => write_ass(document),
        _ => write_srt(document),
    }
}

fn write_srt(document: &Document) -> String {
    let mut out = String::new();
    for (i, utt) in document.utterances.iter().enumerate() {
        out.push_str(&format!("{}\n", i + 1));
        out.push_str(&format!(
            "{} --> {}\n",
            format_srt(utt.start),
            format_srt(utt.end)
        ));
        match utt.speaker.as_deref() {
            Some(speaker) => out.push_str(&format!("{}: {}\n\n", speaker, utt.text)),
            None => out.push_str(&format!("{}\n\n", utt.text)),
        }
    }
    out
}

fn write_ass(document: &Document) -> String {
    let mut out = String::from(
        "[Script Info]\nScriptType: v4.00+\n\n[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n",
    );
    for utt in &document.utterances {
        out.push_str(&format!(
            "Dialogue: 0,{},{},Default,{},0,0,0,,{}\n",
            format_ass(utt.start),
            format_ass(utt.end),
            utt.speaker.as_deref().unwrap_or(""),
            utt.text
        ));
    }
    out
}
