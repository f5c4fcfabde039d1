//! Shared caption data model

use serde::{Deserialize, Serialize};

/// A single timed, speaker-attributed utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    /// Start time in seconds from document start
    pub start: f64,
    /// End time in seconds from document start
    pub end: f64,
    /// Speaker label, `None` for single-speaker documents
    pub speaker: Option<String>,
    /// Raw utterance text as carried by the source format
    pub text: String,
    /// True when the text is only a bracketed non-speech marker
    /// (e.g. `[Laughter]`, `[♪ Music ♪]`)
    pub is_event: bool,
}

impl Utterance {
    /// Duration of this utterance in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Concrete syntax a document was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionFormat {
    /// Advanced SubStation Alpha (`.ass`/`.ssa`)
    Ass,
    /// SubRip (`.srt`)
    Srt,
    /// WebVTT (`.vtt`)
    Vtt,
    /// Markdown transcript with inline `[HH:MM:SS]` stamps
    Markdown,
}

impl std::fmt::Display for CaptionFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptionFormat::Ass => write!(f, "ass"),
            CaptionFormat::Srt => write!(f, "srt"),
            CaptionFormat::Vtt => write!(f, "vtt"),
            CaptionFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Language of a caption document, used to pick the normalization path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Zh,
    Ja,
    Ko,
    /// Any other two-letter code; normalized with the multilingual path
    Other(String),
}

impl Language {
    /// Parse a language code. Region subtags are folded away
    /// (`zh-TW` → `Zh`, `en-US` → `En`); anything unrecognized keeps its
    /// primary subtag as `Other`.
    pub fn parse(code: &str) -> Language {
        let code = code.trim().to_ascii_lowercase();
        let primary = code.split(['-', '_']).next().unwrap_or("");
        match primary {
            "en" => Language::En,
            "zh" | "yue" => Language::Zh,
            "ja" => Language::Ja,
            "ko" => Language::Ko,
            "" => Language::En,
            other => Language::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
            Language::Ja => "ja",
            Language::Ko => "ko",
            Language::Other(code) => code,
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

/// A parsed caption document: an ordered sequence of utterances plus the
/// language and the concrete syntax it came from. Constructed once per
/// evaluation call, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub utterances: Vec<Utterance>,
    pub language: Language,
    pub format: CaptionFormat,
}

impl Document {
    /// Distinct speaker labels in document order of first appearance.
    pub fn speakers(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for utt in &self.utterances {
            if let Some(speaker) = utt.speaker.as_deref() {
                if !seen.contains(&speaker) {
                    seen.push(speaker);
                }
            }
        }
        seen
    }

    /// End time of the last utterance, 0.0 for an empty document.
    pub fn duration(&self) -> f64 {
        self.utterances.last().map(|u| u.end).unwrap_or(0.0)
    }
}

/// An evaluation metric name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Der,
    Jer,
    Wer,
    Sca,
    Scer,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Der,
        Metric::Jer,
        Metric::Wer,
        Metric::Sca,
        Metric::Scer,
    ];

    /// True for metrics where lower values are better.
    pub fn lower_is_better(&self) -> bool {
        !matches!(self, Metric::Sca)
    }

    /// True for metrics derived from the speaker timelines.
    pub fn needs_diarization(&self) -> bool {
        matches!(self, Metric::Der | Metric::Jer | Metric::Sca | Metric::Scer)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Der => "der",
            Metric::Jer => "jer",
            Metric::Wer => "wer",
            Metric::Sca => "sca",
            Metric::Scer => "scer",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Metric {
    type Err = crate::CaptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "der" => Ok(Metric::Der),
            "jer" => Ok(Metric::Jer),
            "wer" => Ok(Metric::Wer),
            "sca" => Ok(Metric::Sca),
            "scer" => Ok(Metric::Scer),
            other => Err(crate::CaptionError::UnknownMetric(other.to_string())),
        }
    }
}

/// Per-call evaluation configuration. All knobs are explicit arguments so
/// concurrent evaluations cannot interfere through ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalOptions {
    /// Metrics to compute
    pub metrics: Vec<Metric>,
    /// Collar in seconds around reference boundaries (total excluded
    /// window per boundary; `collar / 2` on each side)
    pub collar: f64,
    /// Exclude regions where the reference has overlapping speech
    pub skip_overlap: bool,
    /// Drop bracketed `[event]` markers from both text and timelines
    pub skip_events: bool,
    /// Language driving text normalization
    pub language: Language,
    /// Optional display name shown in the human-readable report
    pub name: Option<String>,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            metrics: Metric::ALL.to_vec(),
            collar: 0.2,
            skip_overlap: false,
            skip_events: false,
            language: Language::En,
            name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parse_folds_regions() {
        assert_eq!(Language::parse("zh-TW"), Language::Zh);
        assert_eq!(Language::parse("zh_CN"), Language::Zh);
        assert_eq!(Language::parse("ja-JP"), Language::Ja);
        assert_eq!(Language::parse("EN"), Language::En);
        assert_eq!(Language::parse("yue"), Language::Zh);
        assert_eq!(Language::parse("de"), Language::Other("de".to_string()));
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("DER".parse::<Metric>().unwrap(), Metric::Der);
        assert_eq!("wer".parse::<Metric>().unwrap(), Metric::Wer);
        assert!("cer".parse::<Metric>().is_err());
    }

    #[test]
    fn test_document_speakers_in_order() {
        let doc = Document {
            utterances: vec![
                Utterance {
                    start: 0.0,
                    end: 1.0,
                    speaker: Some("Bob".into()),
                    text: "hi".into(),
                    is_event: false,
                },
                Utterance {
                    start: 1.0,
                    end: 2.0,
                    speaker: Some("Alice".into()),
                    text: "hello".into(),
                    is_event: false,
                },
                Utterance {
                    start: 2.0,
                    end: 3.0,
                    speaker: Some("Bob".into()),
                    text: "again".into(),
                    is_event: false,
                },
            ],
            language: Language::En,
            format: CaptionFormat::Srt,
        };
        assert_eq!(doc.speakers(), vec!["Bob", "Alice"]);
        assert_eq!(doc.duration(), 3.0);
    }
}
