//! Caption evaluation error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while parsing or evaluating caption documents.
///
/// Parsing never repairs malformed input silently: a bad timestamp or an
/// inverted interval corrupts every downstream benchmark number, so it is
/// always a hard failure naming the file and the offending record.
#[derive(Error, Debug)]
pub enum CaptionError {
    /// A document was recognized but one of its records is invalid.
    #[error("malformed document {path}: {detail} (record {record})")]
    MalformedDocument {
        path: PathBuf,
        /// 1-based cue/paragraph index within the document.
        record: usize,
        detail: String,
    },

    /// The file syntax was not recognized as any supported caption format.
    #[error("unsupported caption format: {path}: {detail}")]
    UnsupportedFormat { path: PathBuf, detail: String },

    /// An unknown metric name was requested.
    #[error("unknown metric: {0}. Supported: der, jer, wer, sca, scer")]
    UnknownMetric(String),

    /// IO error reading an input document.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error when rendering a report.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CaptionError {
    pub fn malformed(
        path: impl Into<PathBuf>,
        record: usize,
        detail: impl Into<String>,
    ) -> Self {
        Self::MalformedDocument {
            path: path.into(),
            record,
            detail: detail.into(),
        }
    }

    pub fn unsupported(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            path: path.into(),
            detail: detail.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
