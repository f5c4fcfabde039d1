//! Core types for the capeval caption evaluation engine
//!
//! This crate defines the shared data model: timed, speaker-attributed
//! utterances, parsed caption documents, evaluation options, and the
//! metric report returned to callers.

pub mod error;
pub mod report;
pub mod types;

pub use error::CaptionError;
pub use report::{DerBreakdown, EvalReport, MetricValue};
pub use types::{CaptionFormat, Document, EvalOptions, Language, Metric, Utterance};

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, CaptionError>;
