//! Diarization and transcription quality metrics
//!
//! Implements the scoring half of the evaluation engine: per-speaker
//! timelines with exact interval algebra, the Hungarian assignment used
//! for speaker mapping, DER/JER and speaker-count metrics, and
//! token-level WER. Everything is deterministic; the same inputs always
//! produce the same numbers.

pub mod assignment;
pub mod diarization;
pub mod timeline;
pub mod wer;

pub use assignment::{solve_assignment, solve_max_assignment};
pub use diarization::{optimal_mapping, score_diarization, DiarizationScore};
pub use timeline::{scoring_regions, Span, Timeline};
pub use wer::{edit_distance, word_error_rate};
