//! Caption evaluation engine
//!
//! One call per (reference, hypothesis) pair: parse both documents,
//! normalize text, build speaker timelines, compute exactly the
//! requested metrics, and assemble a complete [`EvalReport`]. The call
//! is synchronous and side-effect-free beyond the two file reads, so
//! callers may fan out over many hypotheses with ordinary task-level
//! parallelism.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use capeval_core::{
    Document, EvalOptions, EvalReport, Metric, MetricValue, Result,
};
use capeval_metrics::{score_diarization, word_error_rate, DiarizationScore, Timeline};
use capeval_parser::parse_path;
use capeval_text::normalize;
use tracing::{debug, info};

/// Evaluate a hypothesis caption file against a reference caption file.
///
/// Every metric in `options.metrics` is present in the returned report;
/// an unparseable input is a hard error, never a partial result.
pub fn evaluate(
    reference_path: impl AsRef<Path>,
    hypothesis_path: impl AsRef<Path>,
    options: &EvalOptions,
) -> Result<EvalReport> {
    let reference_path = reference_path.as_ref();
    let hypothesis_path = hypothesis_path.as_ref();
    info!(
        reference = %reference_path.display(),
        hypothesis = %hypothesis_path.display(),
        collar = options.collar,
        language = options.language.code(),
        "evaluating alignment"
    );

    let reference = parse_path(reference_path, options.language.clone())?;
    let hypothesis = parse_path(hypothesis_path, options.language.clone())?;
    evaluate_documents(&reference, &hypothesis, options)
}

/// Evaluate already-parsed documents. Exposed for callers that hold
/// captions in memory (and for tests).
pub fn evaluate_documents(
    reference: &Document,
    hypothesis: &Document,
    options: &EvalOptions,
) -> Result<EvalReport> {
    let ref_timeline = Timeline::from_document(reference, options.skip_events);
    let hyp_timeline = Timeline::from_document(hypothesis, options.skip_events);

    // DER, JER, SCA and SCER all come out of one diarization pass.
    let mut diarization: Option<DiarizationScore> = None;
    let mut diarize = || -> DiarizationScore {
        score_diarization(
            &ref_timeline,
            &hyp_timeline,
            options.collar,
            options.skip_overlap,
        )
    };

    let mut metrics = BTreeMap::new();
    for metric in &options.metrics {
        let value = match metric {
            Metric::Der => {
                let score = diarization.get_or_insert_with(&mut diarize);
                MetricValue::Der(score.der)
            }
            Metric::Jer => {
                MetricValue::Scalar(diarization.get_or_insert_with(&mut diarize).jer)
            }
            Metric::Sca => {
                MetricValue::Scalar(diarization.get_or_insert_with(&mut diarize).sca)
            }
            Metric::Scer => {
                MetricValue::Scalar(diarization.get_or_insert_with(&mut diarize).scer)
            }
            Metric::Wer => {
                let ref_tokens = document_tokens(reference, options);
                let hyp_tokens = document_tokens(hypothesis, options);
                debug!(
                    ref_tokens = ref_tokens.len(),
                    hyp_tokens = hyp_tokens.len(),
                    "scoring transcript"
                );
                MetricValue::Scalar(word_error_rate(&ref_tokens, &hyp_tokens))
            }
        };
        metrics.insert(*metric, value);
    }

    Ok(EvalReport {
        name: options.name.clone(),
        metrics,
        ref_speakers: speaker_set(&ref_timeline),
        hyp_speakers: speaker_set(&hyp_timeline),
    })
}

/// Concatenated normalized token stream of a document.
fn document_tokens(document: &Document, options: &EvalOptions) -> Vec<String> {
    document
        .utterances
        .iter()
        .filter(|u| !(options.skip_events && u.is_event))
        .flat_map(|u| normalize(&u.text, &document.language, options.skip_events))
        .collect()
}

fn speaker_set(timeline: &Timeline) -> BTreeSet<String> {
    timeline.labels().into_iter().map(String::from).collect()
}
