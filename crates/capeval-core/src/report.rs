//! Evaluation report assembly and rendering
//!
//! A report maps each requested metric to its value and renders to two
//! forms: a single-line JSON record for downstream table builders, and a
//! percentage-formatted markdown table for humans.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::types::Metric;

/// DER components, all durations in seconds of reference speech.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerBreakdown {
    /// The diarization error rate itself
    pub rate: f64,
    pub false_alarm: f64,
    pub missed: f64,
    pub confusion: f64,
    pub correct: f64,
    /// Reference speech time used as the denominator; independent of
    /// the collar
    pub total: f64,
}

/// Value of a single metric: a scalar rate, or the DER component object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Scalar(f64),
    Der(DerBreakdown),
}

impl MetricValue {
    /// Collapse to the headline scalar (the rate for a DER breakdown).
    pub fn scalar(&self) -> f64 {
        match self {
            MetricValue::Scalar(v) => *v,
            MetricValue::Der(b) => b.rate,
        }
    }
}

/// Result of one evaluation call: every requested metric is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    /// Display name supplied by the caller, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub metrics: BTreeMap<Metric, MetricValue>,
    /// Distinct reference speaker labels
    pub ref_speakers: BTreeSet<String>,
    /// Distinct hypothesis speaker labels
    pub hyp_speakers: BTreeSet<String>,
}

impl EvalReport {
    /// Single-line machine-readable form.
    pub fn to_json_line(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Human-readable multi-line form: a DER component table when the
    /// breakdown is available, the metric summary table, and a speaker
    /// diff when the hypothesis got the speaker inventory wrong.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let display_name = self.name.as_deref().unwrap_or("-");

        if let Some(MetricValue::Der(b)) = self.metrics.get(&Metric::Der) {
            out.push_str("Detailed DER Components:\n");
            out.push_str(
                "| Model | DER | false alarm (s) | missed (s) | confusion (s) | correct (s) | total (s) |\n",
            );
            out.push_str("|--------|--------|--------|--------|--------|--------|--------|\n");
            out.push_str(&format!(
                "| {} | {:.4} | {:.4} | {:.4} | {:.4} | {:.4} | {:.4} |\n\n",
                display_name, b.rate, b.false_alarm, b.missed, b.confusion, b.correct, b.total
            ));
        }

        let mut header = vec!["Model".to_string()];
        let mut values = vec![display_name.to_string()];
        for (metric, value) in &self.metrics {
            let arrow = if metric.lower_is_better() { "↓" } else { "↑" };
            header.push(format!("{} {}", metric.as_str().to_uppercase(), arrow));
            let v = value.scalar();
            values.push(format!("{:.4} ({:5.2}%)", v, v * 100.0));
        }
        out.push_str(&format!("| {} |\n", header.join(" | ")));
        out.push_str(&format!("|{}|\n", vec!["--------"; header.len()].join("|")));
        out.push_str(&format!("| {} |\n", values.join(" | ")));

        let sca = self.metrics.get(&Metric::Sca).map(MetricValue::scalar);
        let scer = self.metrics.get(&Metric::Scer).map(MetricValue::scalar);
        if sca == Some(0.0) || scer == Some(1.0) {
            let missing: Vec<&str> = self
                .ref_speakers
                .difference(&self.hyp_speakers)
                .map(String::as_str)
                .collect();
            let extra: Vec<&str> = self
                .hyp_speakers
                .difference(&self.ref_speakers)
                .map(String::as_str)
                .collect();
            if !missing.is_empty() || !extra.is_empty() {
                out.push_str("\nSpeaker Diff:\n");
                if !missing.is_empty() {
                    out.push_str(&format!("  Missing: {}\n", missing.join(", ")));
                }
                if !extra.is_empty() {
                    out.push_str(&format!("  Extra:   {}\n", extra.join(", ")));
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> EvalReport {
        let mut metrics = BTreeMap::new();
        metrics.insert(
            Metric::Der,
            MetricValue::Der(DerBreakdown {
                rate: 0.1,
                false_alarm: 1.0,
                missed: 0.5,
                confusion: 0.5,
                correct: 18.0,
                total: 20.0,
            }),
        );
        metrics.insert(Metric::Wer, MetricValue::Scalar(0.25));
        metrics.insert(Metric::Sca, MetricValue::Scalar(0.0));
        EvalReport {
            name: Some("model-x".into()),
            metrics,
            ref_speakers: ["Alice".to_string(), "Bob".to_string()].into_iter().collect(),
            hyp_speakers: ["Alice".to_string()].into_iter().collect(),
        }
    }

    #[test]
    fn test_json_line_is_single_line() {
        let line = sample_report().to_json_line().unwrap();
        assert!(!line.contains('\n'));
        assert!(line.contains("\"wer\":0.25"));
        assert!(line.contains("\"false_alarm\":1.0"));
    }

    #[test]
    fn test_text_report_has_percentages_and_diff() {
        let text = sample_report().to_text();
        assert!(text.contains("WER ↓"));
        assert!(text.contains("25.00%"));
        assert!(text.contains("Detailed DER Components"));
        assert!(text.contains("Missing: Bob"));
    }

    #[test]
    fn test_scalar_of_breakdown_is_rate() {
        let value = MetricValue::Der(DerBreakdown {
            rate: 0.3,
            false_alarm: 0.0,
            missed: 0.0,
            confusion: 0.0,
            correct: 0.0,
            total: 0.0,
        });
        assert_eq!(value.scalar(), 0.3);
    }
}
