//! Evaluate caption alignment quality against a reference
//!
//! ```text
//! capeval -r ref.ass -y hyp.ass
//! capeval -r ref.ass -y hyp.srt -m wer -l zh
//! capeval -r ref.ass -y hyp.ass -m der jer sca -c 0.25
//! capeval -r ref.ass -y hyp.ass -f json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use capeval_core::{EvalOptions, Language, Metric};
use clap::{Parser, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MetricArg {
    Der,
    Jer,
    Wer,
    Sca,
    Scer,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Metric {
        match arg {
            MetricArg::Der => Metric::Der,
            MetricArg::Jer => Metric::Jer,
            MetricArg::Wer => Metric::Wer,
            MetricArg::Sca => Metric::Sca,
            MetricArg::Scer => Metric::Scer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Evaluate caption alignment quality against a reference
#[derive(Debug, Parser)]
#[command(name = "capeval", version, about)]
struct Args {
    /// Reference caption file
    #[arg(short, long)]
    reference: PathBuf,

    /// Hypothesis caption file
    #[arg(short = 'y', long)]
    hypothesis: PathBuf,

    /// Metrics to compute
    #[arg(short, long, num_args = 1.., default_values = ["der", "jer", "wer", "sca", "scer"])]
    metrics: Vec<MetricArg>,

    /// Collar size in seconds
    #[arg(short, long, default_value_t = 0.2)]
    collar: f64,

    /// Skip overlapping reference speech when scoring
    #[arg(long)]
    skip_overlap: bool,

    /// Skip [event] markers (e.g. [Laughter], [Applause])
    #[arg(long)]
    skip_events: bool,

    /// Language code (en, zh, ja, ...)
    #[arg(short, long, default_value = "en")]
    language: String,

    /// Model name to display in results
    #[arg(short, long)]
    name: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let options = EvalOptions {
        metrics: args.metrics.iter().copied().map(Metric::from).collect(),
        collar: args.collar,
        skip_overlap: args.skip_overlap,
        skip_events: args.skip_events,
        language: Language::parse(&args.language),
        name: args.name,
    };

    let report = capeval_eval::evaluate(&args.reference, &args.hypothesis, &options)
        .context("evaluation failed")?;

    match args.format {
        OutputFormat::Json => println!("{}", report.to_json_line()?),
        OutputFormat::Text => print!("{}", report.to_text()),
    }
    Ok(())
}
