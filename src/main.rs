use std::path::PathBuf;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use tracing::{info, Level};
use yolo_eval::{
    config::EvalConfig,
    evaluator::evaluate_dataset,
    matching::MatchPolicy,
    report::{write_csv, write_json_summary, write_summary},
};

/// Evaluate YOLO predictions against ground-truth labels.
#[derive(Debug, Parser)]
#[clap(name = "yolo-eval", version, about)]
struct Cli {
    /// TOML file with default settings; flags override it
    #[clap(long, short = 'c')]
    config: Option<PathBuf>,

    /// Directory with the images to evaluate
    #[clap(long)]
    images: Option<PathBuf>,

    /// Directory with ground-truth label files
    #[clap(long)]
    labels: Option<PathBuf>,

    /// Directory with prediction label files
    #[clap(long)]
    predictions: Option<PathBuf>,

    /// Per-box CSV output
    #[clap(long)]
    csv: Option<PathBuf>,

    /// Text summary output
    #[clap(long)]
    report: Option<PathBuf>,

    /// Optional JSON summary output
    #[clap(long)]
    json: Option<PathBuf>,

    /// Minimum IoU for a true positive
    #[clap(long)]
    iou_threshold: Option<f64>,

    #[clap(long)]
    width: Option<u32>,

    #[clap(long)]
    height: Option<u32>,

    /// Image file extensions to evaluate (repeatable)
    #[clap(long = "ext")]
    extensions: Vec<String>,

    /// Drop predictions below this confidence
    #[clap(long)]
    min_confidence: Option<f64>,

    /// `exclusive` or `reuse-candidates`
    #[clap(long)]
    policy: Option<MatchPolicy>,

    /// Worker threads, 0 for one per core
    #[clap(long, short = 'j')]
    threads: Option<usize>,

    /// Log per-image results
    #[clap(long, short = 'v')]
    verbose: bool,

    /// Only log warnings and errors
    #[clap(long, short = 'q', conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn into_config(self) -> Result<EvalConfig> {
        let mut config = match &self.config {
            Some(path) => EvalConfig::from_file(path).into_diagnostic()?,
            None => EvalConfig::default(),
        };

        if let Some(dir) = self.images {
            config.images_dir = dir;
        }
        if let Some(dir) = self.labels {
            config.labels_dir = dir;
        }
        if let Some(dir) = self.predictions {
            config.predictions_dir = dir;
        }
        if let Some(path) = self.csv {
            config.output_csv = path;
        }
        if let Some(path) = self.report {
            config.report_path = path;
        }
        if self.json.is_some() {
            config.json_path = self.json;
        }
        if let Some(threshold) = self.iou_threshold {
            config.iou_threshold = threshold;
        }
        if let Some(width) = self.width {
            config.image_width = width;
        }
        if let Some(height) = self.height {
            config.image_height = height;
        }
        if !self.extensions.is_empty() {
            config.image_extensions = self.extensions;
        }
        if self.min_confidence.is_some() {
            config.min_confidence = self.min_confidence;
        }
        if let Some(policy) = self.policy {
            config.match_policy = policy;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }

        config.validate().into_diagnostic()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = args.into_config()?;
    let report = evaluate_dataset(&config).into_diagnostic()?;

    write_csv(&report.records, &config.output_csv).into_diagnostic()?;
    write_summary(&report.stats, config.iou_threshold, &config.report_path).into_diagnostic()?;
    if let Some(path) = &config.json_path {
        write_json_summary(&report.stats, config.iou_threshold, path).into_diagnostic()?;
    }

    info!(
        csv = %config.output_csv.display(),
        report = %config.report_path.display(),
        "evaluation finished"
    );

    Ok(())
}
