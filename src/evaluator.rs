//! Main evaluation orchestrator for a YOLO dataset split.

use crate::config::EvalConfig;
use crate::error::{Result, YoloEvalError};
use crate::loader::load_label_file;
use crate::matching::{match_image, ImageMatch};
use crate::stats::AggregateStats;
use crate::threshold::filter_by_confidence;
use crate::types::{MatchRecord, NormalizedBox};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Result of evaluating a single image, before it is folded into the totals.
#[derive(Debug, Clone)]
pub struct ImageEvaluation {
    pub matches: ImageMatch,
    /// Malformed lines dropped from this image's two label files
    pub skipped_lines: usize,
}

/// Output of a full run: every match record plus the folded statistics.
#[derive(Debug, Clone, Default)]
pub struct EvaluationReport {
    /// Records of all images, in sorted image order
    pub records: Vec<MatchRecord>,
    pub stats: AggregateStats,
}

impl EvaluationReport {
    /// Fold per-image results in the order given.
    ///
    /// # Example
    ///
    /// ```
    /// use yolo_eval::evaluator::{evaluate_boxes, EvaluationReport};
    /// use yolo_eval::config::EvalConfig;
    /// use yolo_eval::types::NormalizedBox;
    ///
    /// let config = EvalConfig::default();
    /// let gt = vec![NormalizedBox::new(0, 0.5, 0.5, 0.2, 0.2)];
    /// let evaluation = evaluate_boxes("a.png", &gt, &gt, &config).unwrap();
    ///
    /// let report = EvaluationReport::from_images(vec![evaluation]);
    /// assert_eq!(report.stats.true_positives, 1);
    /// ```
    pub fn from_images<I>(images: I) -> Self
    where
        I: IntoIterator<Item = ImageEvaluation>,
    {
        let mut report = Self::default();
        for image in images {
            report.push(image);
        }
        report
    }

    /// Fold one image into the report.
    pub fn push(&mut self, image: ImageEvaluation) {
        let ImageEvaluation {
            matches,
            skipped_lines,
        } = image;

        self.stats.fold(&matches.summary, &matches.records);
        self.stats.add_skipped_lines(skipped_lines);
        self.records.extend(matches.records);
    }
}

/// List the images of a split in sorted file-name order.
///
/// Only direct children of `config.images_dir` with a configured extension
/// are returned.
///
/// # Errors
///
/// Returns an error if the directory does not exist or cannot be read.
pub fn discover_images(config: &EvalConfig) -> Result<Vec<String>> {
    let dir = &config.images_dir;
    require_dir(dir, "image")?;

    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || !config.is_image(&path) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        }
    }

    names.sort();
    Ok(names)
}

/// Match already-loaded boxes for one image.
///
/// Applies the configured confidence filter to the predictions, then runs
/// the matcher with the configured options.
pub fn evaluate_boxes(
    image_name: &str,
    ground_truths: &[NormalizedBox],
    predictions: &[NormalizedBox],
    config: &EvalConfig,
) -> Result<ImageEvaluation> {
    let matches = match config.min_confidence {
        Some(min_confidence) => {
            let kept = filter_by_confidence(predictions, min_confidence)?;
            match_image(ground_truths, &kept, image_name, &config.match_options())
        }
        None => match_image(ground_truths, predictions, image_name, &config.match_options()),
    };

    Ok(ImageEvaluation {
        matches,
        skipped_lines: 0,
    })
}

/// Load both label files of one image and match them.
pub fn evaluate_image(image_name: &str, config: &EvalConfig) -> Result<ImageEvaluation> {
    let stem = Path::new(image_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(image_name);
    let label_file = format!("{stem}.txt");

    let ground_truths = load_label_file(config.labels_dir.join(&label_file))?;
    let predictions = load_label_file(config.predictions_dir.join(&label_file))?;

    let mut evaluation = evaluate_boxes(image_name, &ground_truths.boxes, &predictions.boxes, config)?;
    evaluation.skipped_lines = ground_truths.skipped_lines + predictions.skipped_lines;

    debug!(
        image = image_name,
        gt = evaluation.matches.summary.ground_truth_count,
        pred = evaluation.matches.summary.prediction_count,
        tp = evaluation.matches.summary.true_positive_count,
        max_iou = evaluation.matches.summary.max_iou_achieved,
        "evaluated image"
    );

    Ok(evaluation)
}

/// Evaluate every image of a split.
///
/// Images are loaded and matched in parallel; their results are folded in
/// sorted image order so the output does not depend on scheduling. A missing
/// image, label or prediction directory and the first I/O error abort the run.
pub fn evaluate_dataset(config: &EvalConfig) -> Result<EvaluationReport> {
    config.validate()?;

    let images = discover_images(config)?;
    // Missing label files mean "no boxes", a missing label directory does not
    require_dir(&config.labels_dir, "ground-truth label")?;
    require_dir(&config.predictions_dir, "prediction label")?;

    info!(
        images = images.len(),
        dir = %config.images_dir.display(),
        iou_threshold = config.iou_threshold,
        policy = %config.match_policy,
        "starting evaluation"
    );

    let evaluations = if config.threads > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()
            .map_err(|e| YoloEvalError::InvalidConfig(format!("failed to build thread pool: {e}")))?;
        pool.install(|| evaluate_all(&images, config))?
    } else {
        evaluate_all(&images, config)?
    };

    let report = EvaluationReport::from_images(evaluations);
    info!("{}", report.stats.summary_string());

    Ok(report)
}

fn require_dir(dir: &Path, what: &str) -> Result<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(YoloEvalError::MissingDirectory(format!(
            "{what} directory '{}' does not exist",
            dir.display()
        )))
    }
}

fn evaluate_all(images: &[String], config: &EvalConfig) -> Result<Vec<ImageEvaluation>> {
    images
        .par_iter()
        .map(|name| evaluate_image(name, config))
        .collect()
}
