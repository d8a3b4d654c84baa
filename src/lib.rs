//! # yolo-eval
//!
//! A Rust library for evaluating YOLO object-detection output against
//! ground-truth labels with greedy IoU matching.
//!
//! For every image, each ground-truth box is paired with the prediction it
//! overlaps most. Pairs at or above the IoU threshold are true positives,
//! unpaired ground truths are false negatives and unclaimed predictions are
//! false positives. Per-image results fold into corpus-wide statistics.
//!
//! ## Features
//!
//! - Parse YOLO label files (`class cx cy w h [confidence]`)
//! - Convert normalized center-form boxes to pixel corner-form boxes
//! - Calculate IoU (Intersection over Union) between boxes
//! - Greedy per-image TP / FP / FN classification
//! - Aggregate counts, average IoU, precision, recall and F1
//! - Evaluate a whole dataset split in parallel
//! - Write CSV, text and JSON reports
//!
//! ## Quick Start
//!
//! ```rust
//! use yolo_eval::matching::{match_image, MatchOptions};
//! use yolo_eval::stats::AggregateStats;
//! use yolo_eval::types::NormalizedBox;
//!
//! let gt = vec![NormalizedBox::new(0, 0.5, 0.5, 0.2, 0.2)];
//! let pred = vec![
//!     NormalizedBox::new(0, 0.5, 0.5, 0.2, 0.2),
//!     NormalizedBox::new(0, 0.9, 0.9, 0.1, 0.1),
//! ];
//!
//! let result = match_image(&gt, &pred, "0001.png", &MatchOptions::default());
//!
//! let mut stats = AggregateStats::new();
//! stats.fold(&result.summary, &result.records);
//!
//! assert_eq!(stats.true_positives, 1);
//! assert_eq!(stats.false_positives, 1);
//! assert_eq!(stats.duplicate_images, vec!["0001.png"]);
//! ```
//!
//! ## Dataset layout
//!
//! ```text
//! datasets/test/images/0001.png   images to evaluate
//! datasets/test/labels/0001.txt   ground truth
//! runs/detect/val/labels/0001.txt predictions
//! ```
//!
//! A missing label file means the image has no boxes of that kind.

pub mod error;
pub mod types;
pub mod loader;
pub mod threshold;
pub mod metrics;
pub mod matching;
pub mod stats;
pub mod config;
pub mod evaluator;
pub mod polars_utils;
pub mod report;

// Re-export commonly used types and functions
pub use error::{Result, YoloEvalError};
pub use types::{
    AbsoluteBox, ImageDimensions, ImageSummary, MatchLabel, MatchOutcome, MatchRecord,
    NormalizedBox,
};
pub use loader::{load_label_file, parse_labels, LabelSet};
pub use matching::{match_image, ImageMatch, MatchOptions, MatchPolicy};
pub use stats::AggregateStats;
pub use config::EvalConfig;
pub use evaluator::{evaluate_dataset, EvaluationReport};
