/// Corpus-wide statistics accumulated across images
///
/// This module provides the accumulator that per-image match results are
/// folded into, plus the derived numbers read from it once a run finishes.

use crate::metrics::PrecisionRecall;
use crate::types::{ImageSummary, MatchLabel, MatchRecord};
use serde::{Deserialize, Serialize};

/// Running totals for an evaluation run
///
/// Starts empty, receives one [`AggregateStats::fold`] per image and is read
/// once at the end to produce reports. Counters are commutative, but the
/// image-name lists keep fold order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Number of images folded in
    pub images: usize,

    /// Total ground-truth boxes seen
    pub ground_truths: usize,

    /// Total predicted boxes seen
    pub predictions: usize,

    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,

    /// Sum of per-image max IoU over images where it was positive
    pub iou_sum: f64,

    /// Number of images contributing to `iou_sum`
    pub iou_count: usize,

    /// Label lines dropped by the loader as malformed
    pub skipped_label_lines: usize,

    /// One entry per false-positive record
    pub false_positive_images: Vec<String>,

    /// One entry per false-negative record
    pub false_negative_images: Vec<String>,

    /// Images with more predictions than (a non-zero number of) ground truths
    pub duplicate_images: Vec<String>,

    /// One entry per true-positive record
    pub true_positive_images: Vec<String>,
}

impl AggregateStats {
    /// Create a new `AggregateStats` with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold the result of one image into the running totals
    pub fn fold(&mut self, summary: &ImageSummary, records: &[MatchRecord]) {
        self.images += 1;
        self.ground_truths += summary.ground_truth_count;
        self.predictions += summary.prediction_count;

        for record in records {
            match record.label() {
                MatchLabel::TruePositive => {
                    self.true_positives += 1;
                    self.true_positive_images.push(record.image_name.clone());
                }
                MatchLabel::FalsePositive => {
                    self.false_positives += 1;
                    self.false_positive_images.push(record.image_name.clone());
                }
                MatchLabel::FalseNegative => {
                    self.false_negatives += 1;
                    self.false_negative_images.push(record.image_name.clone());
                }
            }
        }

        if summary.max_iou_achieved > 0.0 {
            self.iou_sum += summary.max_iou_achieved;
            self.iou_count += 1;
        }

        // Coarse over-detection proxy, not a location-based duplicate check
        if summary.prediction_count > summary.ground_truth_count && summary.ground_truth_count > 0 {
            self.duplicate_images.push(summary.image_name.clone());
        }
    }

    /// Record label lines the loader had to skip
    pub fn add_skipped_lines(&mut self, count: usize) {
        self.skipped_label_lines += count;
    }

    /// Mean of the per-image max IoU, 0 when no image had any overlap
    pub fn average_iou(&self) -> f64 {
        if self.iou_count > 0 {
            self.iou_sum / self.iou_count as f64
        } else {
            0.0
        }
    }

    pub fn precision_recall(&self) -> PrecisionRecall {
        PrecisionRecall::from_counts(self.true_positives, self.false_positives, self.false_negatives)
    }

    pub fn precision(&self) -> f64 {
        self.precision_recall().precision
    }

    pub fn recall(&self) -> f64 {
        self.precision_recall().recall
    }

    pub fn f1_score(&self) -> f64 {
        self.precision_recall().f1()
    }

    /// Get a formatted string summary of the statistics
    pub fn summary_string(&self) -> String {
        format!(
            "AggregateStats {{ images: {}, gt: {}, pred: {}, tp: {}, fp: {}, fn: {}, avg_iou: {:.4} }}",
            self.images,
            self.ground_truths,
            self.predictions,
            self.true_positives,
            self.false_positives,
            self.false_negatives,
            self.average_iou()
        )
    }
}
