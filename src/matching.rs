//! Greedy per-image matching of predictions to ground truth.

use crate::metrics::iou::calculate_iou;
use crate::types::{AbsoluteBox, ImageDimensions, ImageSummary, MatchOutcome, MatchRecord, NormalizedBox};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default IoU at or above which a ground truth counts as detected.
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.5;

/// Whether a prediction that already produced a true positive can still be
/// picked as the best candidate for a later ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Matched predictions leave the candidate pool. Every prediction is a
    /// true positive at most once.
    #[default]
    Exclusive,
    /// Matched predictions stay in the candidate pool, so one prediction can
    /// back several true positives. Only the FP pass deduplicates it.
    ReuseCandidates,
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPolicy::Exclusive => f.write_str("exclusive"),
            MatchPolicy::ReuseCandidates => f.write_str("reuse_candidates"),
        }
    }
}

impl FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "exclusive" => Ok(MatchPolicy::Exclusive),
            "reuse_candidates" | "reuse" => Ok(MatchPolicy::ReuseCandidates),
            other => Err(format!(
                "unknown match policy '{other}', expected 'exclusive' or 'reuse-candidates'"
            )),
        }
    }
}

/// Parameters shared by every image of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOptions {
    pub iou_threshold: f64,
    pub dimensions: ImageDimensions,
    pub policy: MatchPolicy,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            dimensions: ImageDimensions::default(),
            policy: MatchPolicy::default(),
        }
    }
}

/// Everything the matcher produces for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageMatch {
    /// Ground-truth driven records in ground-truth order, followed by the
    /// unmatched predictions in prediction order.
    pub records: Vec<MatchRecord>,
    pub summary: ImageSummary,
}

/// Match the predictions of one image to its ground truth.
///
/// Each ground truth, in input order, picks the prediction with the strictly
/// greatest IoU (the first index wins ties). If that IoU reaches
/// `options.iou_threshold` the pair is a true positive and the prediction is
/// marked as matched, otherwise the ground truth is a false negative. Every
/// prediction left unmarked afterwards is a false positive.
///
/// This is a local greedy assignment, not a global optimum.
///
/// # Example
///
/// ```
/// use yolo_eval::matching::{match_image, MatchOptions};
/// use yolo_eval::types::{MatchLabel, NormalizedBox};
///
/// let gt = vec![NormalizedBox::new(0, 0.5, 0.5, 0.2, 0.2)];
/// let pred = vec![NormalizedBox::new(0, 0.5, 0.5, 0.2, 0.2)];
///
/// let result = match_image(&gt, &pred, "img.png", &MatchOptions::default());
/// assert_eq!(result.records.len(), 1);
/// assert_eq!(result.records[0].label(), MatchLabel::TruePositive);
/// assert_eq!(result.summary.true_positive_count, 1);
/// ```
pub fn match_image(
    ground_truths: &[NormalizedBox],
    predictions: &[NormalizedBox],
    image_name: &str,
    options: &MatchOptions,
) -> ImageMatch {
    let gt_boxes: Vec<AbsoluteBox> = ground_truths
        .iter()
        .map(|b| b.to_absolute(options.dimensions))
        .collect();
    let pred_boxes: Vec<AbsoluteBox> = predictions
        .iter()
        .map(|b| b.to_absolute(options.dimensions))
        .collect();

    let mut matched = vec![false; pred_boxes.len()];
    let mut records = Vec::with_capacity(gt_boxes.len() + pred_boxes.len());
    let mut max_iou_achieved = 0.0_f64;
    let mut true_positive_count = 0;

    for gt in &gt_boxes {
        let (best_iou, best_idx) = find_best_candidate(gt, &pred_boxes, &matched, options.policy);
        max_iou_achieved = max_iou_achieved.max(best_iou);

        // A zero threshold would accept best_iou == 0 with no candidate, which
        // stays a false negative.
        match best_idx {
            Some(idx) if best_iou >= options.iou_threshold => {
                matched[idx] = true;
                true_positive_count += 1;
                records.push(MatchRecord::new(
                    image_name,
                    MatchOutcome::TruePositive {
                        gt: *gt,
                        pred: pred_boxes[idx],
                        iou: best_iou,
                    },
                ));
            }
            _ => {
                records.push(MatchRecord::new(
                    image_name,
                    MatchOutcome::FalseNegative {
                        gt: *gt,
                        best_iou,
                    },
                ));
            }
        }
    }

    for (idx, pred) in pred_boxes.iter().enumerate() {
        if matched[idx] {
            continue;
        }
        records.push(MatchRecord::new(
            image_name,
            MatchOutcome::FalsePositive { pred: *pred },
        ));
    }

    ImageMatch {
        records,
        summary: ImageSummary {
            image_name: image_name.to_string(),
            max_iou_achieved,
            true_positive_count,
            ground_truth_count: gt_boxes.len(),
            prediction_count: pred_boxes.len(),
        },
    }
}

/// Find the prediction overlapping `gt` the most.
///
/// Returns `(0.0, None)` when no candidate has a positive IoU.
fn find_best_candidate(
    gt: &AbsoluteBox,
    predictions: &[AbsoluteBox],
    matched: &[bool],
    policy: MatchPolicy,
) -> (f64, Option<usize>) {
    let mut best_iou = 0.0;
    let mut best_idx = None;

    for (idx, pred) in predictions.iter().enumerate() {
        if policy == MatchPolicy::Exclusive && matched[idx] {
            continue;
        }

        let iou = calculate_iou(gt, pred);
        if iou > best_iou {
            best_iou = iou;
            best_idx = Some(idx);
        }
    }

    (best_iou, best_idx)
}
