//! Core data types for YOLO labels and match results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default image width used when converting normalized boxes.
pub const DEFAULT_IMAGE_WIDTH: u32 = 512;

/// Default image height used when converting normalized boxes.
pub const DEFAULT_IMAGE_HEIGHT: u32 = 512;

/// Pixel dimensions of the images a label set refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    /// Create new image dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for ImageDimensions {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_WIDTH, DEFAULT_IMAGE_HEIGHT)
    }
}

/// A box in YOLO label format.
///
/// Coordinates are normalized to the image size and given as center-x,
/// center-y, width and height. Values outside `[0, 1]` are accepted and
/// carried through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedBox {
    pub class_id: u32,
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
    /// Detection confidence, present on prediction files written with
    /// confidences enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl NormalizedBox {
    /// Create a new normalized box without a confidence score.
    pub fn new(class_id: u32, center_x: f64, center_y: f64, width: f64, height: f64) -> Self {
        Self {
            class_id,
            center_x,
            center_y,
            width,
            height,
            confidence: None,
        }
    }

    /// Attach a confidence score.
    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Get the confidence score, defaulting to 1.0 if not present.
    pub fn confidence(&self) -> f64 {
        self.confidence.unwrap_or(1.0)
    }

    /// Check that all values are finite and the box has positive extent.
    pub fn is_valid(&self) -> bool {
        [self.center_x, self.center_y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Convert to absolute corner coordinates for an image of the given size.
    ///
    /// No clamping is applied, so boxes that hang over the image border keep
    /// their out-of-range corners.
    pub fn to_absolute(&self, dimensions: ImageDimensions) -> AbsoluteBox {
        let img_w = f64::from(dimensions.width);
        let img_h = f64::from(dimensions.height);
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;

        AbsoluteBox::new(
            (self.center_x - half_w) * img_w,
            (self.center_y - half_h) * img_h,
            (self.center_x + half_w) * img_w,
            (self.center_y + half_h) * img_h,
        )
    }
}

/// A box in pixel space given by its top-left and bottom-right corners.
///
/// Corner ordering is not enforced; an inverted box has a non-positive area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbsoluteBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl AbsoluteBox {
    /// Create a new absolute box.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Get the signed area of the box.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

impl fmt::Display for AbsoluteBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.x1, self.y1, self.x2, self.y2)
    }
}

/// Classification assigned to a box by the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchLabel {
    #[serde(rename = "TP")]
    TruePositive,
    #[serde(rename = "FP")]
    FalsePositive,
    #[serde(rename = "FN")]
    FalseNegative,
}

impl MatchLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchLabel::TruePositive => "TP",
            MatchLabel::FalsePositive => "FP",
            MatchLabel::FalseNegative => "FN",
        }
    }
}

impl fmt::Display for MatchLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the matcher decided for one box, with the boxes involved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "label")]
pub enum MatchOutcome {
    /// A ground truth paired with a prediction at or above the IoU threshold.
    #[serde(rename = "TP")]
    TruePositive {
        gt: AbsoluteBox,
        pred: AbsoluteBox,
        iou: f64,
    },
    /// A ground truth with no qualifying prediction. `best_iou` is the
    /// highest overlap seen, which stayed below the threshold.
    #[serde(rename = "FN")]
    FalseNegative { gt: AbsoluteBox, best_iou: f64 },
    /// A prediction that no ground truth claimed.
    #[serde(rename = "FP")]
    FalsePositive { pred: AbsoluteBox },
}

/// One row of the per-box evaluation output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub image_name: String,
    pub outcome: MatchOutcome,
}

impl MatchRecord {
    pub fn new(image_name: impl Into<String>, outcome: MatchOutcome) -> Self {
        Self {
            image_name: image_name.into(),
            outcome,
        }
    }

    pub fn label(&self) -> MatchLabel {
        match self.outcome {
            MatchOutcome::TruePositive { .. } => MatchLabel::TruePositive,
            MatchOutcome::FalseNegative { .. } => MatchLabel::FalseNegative,
            MatchOutcome::FalsePositive { .. } => MatchLabel::FalsePositive,
        }
    }

    pub fn gt_box(&self) -> Option<&AbsoluteBox> {
        match &self.outcome {
            MatchOutcome::TruePositive { gt, .. } | MatchOutcome::FalseNegative { gt, .. } => {
                Some(gt)
            }
            MatchOutcome::FalsePositive { .. } => None,
        }
    }

    pub fn pred_box(&self) -> Option<&AbsoluteBox> {
        match &self.outcome {
            MatchOutcome::TruePositive { pred, .. } | MatchOutcome::FalsePositive { pred } => {
                Some(pred)
            }
            MatchOutcome::FalseNegative { .. } => None,
        }
    }

    /// IoU reported for this record. False positives report 0.
    pub fn iou(&self) -> f64 {
        match self.outcome {
            MatchOutcome::TruePositive { iou, .. } => iou,
            MatchOutcome::FalseNegative { best_iou, .. } => best_iou,
            MatchOutcome::FalsePositive { .. } => 0.0,
        }
    }
}

/// Per-image result handed from the matcher to the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSummary {
    pub image_name: String,
    /// Highest best-match IoU over all ground truths, 0 if there were none.
    pub max_iou_achieved: f64,
    pub true_positive_count: usize,
    pub ground_truth_count: usize,
    pub prediction_count: usize,
}
