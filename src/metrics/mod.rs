//! Overlap and detection-quality metrics.

pub mod iou;
pub mod precision_recall;

pub use iou::{calculate_iou, calculate_iou_matrix};
pub use precision_recall::PrecisionRecall;
