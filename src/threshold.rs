//! Confidence score thresholding utilities.

use crate::error::{Result, YoloEvalError};
use crate::types::NormalizedBox;

/// Filter boxes by confidence score threshold.
///
/// Boxes without a confidence column count as fully confident and are always
/// kept.
///
/// # Errors
///
/// Returns an error if the threshold is not in the valid range [0.0, 1.0].
///
/// # Example
///
/// ```
/// use yolo_eval::threshold::filter_by_confidence;
/// use yolo_eval::types::NormalizedBox;
///
/// let boxes = vec![
///     NormalizedBox::new(0, 0.5, 0.5, 0.2, 0.2).with_confidence(0.9),
///     NormalizedBox::new(0, 0.2, 0.2, 0.1, 0.1).with_confidence(0.3),
///     NormalizedBox::new(1, 0.7, 0.7, 0.1, 0.1),
/// ];
///
/// let filtered = filter_by_confidence(&boxes, 0.5).unwrap();
/// assert_eq!(filtered.len(), 2);
/// ```
pub fn filter_by_confidence(boxes: &[NormalizedBox], threshold: f64) -> Result<Vec<NormalizedBox>> {
    validate_threshold(threshold, "confidence")?;

    Ok(boxes
        .iter()
        .filter(|b| b.confidence() >= threshold)
        .copied()
        .collect())
}

/// Validate that a threshold is in the valid range [0.0, 1.0].
pub(crate) fn validate_threshold(threshold: f64, what: &str) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(YoloEvalError::InvalidThreshold(format!(
            "{what} threshold must be between 0.0 and 1.0, got {threshold}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_by_confidence() {
        let boxes = vec![
            NormalizedBox::new(0, 0.5, 0.5, 0.2, 0.2).with_confidence(0.9),
            NormalizedBox::new(1, 0.2, 0.2, 0.1, 0.1).with_confidence(0.3),
        ];

        let filtered = filter_by_confidence(&boxes, 0.5).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].class_id, 0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let boxes = vec![NormalizedBox::new(0, 0.5, 0.5, 0.2, 0.2).with_confidence(0.5)];
        assert_eq!(filter_by_confidence(&boxes, 0.5).unwrap().len(), 1);
    }

    #[test]
    fn test_zero_threshold_keeps_everything() {
        let boxes = vec![
            NormalizedBox::new(0, 0.5, 0.5, 0.2, 0.2).with_confidence(0.0),
            NormalizedBox::new(0, 0.5, 0.5, 0.2, 0.2),
        ];
        assert_eq!(filter_by_confidence(&boxes, 0.0).unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_threshold() {
        let boxes = vec![];
        assert!(filter_by_confidence(&boxes, 1.5).is_err());
        assert!(filter_by_confidence(&boxes, -0.1).is_err());
        assert!(filter_by_confidence(&boxes, f64::NAN).is_err());
    }
}
