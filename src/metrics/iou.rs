//! Intersection over Union (IoU) calculation.

use crate::types::AbsoluteBox;

/// Calculate the Intersection over Union (IoU) between two corner-form boxes.
///
/// IoU is defined as the area of intersection divided by the area of union.
/// Intersection width and height are clamped at zero, and a zero union
/// (two degenerate boxes) yields 0 rather than NaN.
///
/// The boxes are not validated. Inverted corners produce a non-positive area
/// and a meaningless result, so callers are expected to pass well-formed boxes.
///
/// # Example
///
/// ```
/// use yolo_eval::metrics::iou::calculate_iou;
/// use yolo_eval::types::AbsoluteBox;
///
/// let a = AbsoluteBox::new(0.0, 0.0, 10.0, 10.0);
/// let b = AbsoluteBox::new(5.0, 5.0, 15.0, 15.0);
/// let iou = calculate_iou(&a, &b);
/// assert!(iou > 0.0 && iou < 1.0);
/// ```
pub fn calculate_iou(a: &AbsoluteBox, b: &AbsoluteBox) -> f64 {
    let x_left = a.x1.max(b.x1);
    let y_top = a.y1.max(b.y1);
    let x_right = a.x2.min(b.x2);
    let y_bottom = a.y2.min(b.y2);

    let intersection_area = (x_right - x_left).max(0.0) * (y_bottom - y_top).max(0.0);
    let union_area = a.area() + b.area() - intersection_area;

    if union_area == 0.0 {
        return 0.0;
    }

    intersection_area / union_area
}

/// Calculate IoU matrix between two sets of boxes.
///
/// `result[i][j]` is the IoU between `boxes1[i]` and `boxes2[j]`.
///
/// # Example
///
/// ```
/// use yolo_eval::metrics::iou::calculate_iou_matrix;
/// use yolo_eval::types::AbsoluteBox;
///
/// let gts = vec![AbsoluteBox::new(0.0, 0.0, 10.0, 10.0)];
/// let preds = vec![AbsoluteBox::new(5.0, 5.0, 15.0, 15.0)];
/// let matrix = calculate_iou_matrix(&gts, &preds);
/// assert_eq!(matrix.len(), 1);
/// assert_eq!(matrix[0].len(), 1);
/// ```
pub fn calculate_iou_matrix(boxes1: &[AbsoluteBox], boxes2: &[AbsoluteBox]) -> Vec<Vec<f64>> {
    boxes1
        .iter()
        .map(|a| boxes2.iter().map(|b| calculate_iou(a, b)).collect())
        .collect()
}
