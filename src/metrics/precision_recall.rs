//! Precision, recall and F1 over TP/FP/FN counts.

/// Detection quality derived from one set of TP/FP/FN counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecisionRecall {
    pub precision: f64,
    pub recall: f64,
}

impl PrecisionRecall {
    /// Build from raw counts. A zero denominator yields 0 for the affected value.
    ///
    /// # Example
    ///
    /// ```
    /// use yolo_eval::metrics::PrecisionRecall;
    ///
    /// let pr = PrecisionRecall::from_counts(8, 2, 3);
    /// assert_eq!(pr.precision, 0.8); // 8 / (8 + 2)
    /// assert!((pr.recall - 0.7272).abs() < 0.001); // 8 / (8 + 3)
    /// ```
    pub fn from_counts(true_positives: usize, false_positives: usize, false_negatives: usize) -> Self {
        Self {
            precision: ratio(true_positives, true_positives + false_positives),
            recall: ratio(true_positives, true_positives + false_negatives),
        }
    }

    /// Harmonic mean of precision and recall, 0 when both are 0.
    pub fn f1(&self) -> f64 {
        let sum = self.precision + self.recall;
        if sum == 0.0 {
            0.0
        } else {
            2.0 * self.precision * self.recall / sum
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
