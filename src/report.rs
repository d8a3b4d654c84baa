//! Report writers for a finished evaluation.

use crate::error::Result;
use crate::polars_utils::{records_to_dataframe, write_dataframe_csv};
use crate::stats::AggregateStats;
use crate::types::MatchRecord;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// Per-category folders suggested for visual inspection of the results.
const VISUALIZATION_DIRS: [(&str, &str); 4] = [
    ("false_positive", "analysis_output/visualizations/false_positive"),
    ("false_negative", "analysis_output/visualizations/false_negative"),
    ("duplicates", "analysis_output/visualizations/duplicates"),
    ("true_positive", "analysis_output/visualizations/true_positive"),
];

/// Write one CSV row per match record.
///
/// Columns: `image, gt_bbox, pred_bbox, IoU, error_type`. Boxes are written
/// as `[x1, y1, x2, y2]`, absent boxes as empty fields.
pub fn write_csv<P: AsRef<Path>>(records: &[MatchRecord], path: P) -> Result<()> {
    let mut df = records_to_dataframe(records)?;
    write_dataframe_csv(&mut df, path)
}

/// Render the human-readable summary.
///
/// # Example
///
/// ```
/// use yolo_eval::report::render_summary;
/// use yolo_eval::stats::AggregateStats;
///
/// let text = render_summary(&AggregateStats::new(), 0.5);
/// assert!(text.contains("IoU threshold: 0.5"));
/// ```
pub fn render_summary(stats: &AggregateStats, iou_threshold: f64) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "# YOLO evaluation summary\n");
    let _ = writeln!(out, "IoU threshold: {iou_threshold}");
    let _ = writeln!(out, "Images: {}", stats.images);
    let _ = writeln!(out, "Ground-truth boxes: {}", stats.ground_truths);
    let _ = writeln!(out, "Predicted boxes: {}", stats.predictions);
    let _ = writeln!(
        out,
        "True Positive (TP): {} / average IoU: {:.4}",
        stats.true_positives,
        stats.average_iou()
    );
    let _ = writeln!(out, "False Positive (FP): {}", stats.false_positives);
    let _ = writeln!(out, "False Negative (FN): {}", stats.false_negatives);
    let _ = writeln!(out, "Images with extra predictions: {}", stats.duplicate_images.len());
    let _ = writeln!(
        out,
        "Precision: {:.4} / Recall: {:.4} / F1: {:.4}",
        stats.precision(),
        stats.recall(),
        stats.f1_score()
    );
    if stats.skipped_label_lines > 0 {
        let _ = writeln!(out, "Skipped label lines: {}", stats.skipped_label_lines);
    }

    let _ = writeln!(out, "\n## Images by outcome");
    let _ = writeln!(out, "- with FP: {}", format_names(&stats.false_positive_images));
    let _ = writeln!(out, "- with FN: {}", format_names(&stats.false_negative_images));
    let _ = writeln!(out, "- with extra predictions: {}", format_names(&stats.duplicate_images));
    let _ = writeln!(out, "- with TP: {}", format_names(&stats.true_positive_images));

    let _ = writeln!(out, "\n## Visualization folders (create them before exporting)");
    for (category, dir) in VISUALIZATION_DIRS {
        let _ = writeln!(out, "- {category}: {dir}");
    }

    out
}

/// Write the human-readable summary to `path`.
pub fn write_summary<P: AsRef<Path>>(stats: &AggregateStats, iou_threshold: f64, path: P) -> Result<()> {
    fs::write(path, render_summary(stats, iou_threshold))?;
    Ok(())
}

/// Machine-readable counterpart of the text summary.
#[derive(Debug, Serialize)]
pub struct JsonSummary<'a> {
    pub iou_threshold: f64,
    pub average_iou: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    #[serde(flatten)]
    pub stats: &'a AggregateStats,
}

impl<'a> JsonSummary<'a> {
    pub fn new(stats: &'a AggregateStats, iou_threshold: f64) -> Self {
        Self {
            iou_threshold,
            average_iou: stats.average_iou(),
            precision: stats.precision(),
            recall: stats.recall(),
            f1_score: stats.f1_score(),
            stats,
        }
    }
}

/// Write the statistics and derived metrics as pretty-printed JSON.
pub fn write_json_summary<P: AsRef<Path>>(stats: &AggregateStats, iou_threshold: f64, path: P) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &JsonSummary::new(stats, iou_threshold))?;
    Ok(())
}

fn format_names(names: &[String]) -> String {
    format!("[{}]", names.join(", "))
}
