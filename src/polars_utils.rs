/// Utilities for turning match records into Polars DataFrames
///
/// The per-box table is built as a DataFrame so it can be written with the
/// Polars CSV writer or handed to other DataFrame tooling.

use crate::error::YoloEvalError;
use crate::types::{AbsoluteBox, MatchRecord};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Column names of the per-box table, in output order
pub const RECORD_COLUMNS: [&str; 5] = ["image", "gt_bbox", "pred_bbox", "IoU", "error_type"];

/// Build the per-box table
///
/// Absent boxes become nulls, which the CSV writer emits as empty fields.
pub fn records_to_dataframe(records: &[MatchRecord]) -> Result<DataFrame, YoloEvalError> {
    let images: Vec<&str> = records.iter().map(|r| r.image_name.as_str()).collect();
    let gt_boxes: Vec<Option<String>> = records.iter().map(|r| format_box(r.gt_box())).collect();
    let pred_boxes: Vec<Option<String>> = records.iter().map(|r| format_box(r.pred_box())).collect();
    let ious: Vec<f64> = records.iter().map(MatchRecord::iou).collect();
    let labels: Vec<&str> = records.iter().map(|r| r.label().as_str()).collect();

    let df = df!(
        RECORD_COLUMNS[0] => images,
        RECORD_COLUMNS[1] => gt_boxes,
        RECORD_COLUMNS[2] => pred_boxes,
        RECORD_COLUMNS[3] => ious,
        RECORD_COLUMNS[4] => labels,
    )?;

    Ok(df)
}

/// Write a DataFrame as CSV with a header row
pub fn write_dataframe_csv<P: AsRef<Path>>(df: &mut DataFrame, path: P) -> Result<(), YoloEvalError> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}

fn format_box(bbox: Option<&AbsoluteBox>) -> Option<String> {
    bbox.map(ToString::to_string)
}
