//! Loading utilities for YOLO text label files.
//!
//! Each non-empty line holds one box: `class cx cy w h`, optionally followed
//! by a confidence score. Malformed lines are dropped and counted instead of
//! failing the whole file.

use crate::error::Result;
use crate::types::NormalizedBox;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Boxes read from one label file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelSet {
    pub boxes: Vec<NormalizedBox>,
    /// Lines that were present but could not be turned into a valid box.
    pub skipped_lines: usize,
}

impl LabelSet {
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

/// Load a YOLO label file.
///
/// A file that does not exist is treated as an image with no boxes. Any other
/// I/O failure is returned as an error.
///
/// # Example
///
/// ```no_run
/// use yolo_eval::loader::load_label_file;
///
/// let labels = load_label_file("datasets/test/labels/0001.txt").unwrap();
/// println!("Loaded {} boxes", labels.len());
/// ```
pub fn load_label_file<P: AsRef<Path>>(path: P) -> Result<LabelSet> {
    let path = path.as_ref();
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(LabelSet::default()),
        Err(err) => return Err(err.into()),
    };

    let labels = parse_labels(&contents);
    if labels.skipped_lines > 0 {
        warn!(
            path = %path.display(),
            skipped = labels.skipped_lines,
            "skipped malformed label lines"
        );
    }

    Ok(labels)
}

/// Parse YOLO label text.
///
/// # Example
///
/// ```
/// use yolo_eval::loader::parse_labels;
///
/// let labels = parse_labels("0 0.5 0.5 0.2 0.2\n1 0.1 0.1 0.05 0.05 0.87\nbroken line\n");
/// assert_eq!(labels.len(), 2);
/// assert_eq!(labels.skipped_lines, 1);
/// assert_eq!(labels.boxes[1].confidence, Some(0.87));
/// ```
pub fn parse_labels(contents: &str) -> LabelSet {
    let mut labels = LabelSet::default();

    for (line_no, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_line(line) {
            Some(bbox) => labels.boxes.push(bbox),
            None => {
                debug!(line = line_no + 1, content = line, "ignoring malformed label line");
                labels.skipped_lines += 1;
            }
        }
    }

    labels
}

/// Parse a single `class cx cy w h [confidence]` line.
fn parse_line(line: &str) -> Option<NormalizedBox> {
    let values: Vec<f64> = line
        .split_whitespace()
        .map(|field| field.parse::<f64>().ok())
        .collect::<Option<Vec<_>>>()?;

    if values.len() != 5 && values.len() != 6 {
        return None;
    }

    let class_id = parse_class_id(values[0])?;
    let mut bbox = NormalizedBox::new(class_id, values[1], values[2], values[3], values[4]);
    if !bbox.is_valid() {
        return None;
    }

    if let Some(&confidence) = values.get(5) {
        if !confidence.is_finite() {
            return None;
        }
        bbox = bbox.with_confidence(confidence);
    }

    Some(bbox)
}

/// Class ids are written as integers but may come through as `3.0`.
fn parse_class_id(value: f64) -> Option<u32> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        Some(value as u32)
    } else {
        None
    }
}
