//! Run configuration.
//!
//! Values come from [`EvalConfig::default`], optionally overlaid by a TOML
//! file, and finally by command-line flags in the binary.

use crate::error::{Result, YoloEvalError};
use crate::matching::{MatchOptions, MatchPolicy, DEFAULT_IOU_THRESHOLD};
use crate::threshold::validate_threshold;
use crate::types::{ImageDimensions, DEFAULT_IMAGE_HEIGHT, DEFAULT_IMAGE_WIDTH};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything needed to evaluate one dataset split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Directory listing the images to evaluate
    pub images_dir: PathBuf,
    /// Ground-truth label directory, one `<stem>.txt` per image
    pub labels_dir: PathBuf,
    /// Prediction label directory, one `<stem>.txt` per image
    pub predictions_dir: PathBuf,
    pub output_csv: PathBuf,
    pub report_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_path: Option<PathBuf>,
    pub iou_threshold: f64,
    pub image_width: u32,
    pub image_height: u32,
    /// File extensions (without the dot) treated as images
    pub image_extensions: Vec<String>,
    /// Drop predictions below this confidence before matching
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<f64>,
    pub match_policy: MatchPolicy,
    /// Worker threads, 0 for the rayon default
    pub threads: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from("./datasets/test/images"),
            labels_dir: PathBuf::from("./datasets/test/labels"),
            predictions_dir: PathBuf::from("./runs/detect/val/labels"),
            output_csv: PathBuf::from("./eval_result.csv"),
            report_path: PathBuf::from("./eval_report.txt"),
            json_path: None,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            image_width: DEFAULT_IMAGE_WIDTH,
            image_height: DEFAULT_IMAGE_HEIGHT,
            image_extensions: vec!["png".to_string()],
            min_confidence: None,
            match_policy: MatchPolicy::default(),
            threads: 0,
        }
    }
}

impl EvalConfig {
    /// Load and validate a configuration from a TOML file.
    ///
    /// Keys missing from the file keep their default values.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate a configuration from TOML text.
    ///
    /// # Example
    ///
    /// ```
    /// use yolo_eval::config::EvalConfig;
    ///
    /// let config = EvalConfig::from_toml_str("iou_threshold = 0.75\nimage_width = 640").unwrap();
    /// assert_eq!(config.iou_threshold, 0.75);
    /// assert_eq!(config.image_width, 640);
    /// assert_eq!(config.image_height, 512);
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: EvalConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value can be used for a run.
    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.iou_threshold, "IoU")?;

        if let Some(min_confidence) = self.min_confidence {
            validate_threshold(min_confidence, "confidence")?;
        }

        if self.image_width == 0 || self.image_height == 0 {
            return Err(YoloEvalError::InvalidDimensions(format!(
                "image dimensions must be non-zero, got {}x{}",
                self.image_width, self.image_height
            )));
        }

        if self.image_extensions.iter().all(|ext| ext.trim().is_empty()) {
            return Err(YoloEvalError::InvalidConfig(
                "at least one image extension is required".to_string(),
            ));
        }

        Ok(())
    }

    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.image_width, self.image_height)
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            iou_threshold: self.iou_threshold,
            dimensions: self.dimensions(),
            policy: self.match_policy,
        }
    }

    /// Whether `path` has one of the configured image extensions.
    pub fn is_image(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.image_extensions
                    .iter()
                    .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
    }
}
