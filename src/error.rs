//! Error types for the yolo-eval library.

use thiserror::Error;

/// Result type for yolo-eval operations.
pub type Result<T> = std::result::Result<T, YoloEvalError>;

/// Error types that can occur while loading labels, configuring a run or
/// writing reports.
///
/// Matching and aggregation never fail; every variant here comes from the
/// surrounding I/O and configuration layers.
#[derive(Error, Debug)]
pub enum YoloEvalError {
    /// Error during I/O operations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error during JSON serialization.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error while building or writing a DataFrame.
    #[error("Polars error: {0}")]
    PolarsError(#[from] polars::error::PolarsError),

    /// Error while parsing a TOML configuration file.
    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Invalid IoU or confidence threshold.
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Image dimensions that cannot be used for box conversion.
    #[error("Invalid image dimensions: {0}")]
    InvalidDimensions(String),

    /// Any other configuration value that failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A required input directory does not exist.
    #[error("Missing directory: {0}")]
    MissingDirectory(String),
}
