use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between loading a dataset and writing an artifact.
#[derive(Debug, Error)]
pub enum DataVisError {
    #[error("File '{}' not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("Unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("Missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("Row {row}, column '{column}': '{value}' is not a number")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Malformed input: {0}")]
    Malformed(String),

    /// Statistics that cannot be computed for the given data.
    #[error("Computation error: {0}")]
    Computation(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("PNG encoding error: {0}")]
    Png(#[from] png::EncodingError),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl DataVisError {
    /// Wrap a plotting backend failure.
    pub fn render(err: impl std::fmt::Display) -> Self {
        DataVisError::Render(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataVisError>;
