//! Error handling for the weekly case pipeline.

use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use std::io;
use thiserror::Error;

/// Specialized error type for the weekly case pipeline
#[derive(Debug, Error)]
pub enum SeriesError {
    /// Malformed source data that must be rejected rather than coerced
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// A required input column is absent
    #[error("Missing column: {0}")]
    MissingColumn(String),
    /// A required input column has a type that cannot be read
    #[error("Column '{column}' has unsupported type {data_type}")]
    ColumnTypeError {
        /// Name of the offending column
        column: String,
        /// Type found in the input
        data_type: DataType,
    },
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// A configured column name does not refer to an increment column
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
    /// Error opening, reading or writing a file
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    /// Error building or casting Arrow data
    #[error("Arrow error: {0}")]
    ArrowError(#[from] ArrowError),
    /// Error reading or writing Parquet data
    #[error("Parquet error: {0}")]
    ParquetError(#[from] ParquetError),
    /// Error converting rows to or from Arrow via serde
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_arrow::Error> for SeriesError {
    fn from(error: serde_arrow::Error) -> Self {
        Self::SerializationError(error.to_string())
    }
}

impl SeriesError {
    /// Create a validation error from any displayable message
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// Create a configuration error from any displayable message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, SeriesError>;
