//! IO utilities for file operations
//!
//! Input tables are read from CSV or Parquet and output tables written to
//! either, chosen by file extension.

pub mod csv;
pub mod parquet;

use arrow::record_batch::RecordBatch;
use std::path::Path;

use crate::error::{Result, SeriesError};

// Re-export commonly used functions for convenience
pub use self::csv::{read_csv, write_csv};
pub use self::parquet::{read_parquet, write_parquet};

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
}

/// Read a `.csv` or `.parquet` file into one record batch
pub fn read_table(path: &Path) -> Result<RecordBatch> {
    match extension(path).as_deref() {
        Some("csv") => read_csv(path),
        Some("parquet") => read_parquet(path),
        _ => Err(SeriesError::IoError(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Unsupported table format: {}", path.display()),
        ))),
    }
}

/// Write a record batch to a `.csv` or `.parquet` file
pub fn write_table(path: &Path, batch: &RecordBatch) -> Result<()> {
    match extension(path).as_deref() {
        Some("csv") => write_csv(path, batch),
        Some("parquet") => write_parquet(path, batch),
        _ => Err(SeriesError::IoError(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Unsupported table format: {}", path.display()),
        ))),
    }
}
