//! Parquet file operations
//!
//! This module provides utilities for reading a Parquet file into a single
//! Arrow record batch and writing record batches back to Parquet.

use std::fs::File;
use std::path::Path;
use std::time::Instant;

use arrow::compute::concat_batches;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::Result;
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Rows decoded per batch when reading Parquet
pub const READ_BATCH_SIZE: usize = 16384;

/// Read a Parquet file into one record batch
///
/// # Arguments
/// * `path` - Path to the Parquet file
///
/// # Errors
/// Returns an error if the file cannot be opened or if the Parquet file is invalid
pub fn read_parquet(path: &Path) -> Result<RecordBatch> {
    let start = Instant::now();
    log::info!("Reading parquet file {}", path.display());

    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?
        .with_batch_size(READ_BATCH_SIZE);
    let schema = builder.schema().clone();

    let batches = builder
        .build()?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let batch = concat_batches(&schema, &batches)?;

    log_operation_complete("read", batch.num_rows(), Some(start.elapsed()));
    Ok(batch)
}

/// Write a record batch to a Parquet file, replacing any existing file
///
/// # Errors
/// Returns an error if the file cannot be created or the batch cannot be encoded
pub fn write_parquet(path: &Path, batch: &RecordBatch) -> Result<()> {
    let start = Instant::now();
    log_operation_start(&format!("Writing {}", path.display()), batch.num_rows());

    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;

    log_operation_complete("wrote", batch.num_rows(), Some(start.elapsed()));
    Ok(())
}
