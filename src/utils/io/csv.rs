//! CSV file operations

use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Records sampled for schema inference
pub const INFER_MAX_RECORDS: usize = 1000;

/// Read a CSV file with a header row into one record batch
///
/// Column types are inferred from the first [`INFER_MAX_RECORDS`] records.
pub fn read_csv(path: &Path) -> Result<RecordBatch> {
    let start = Instant::now();
    log::info!("Reading CSV file {}", path.display());

    let mut file = File::open(path)?;
    let (schema, _) = Format::default()
        .with_header(true)
        .infer_schema(&mut file, Some(INFER_MAX_RECORDS))?;
    file.seek(SeekFrom::Start(0))?;

    let schema = Arc::new(schema);
    let batches = ReaderBuilder::new(Arc::clone(&schema))
        .with_header(true)
        .build(file)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let batch = concat_batches(&schema, &batches)?;

    log_operation_complete("read", batch.num_rows(), Some(start.elapsed()));
    Ok(batch)
}

/// Write a record batch to a CSV file with a header row
pub fn write_csv(path: &Path, batch: &RecordBatch) -> Result<()> {
    let start = Instant::now();
    log_operation_start(&format!("Writing {}", path.display()), batch.num_rows());

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(batch)?;

    log_operation_complete("wrote", batch.num_rows(), Some(start.elapsed()));
    Ok(())
}
