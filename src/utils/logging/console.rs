//! Console output utilities
//!
//! This module provides utilities for formatted console output.

use arrow::record_batch::RecordBatch;

/// Print summary information about an output table
pub fn print_batch_summary(name: &str, batch: &RecordBatch) {
    println!(
        "{name}: {} rows, {} columns",
        batch.num_rows(),
        batch.num_columns()
    );
}

/// Print detailed schema information of a batch
pub fn print_schema_info(batch: &RecordBatch) {
    println!("Schema:");
    for field in batch.schema().fields() {
        println!("  - {} ({})", field.name(), field.data_type());
    }
}
