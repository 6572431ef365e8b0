//! Trait definitions for tabular models

use arrow::datatypes::{FieldRef, Schema};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

use crate::error::Result;

/// A trait for models that can be converted to and from Arrow `RecordBatch`.
pub trait ArrowSchema: Sized {
    /// Get the Arrow schema for this model
    fn schema() -> Schema;

    /// Convert a `RecordBatch` to a vector of this model
    fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>>;

    /// Convert a vector of this model to a `RecordBatch`
    fn to_record_batch(models: &[Self]) -> Result<RecordBatch>;

    /// Get the schema as Arc<Schema>
    fn schema_ref() -> Arc<Schema> {
        Arc::new(Self::schema())
    }

    /// Schema fields in the form `serde_arrow` expects
    fn fields() -> Vec<FieldRef> {
        Self::schema().fields().iter().map(Arc::clone).collect()
    }
}
