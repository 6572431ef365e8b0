//! Owned in-memory table handed from stage to stage

use arrow::record_batch::RecordBatch;

use crate::models::record::{Sex, WeeklyRecord};

fn chronological_key(record: &WeeklyRecord) -> (i32, bool, Option<&str>, i32) {
    (record.year, record.region.is_none(), record.region(), record.week)
}

/// The weekly case table.
///
/// Rows are never created or removed by the pipeline, only relabelled,
/// reordered and annotated. Columns the pipeline does not interpret are kept
/// in `passthrough`, indexed by each record's `source_row`.
#[derive(Debug, Clone, Default)]
pub struct CaseTable {
    records: Vec<WeeklyRecord>,
    passthrough: Option<RecordBatch>,
}

impl CaseTable {
    /// Build a table from records, numbering them in the given order
    #[must_use]
    pub fn from_records(mut records: Vec<WeeklyRecord>) -> Self {
        for (idx, record) in records.iter_mut().enumerate() {
            record.source_row = idx;
        }
        Self {
            records,
            passthrough: None,
        }
    }

    /// Build a table whose records already point into `passthrough`
    pub(crate) fn with_passthrough(
        records: Vec<WeeklyRecord>,
        passthrough: Option<RecordBatch>,
    ) -> Self {
        Self {
            records,
            passthrough,
        }
    }

    #[must_use]
    pub fn records(&self) -> &[WeeklyRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [WeeklyRecord] {
        &mut self.records
    }

    /// Columns carried through untouched, in input row order
    #[must_use]
    pub fn passthrough(&self) -> Option<&RecordBatch> {
        self.passthrough.as_ref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Snapshot of one increment column in table order
    #[must_use]
    pub fn increments(&self, sex: Sex) -> Vec<i64> {
        self.records.iter().map(|r| r.increment(sex)).collect()
    }

    /// Overwrite one increment column in table order
    pub(crate) fn set_increments(&mut self, sex: Sex, values: &[i64]) {
        for (record, &value) in self.records.iter_mut().zip(values) {
            record.set_increment(sex, value);
        }
    }

    /// Stable sort by (year, region, week), rows without a region last
    /// within their year
    pub(crate) fn sort_chronologically(&mut self) {
        self.records
            .sort_by(|a, b| chronological_key(a).cmp(&chronological_key(b)));
    }
}
