//! Arrow conversion for the weekly case table
//!
//! Reading accepts any integer width for the numeric key columns and any
//! type castable to Utf8 for the region. Columns the pipeline does not read
//! are kept as passthrough and re-emitted in pipeline row order.

use arrow::array::{
    Array, ArrayRef, AsArray, Date32Array, Int32Array, Int64Array, StringArray, UInt64Array,
};
use arrow::compute::{can_cast_types, cast, take};
use arrow::datatypes::{DataType, Date32Type, Field, Int64Type, Schema};
use arrow::record_batch::RecordBatch;
use log::debug;
use std::sync::Arc;

use crate::error::{Result, SeriesError};
use crate::models::columns;
use crate::models::record::{Sex, WeeklyRecord};
use crate::models::table::CaseTable;

/// Read an integer column as 64-bit values
fn int_column(batch: &RecordBatch, name: &str) -> Result<Int64Array> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| SeriesError::MissingColumn(name.to_string()))?;

    if !column.data_type().is_integer() {
        return Err(SeriesError::ColumnTypeError {
            column: name.to_string(),
            data_type: column.data_type().clone(),
        });
    }

    let casted = cast(column, &DataType::Int64)?;
    Ok(casted.as_primitive::<Int64Type>().clone())
}

/// Read a column as strings
fn string_column(batch: &RecordBatch, name: &str) -> Result<StringArray> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| SeriesError::MissingColumn(name.to_string()))?;

    if !can_cast_types(column.data_type(), &DataType::Utf8) {
        return Err(SeriesError::ColumnTypeError {
            column: name.to_string(),
            data_type: column.data_type().clone(),
        });
    }

    let casted = cast(column, &DataType::Utf8)?;
    Ok(casted.as_string::<i32>().clone())
}

fn required_value(array: &Int64Array, column: &str, row: usize) -> Result<i64> {
    if array.is_null(row) {
        return Err(SeriesError::validation(format!(
            "row {row}: null value in column '{column}'"
        )));
    }
    Ok(array.value(row))
}

fn required_i32(array: &Int64Array, column: &str, row: usize) -> Result<i32> {
    let value = required_value(array, column, row)?;
    i32::try_from(value).map_err(|_| {
        SeriesError::validation(format!(
            "row {row}: value {value} in column '{column}' is out of range"
        ))
    })
}

impl CaseTable {
    /// Load the table from a record batch holding the input columns
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Self> {
        let years = int_column(batch, columns::YEAR)?;
        let weeks = int_column(batch, columns::WEEK)?;
        let regions = string_column(batch, columns::REGION)?;
        let male = int_column(batch, Sex::Male.cumulative_column())?;
        let female = int_column(batch, Sex::Female.cumulative_column())?;

        let mut records = Vec::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            let region = (!regions.is_null(row)).then(|| regions.value(row));
            let mut record = WeeklyRecord::new(
                required_i32(&years, columns::YEAR, row)?,
                required_i32(&weeks, columns::WEEK, row)?,
                region,
                required_value(&male, Sex::Male.cumulative_column(), row)?,
                required_value(&female, Sex::Female.cumulative_column(), row)?,
            );
            record.source_row = row;
            records.push(record);
        }

        let schema = batch.schema();
        let passthrough_indices: Vec<usize> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, field)| {
                let name = field.name().as_str();
                if columns::DERIVED_COLUMNS.contains(&name) {
                    debug!("Dropping input column '{name}', it is recomputed by the pipeline");
                    return false;
                }
                !columns::INPUT_COLUMNS.contains(&name)
            })
            .map(|(idx, _)| idx)
            .collect();

        let passthrough = if passthrough_indices.is_empty() {
            None
        } else {
            debug!(
                "Keeping {} passthrough columns",
                passthrough_indices.len()
            );
            Some(batch.project(&passthrough_indices)?)
        };

        Ok(Self::with_passthrough(records, passthrough))
    }

    /// Schema of the corrected table, passthrough columns last
    #[must_use]
    pub fn output_schema(&self) -> Schema {
        let mut fields = vec![
            Field::new(columns::YEAR, DataType::Int32, false),
            Field::new(columns::WEEK, DataType::Int32, false),
            Field::new(columns::REGION, DataType::Utf8, true),
            Field::new(columns::CUMULATIVE_MALE, DataType::Int64, false),
            Field::new(columns::CUMULATIVE_FEMALE, DataType::Int64, false),
            Field::new(columns::DATE, DataType::Date32, true),
            Field::new(columns::PREVIOUS_MALE, DataType::Int64, true),
            Field::new(columns::PREVIOUS_FEMALE, DataType::Int64, true),
            Field::new(columns::INCREMENT_MALE, DataType::Int64, false),
            Field::new(columns::INCREMENT_FEMALE, DataType::Int64, false),
        ];
        if let Some(passthrough) = self.passthrough() {
            fields.extend(
                passthrough
                    .schema()
                    .fields()
                    .iter()
                    .map(|field| field.as_ref().clone()),
            );
        }
        Schema::new(fields)
    }

    /// Convert the table, in its current row order, to a record batch
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let records = self.records();

        let mut arrays: Vec<ArrayRef> = vec![
            Arc::new(records.iter().map(|r| r.year).collect::<Int32Array>()),
            Arc::new(records.iter().map(|r| r.week).collect::<Int32Array>()),
            Arc::new(records.iter().map(WeeklyRecord::region).collect::<StringArray>()),
            Arc::new(records.iter().map(|r| r.cumulative_male).collect::<Int64Array>()),
            Arc::new(records.iter().map(|r| r.cumulative_female).collect::<Int64Array>()),
            Arc::new(
                records
                    .iter()
                    .map(|r| r.date.map(Date32Type::from_naive_date))
                    .collect::<Date32Array>(),
            ),
            Arc::new(records.iter().map(|r| r.previous_male).collect::<Int64Array>()),
            Arc::new(records.iter().map(|r| r.previous_female).collect::<Int64Array>()),
            Arc::new(records.iter().map(|r| r.increment_male).collect::<Int64Array>()),
            Arc::new(records.iter().map(|r| r.increment_female).collect::<Int64Array>()),
        ];

        if let Some(passthrough) = self.passthrough() {
            let indices: UInt64Array = records.iter().map(|r| r.source_row as u64).collect();
            for column in passthrough.columns() {
                arrays.push(take(column.as_ref(), &indices, None)?);
            }
        }

        Ok(RecordBatch::try_new(Arc::new(self.output_schema()), arrays)?)
    }
}
