//! Rows of the grouped output tables

use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::columns;
use crate::models::traits::ArrowSchema;

/// National new cases per sex for one week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SexAggregateRow {
    #[serde(rename = "Fecha")]
    pub date: NaiveDate,
    #[serde(rename = "incrementos_hombres")]
    pub male: i64,
    #[serde(rename = "incrementos_mujeres")]
    pub female: i64,
}

/// New cases of one state for one week, tagged with its macro-region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionAggregateRow {
    #[serde(rename = "Fecha")]
    pub date: NaiveDate,
    #[serde(rename = "Entidad")]
    pub region: String,
    #[serde(rename = "incrementos_hombres")]
    pub male: i64,
    #[serde(rename = "incrementos_mujeres")]
    pub female: i64,
    /// `None` when the state is missing from the region map
    #[serde(rename = "Region")]
    pub macro_region: Option<String>,
}

/// New cases of one macro-region for one week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroRegionRow {
    #[serde(rename = "Fecha")]
    pub date: NaiveDate,
    #[serde(rename = "Region")]
    pub macro_region: String,
    #[serde(rename = "incrementos_hombres")]
    pub male: i64,
    #[serde(rename = "incrementos_mujeres")]
    pub female: i64,
}

fn date_field() -> Field {
    Field::new(columns::DATE, DataType::Date32, false)
}

fn increment_fields() -> [Field; 2] {
    [
        Field::new(columns::AGG_INCREMENT_MALE, DataType::Int64, false),
        Field::new(columns::AGG_INCREMENT_FEMALE, DataType::Int64, false),
    ]
}

impl ArrowSchema for SexAggregateRow {
    fn schema() -> Schema {
        let [male, female] = increment_fields();
        Schema::new(vec![date_field(), male, female])
    }

    fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        Ok(serde_arrow::from_record_batch(batch)?)
    }

    fn to_record_batch(rows: &[Self]) -> Result<RecordBatch> {
        Ok(serde_arrow::to_record_batch(&Self::fields(), &rows)?)
    }
}

impl ArrowSchema for RegionAggregateRow {
    fn schema() -> Schema {
        let [male, female] = increment_fields();
        Schema::new(vec![
            date_field(),
            Field::new(columns::REGION, DataType::Utf8, false),
            male,
            female,
            Field::new(columns::MACRO_REGION, DataType::Utf8, true),
        ])
    }

    fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        Ok(serde_arrow::from_record_batch(batch)?)
    }

    fn to_record_batch(rows: &[Self]) -> Result<RecordBatch> {
        Ok(serde_arrow::to_record_batch(&Self::fields(), &rows)?)
    }
}

impl ArrowSchema for MacroRegionRow {
    fn schema() -> Schema {
        let [male, female] = increment_fields();
        Schema::new(vec![
            date_field(),
            Field::new(columns::MACRO_REGION, DataType::Utf8, false),
            male,
            female,
        ])
    }

    fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        Ok(serde_arrow::from_record_batch(batch)?)
    }

    fn to_record_batch(rows: &[Self]) -> Result<RecordBatch> {
        Ok(serde_arrow::to_record_batch(&Self::fields(), &rows)?)
    }
}
