//! Tests for record batch conversion of the case table

use arrow::array::{Array, AsArray, Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Date32Type, Field, Int64Type, Schema};
use std::sync::Arc;
use weekly_cases::models::columns;
use weekly_cases::{CaseTable, PipelineConfig, RecordBatch, SeriesError, run};

fn batch(regions: Vec<Option<&str>>, male: Vec<Option<i64>>) -> RecordBatch {
    let rows = regions.len();
    let schema = Schema::new(vec![
        Field::new(columns::YEAR, DataType::Int32, false),
        Field::new(columns::WEEK, DataType::Int32, false),
        Field::new(columns::REGION, DataType::Utf8, true),
        Field::new(columns::CUMULATIVE_MALE, DataType::Int64, true),
        Field::new(columns::CUMULATIVE_FEMALE, DataType::Int64, false),
        Field::new("Padecimiento", DataType::Utf8, false),
    ]);
    RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(Int32Array::from(vec![2021; rows])),
            Arc::new(Int32Array::from((2..).take(rows).collect::<Vec<i32>>())),
            Arc::new(StringArray::from(regions)),
            Arc::new(Int64Array::from(male)),
            Arc::new(Int64Array::from(vec![1; rows])),
            Arc::new(StringArray::from(vec!["Dengue"; rows])),
        ],
    )
    .unwrap()
}

#[test]
fn test_null_cumulative_is_a_validation_error() {
    let input = batch(vec![Some("Sonora"), Some("Sonora")], vec![Some(1), None]);

    let err = CaseTable::from_record_batch(&input).unwrap_err();

    assert!(matches!(err, SeriesError::ValidationError(msg) if msg.contains(columns::CUMULATIVE_MALE)));
}

#[test]
fn test_non_integer_week_is_a_type_error() {
    let schema = Schema::new(vec![
        Field::new(columns::YEAR, DataType::Int32, false),
        Field::new(columns::WEEK, DataType::Utf8, false),
        Field::new(columns::REGION, DataType::Utf8, true),
        Field::new(columns::CUMULATIVE_MALE, DataType::Int64, false),
        Field::new(columns::CUMULATIVE_FEMALE, DataType::Int64, false),
    ]);
    let input = RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(Int32Array::from(vec![2021])),
            Arc::new(StringArray::from(vec!["2"])),
            Arc::new(StringArray::from(vec!["Sonora"])),
            Arc::new(Int64Array::from(vec![1])),
            Arc::new(Int64Array::from(vec![1])),
        ],
    )
    .unwrap();

    let err = CaseTable::from_record_batch(&input).unwrap_err();

    assert!(matches!(
        err,
        SeriesError::ColumnTypeError { column, data_type: DataType::Utf8 } if column == columns::WEEK
    ));
}

#[test]
fn test_corrected_table_schema() {
    let input = batch(
        vec![Some("Sonora"), Some("Sonora"), None],
        vec![Some(10), Some(8), Some(3)],
    );
    let table = CaseTable::from_record_batch(&input).unwrap();
    let output = run(table, &PipelineConfig::by_sex()).unwrap();

    let corrected = output.table.to_record_batch().unwrap();

    let names: Vec<&str> = corrected
        .schema_ref()
        .fields()
        .iter()
        .map(|f| f.name().as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            columns::YEAR,
            columns::WEEK,
            columns::REGION,
            columns::CUMULATIVE_MALE,
            columns::CUMULATIVE_FEMALE,
            columns::DATE,
            columns::PREVIOUS_MALE,
            columns::PREVIOUS_FEMALE,
            columns::INCREMENT_MALE,
            columns::INCREMENT_FEMALE,
            "Padecimiento",
        ]
    );
    assert_eq!(corrected.num_rows(), 3);

    let increments = corrected
        .column_by_name(columns::INCREMENT_MALE)
        .unwrap()
        .as_primitive::<Int64Type>();
    assert!(increments.iter().flatten().all(|v| v >= 0));
    assert_eq!(increments.null_count(), 0);

    let dates = corrected
        .column_by_name(columns::DATE)
        .unwrap()
        .as_primitive::<Date32Type>();
    assert_eq!(dates.null_count(), 0);

    // The first row of each series has no previous cumulative count
    let previous = corrected
        .column_by_name(columns::PREVIOUS_MALE)
        .unwrap()
        .as_primitive::<Int64Type>();
    assert_eq!(previous.null_count(), 2);
}

#[test]
fn test_derived_input_columns_are_recomputed() {
    let input = batch(vec![Some("Sonora")], vec![Some(4)]);
    let mut columns_with_stale: Vec<Arc<dyn Array>> = input.columns().to_vec();
    columns_with_stale.push(Arc::new(Int64Array::from(vec![-99])));
    let mut fields: Vec<Field> = input
        .schema()
        .fields()
        .iter()
        .map(|f| f.as_ref().clone())
        .collect();
    fields.push(Field::new(columns::INCREMENT_MALE, DataType::Int64, false));
    let input = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns_with_stale).unwrap();

    let table = CaseTable::from_record_batch(&input).unwrap();

    assert_eq!(table.passthrough().unwrap().num_columns(), 1);
    let corrected = run(table, &PipelineConfig::by_sex())
        .unwrap()
        .table
        .to_record_batch()
        .unwrap();
    let increments = corrected
        .column_by_name(columns::INCREMENT_MALE)
        .unwrap()
        .as_primitive::<Int64Type>();
    assert_eq!(increments.value(0), 4);
    assert_eq!(corrected.num_columns(), 11);
}
