//! Tests for reading and writing tables

use arrow::array::AsArray;
use arrow::datatypes::{DataType, Int64Type};
use std::fs;
use tempfile::tempdir;
use weekly_cases::models::columns;
use weekly_cases::utils::{read_table, write_table};
use weekly_cases::{CaseTable, PipelineConfig, SeriesError, run};

const REPORT_CSV: &str = "\
Anio,Semana,Entidad,Acumulado_hombres,Acumulado_mujeres,Padecimiento
2021,2,Sonora,100,40,Dengue
2021,3,Sonora,110,45,Dengue
2021,4,Sonora,104,47,Dengue
2021,5,Sonora,125,50,Dengue
2021,2,Morelos,10,10,Dengue
2021,3,Morelos,15,12,Dengue
";

#[test]
fn test_csv_to_parquet_round_trip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("reportes.csv");
    fs::write(&input, REPORT_CSV).unwrap();

    let batch = read_table(&input).unwrap();
    assert_eq!(batch.num_rows(), 6);
    let table = CaseTable::from_record_batch(&batch).unwrap();
    let output = run(table, &PipelineConfig::by_sex()).unwrap();

    let corrected = output.table.to_record_batch().unwrap();
    let parquet_path = dir.path().join("series_corregidas.parquet");
    write_table(&parquet_path, &corrected).unwrap();

    let reread = read_table(&parquet_path).unwrap();
    let types = |batch: &weekly_cases::RecordBatch| -> Vec<(String, DataType)> {
        batch
            .schema()
            .fields()
            .iter()
            .map(|f| (f.name().clone(), f.data_type().clone()))
            .collect()
    };
    assert_eq!(types(&reread), types(&corrected));
    assert_eq!(reread.num_rows(), 6);

    // Morelos sorts first; the Sonora drop at week 3 is merged into week 2 and
    // re-estimated from the weeks before it
    let male = reread
        .column_by_name(columns::INCREMENT_MALE)
        .unwrap()
        .as_primitive::<Int64Type>();
    let values: Vec<i64> = male.iter().flatten().collect();
    assert_eq!(values, vec![10, 5, 100, 4, 52, 21]);

    let aggregate = output.aggregate.to_record_batch().unwrap().unwrap();
    let aggregate_path = dir.path().join("agrupado.csv");
    write_table(&aggregate_path, &aggregate).unwrap();
    let written = fs::read_to_string(&aggregate_path).unwrap();
    assert!(written.starts_with("Fecha,incrementos_hombres,incrementos_mujeres"));
}

#[test]
fn test_unsupported_extension_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("reportes.xlsx");
    fs::write(&path, "").unwrap();

    let err = read_table(&path).unwrap_err();

    assert!(matches!(err, SeriesError::IoError(_)));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();

    let err = read_table(&dir.path().join("ausente.parquet")).unwrap_err();

    assert!(matches!(err, SeriesError::IoError(_)));
}
