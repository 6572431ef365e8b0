//! Tests for aggregation and macro-region roll-up

use chrono::NaiveDate;
use weekly_cases::algorithm::series::aggregate::{aggregate, macro_region_series};
use weekly_cases::algorithm::series::{
    Aggregate, aggregate_by_region, aggregate_by_sex, compute_increments, macro_region_rollup,
};
use weekly_cases::models::{CaseTable, SexAggregateRow};
use weekly_cases::utils::test::{region_map, table};
use weekly_cases::{ArrowSchema, Grouping, PipelineConfig, Sex};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Aligned weeks 10 and 11 of 2021 for four states, one of them unmapped
fn dated_table() -> CaseTable {
    let mut table = table(&[
        (2021, 10, "Ciudad de México", 5, 3),
        (2021, 11, "Ciudad de México", 9, 4),
        (2021, 10, "Morelos", 2, 2),
        (2021, 11, "Morelos", 3, 5),
        (2021, 10, "Sonora", 7, 1),
        (2021, 11, "Sonora", 7, 6),
        (2021, 10, "Zacatecas", 1, 1),
        (2021, 11, "Zacatecas", 4, 1),
    ]);
    compute_increments(&mut table).unwrap();
    table
}

#[test]
fn test_sex_aggregate_sums_all_regions_per_date() {
    let table = dated_table();

    let rows = aggregate_by_sex(&table);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, date(2021, 3, 8));
    assert_eq!((rows[0].male, rows[0].female), (15, 7));
    assert_eq!(rows[1].date, date(2021, 3, 15));
    assert_eq!((rows[1].male, rows[1].female), (8, 9));

    let total: i64 = rows.iter().map(|r| r.male).sum();
    assert_eq!(total, table.increments(Sex::Male).iter().sum::<i64>());
}

#[test]
fn test_region_aggregate_tags_macro_regions() {
    let table = dated_table();

    let rows = aggregate_by_region(&table, &region_map());

    assert_eq!(rows.len(), 8);
    let zacatecas: Vec<_> = rows.iter().filter(|r| r.region == "Zacatecas").collect();
    assert_eq!(zacatecas.len(), 2);
    assert!(zacatecas.iter().all(|r| r.macro_region.is_none()));
    let morelos = rows.iter().find(|r| r.region == "Morelos").unwrap();
    assert_eq!(morelos.macro_region.as_deref(), Some("Centro"));
}

#[test]
fn test_rollup_excludes_unmapped_states() {
    let table = dated_table();
    let rows = aggregate_by_region(&table, &region_map());

    let rollup = macro_region_rollup(&rows);

    let keys: Vec<(&str, NaiveDate)> = rollup
        .iter()
        .map(|r| (r.macro_region.as_str(), r.date))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("Centro", date(2021, 3, 8)),
            ("Centro", date(2021, 3, 15)),
            ("Noroeste", date(2021, 3, 8)),
            ("Noroeste", date(2021, 3, 15)),
        ]
    );
    assert_eq!((rollup[0].male, rollup[0].female), (7, 5));
    assert_eq!((rollup[1].male, rollup[1].female), (5, 4));

    let mapped_total: i64 = rows
        .iter()
        .filter(|r| r.macro_region.is_some())
        .map(|r| r.male)
        .sum();
    assert_eq!(rollup.iter().map(|r| r.male).sum::<i64>(), mapped_total);
}

#[test]
fn test_target_series_is_date_ordered() {
    let table = dated_table();
    let rollup = macro_region_rollup(&aggregate_by_region(&table, &region_map()));

    let series = macro_region_series(&rollup, "Noroeste");

    assert_eq!(series.len(), 2);
    assert!(series[0].date < series[1].date);
    assert_eq!((series[1].male, series[1].female), (0, 5));
    assert!(macro_region_series(&rollup, "Sureste").is_empty());
}

#[test]
fn test_unknown_grouping_yields_empty_aggregate() {
    let table = dated_table();
    let config = PipelineConfig::from_yaml_str("agrupa: edad").unwrap();
    assert_eq!(config.grouping, Grouping::from("edad"));

    let result = aggregate(&table, &config);

    assert_eq!(result, Aggregate::Empty);
    assert!(result.is_empty());
    assert!(result.date_span().is_none());
    assert!(result.to_record_batch().unwrap().is_none());
}

#[test]
fn test_aggregate_converts_to_record_batch() {
    let table = dated_table();

    let result = aggregate(&table, &PipelineConfig::by_region("Centro", region_map()));

    assert_eq!(result.date_span(), Some((date(2021, 3, 8), date(2021, 3, 15))));
    let batch = result.to_record_batch().unwrap().unwrap();
    assert_eq!(batch.num_rows(), 8);
    assert!(batch.column_by_name("Region").is_some());
    assert!(batch.column_by_name("incrementos_hombres").is_some());
}

#[test]
fn test_sex_aggregate_reads_back_from_record_batch() {
    let rows = aggregate_by_sex(&dated_table());
    let batch = SexAggregateRow::to_record_batch(&rows).unwrap();

    assert_eq!(batch.schema_ref().as_ref(), &SexAggregateRow::schema());
    assert_eq!(SexAggregateRow::from_record_batch(&batch).unwrap(), rows);
}
