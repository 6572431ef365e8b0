//! Aggregation of the corrected series
//!
//! `sexo` sums both increment columns nationally per date. `region` sums per
//! (date, state) and tags each state with its macro-region; states missing
//! from the region map keep a `None` macro-region and are left out of the
//! macro-region roll-up only.

use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use itertools::Itertools;
use log::{debug, info};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::config::{Grouping, PipelineConfig, RegionMap};
use crate::error::Result;
use crate::models::{ArrowSchema, CaseTable, MacroRegionRow, RegionAggregateRow, SexAggregateRow};
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// Grouped output of the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Aggregate {
    /// National totals per date
    BySex(Vec<SexAggregateRow>),
    /// Totals per (date, state) with macro-region
    ByRegion(Vec<RegionAggregateRow>),
    /// Unknown grouping mode
    Empty,
}

impl Aggregate {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::BySex(rows) => rows.len(),
            Self::ByRegion(rows) => rows.len(),
            Self::Empty => 0,
        }
    }

    /// Callers must check this before using the result
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Earliest and latest date present
    #[must_use]
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let dates: Vec<NaiveDate> = match self {
            Self::BySex(rows) => rows.iter().map(|r| r.date).collect(),
            Self::ByRegion(rows) => rows.iter().map(|r| r.date).collect(),
            Self::Empty => Vec::new(),
        };
        dates.into_iter().minmax().into_option()
    }

    /// Convert to a record batch, `None` when there is nothing to write
    pub fn to_record_batch(&self) -> Result<Option<RecordBatch>> {
        match self {
            Self::BySex(rows) => SexAggregateRow::to_record_batch(rows).map(Some),
            Self::ByRegion(rows) => RegionAggregateRow::to_record_batch(rows).map(Some),
            Self::Empty => Ok(None),
        }
    }
}

/// National totals per date, sorted by date
#[must_use]
pub fn aggregate_by_sex(table: &CaseTable) -> Vec<SexAggregateRow> {
    let mut totals: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();
    let mut undated = 0;

    for record in table.records() {
        let Some(date) = record.date else {
            undated += 1;
            continue;
        };
        let entry = totals.entry(date).or_default();
        entry.0 += record.increment_male;
        entry.1 += record.increment_female;
    }
    if undated > 0 {
        debug!("{undated} rows without a date left out of the aggregate");
    }

    totals
        .into_iter()
        .map(|(date, (male, female))| SexAggregateRow { date, male, female })
        .collect()
}

/// Totals per (date, state), sorted by date then state
#[must_use]
pub fn aggregate_by_region(table: &CaseTable, region_map: &RegionMap) -> Vec<RegionAggregateRow> {
    let mut totals: BTreeMap<(NaiveDate, &str), (i64, i64)> = BTreeMap::new();
    let mut skipped = 0;

    for record in table.records() {
        let (Some(date), Some(region)) = (record.date, record.region()) else {
            skipped += 1;
            continue;
        };
        let entry = totals.entry((date, region)).or_default();
        entry.0 += record.increment_male;
        entry.1 += record.increment_female;
    }
    if skipped > 0 {
        debug!("{skipped} rows without a date or region left out of the aggregate");
    }

    let rows: Vec<RegionAggregateRow> = totals
        .into_iter()
        .map(|((date, region), (male, female))| RegionAggregateRow {
            date,
            region: region.to_string(),
            male,
            female,
            macro_region: region_map.macro_region(region).map(str::to_string),
        })
        .collect();

    let unmapped = rows.iter().filter(|r| r.macro_region.is_none()).count();
    if unmapped > 0 {
        debug!("{unmapped} aggregated rows belong to states without a macro-region");
    }
    rows
}

/// Group the corrected table as configured
#[must_use]
pub fn aggregate(table: &CaseTable, config: &PipelineConfig) -> Aggregate {
    let start = Instant::now();
    log_operation_start(&format!("Applying grouping '{}'", config.grouping), table.len());

    let result = match &config.grouping {
        Grouping::Sex => Aggregate::BySex(aggregate_by_sex(table)),
        Grouping::Region => Aggregate::ByRegion(aggregate_by_region(table, &config.region_map)),
        Grouping::Unknown(mode) => {
            log_warning(&format!(
                "Unknown grouping '{mode}', no aggregate will be produced"
            ));
            Aggregate::Empty
        }
    };

    info!("Obtained {} grouped rows", result.len());
    log_operation_complete("grouped", result.len(), Some(start.elapsed()));
    result
}

/// Totals per (date, macro-region), sorted by macro-region then date.
///
/// Rows of unmapped states are dropped.
#[must_use]
pub fn macro_region_rollup(rows: &[RegionAggregateRow]) -> Vec<MacroRegionRow> {
    let mut totals: BTreeMap<(&str, NaiveDate), (i64, i64)> = BTreeMap::new();
    for row in rows {
        if let Some(macro_region) = row.macro_region.as_deref() {
            let entry = totals.entry((macro_region, row.date)).or_default();
            entry.0 += row.male;
            entry.1 += row.female;
        }
    }

    totals
        .into_iter()
        .map(|((macro_region, date), (male, female))| MacroRegionRow {
            date,
            macro_region: macro_region.to_string(),
            male,
            female,
        })
        .collect()
}

/// Date-ordered series of one macro-region from a roll-up
#[must_use]
pub fn macro_region_series(rollup: &[MacroRegionRow], macro_region: &str) -> Vec<MacroRegionRow> {
    let mut series: Vec<MacroRegionRow> = rollup
        .iter()
        .filter(|row| row.macro_region == macro_region)
        .cloned()
        .collect();
    series.sort_by_key(|row| row.date);
    series
}
