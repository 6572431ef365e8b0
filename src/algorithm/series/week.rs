//! Week alignment
//!
//! The agency labels each week one higher than its chronological position,
//! except for label 1, which marks the closing partial week of the previous
//! epidemiological year. Alignment shifts every other label down by one and
//! moves rollover rows to the end of the previous year of their region.

use itertools::Itertools;
use log::{debug, warn};
use rustc_hash::FxHashMap;
use std::time::Instant;

use crate::algorithm::series::increment::week_date;
use crate::error::{Result, SeriesError};
use crate::models::{CaseTable, WeeklyRecord};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Smallest week label accepted on input
pub const MIN_WEEK: i32 = 1;
/// Largest week label accepted on input
pub const MAX_WEEK: i32 = 53;

/// Outcome of week alignment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignmentReport {
    /// Rows in the table
    pub rows: usize,
    /// Rows reported with week label 1 and moved to the previous year
    pub rollover_rows: usize,
    /// Rollover rows whose region had no data for the previous year
    pub global_fallback_rows: usize,
    /// Rows sharing a (year, region, week) key with the row before them
    pub duplicate_keys: usize,
}

/// Whether every week of `year`, and the last week of the year before it,
/// maps to a calendar date
fn year_has_dates(year: i32) -> bool {
    year.checked_sub(1)
        .is_some_and(|previous| week_date(previous, MAX_WEEK).is_ok())
        && week_date(year, MIN_WEEK).is_ok()
        && week_date(year, MAX_WEEK).is_ok()
}

/// Reject any row whose raw week label is outside `[1, 53]` or whose year
/// has no calendar dates
pub fn validate_weeks(table: &CaseTable) -> Result<()> {
    for (row, record) in table.records().iter().enumerate() {
        if !(MIN_WEEK..=MAX_WEEK).contains(&record.week) {
            return Err(SeriesError::validation(format!(
                "week {} outside [{MIN_WEEK}, {MAX_WEEK}] at row {row} (year {}, region {})",
                record.week,
                record.year,
                record.region().unwrap_or("<none>"),
            )));
        }
        if !year_has_dates(record.year) {
            return Err(SeriesError::validation(format!(
                "year {} outside the calendar range at row {row} (region {})",
                record.year,
                record.region().unwrap_or("<none>"),
            )));
        }
    }
    Ok(())
}

fn key(record: &WeeklyRecord) -> (i32, Option<&str>, i32) {
    (record.year, record.region(), record.week)
}

/// Realign week labels and sort the table by (year, region, week).
///
/// Validation runs before any row is touched, so a rejected table is left
/// exactly as it was.
pub fn align_weeks(table: &mut CaseTable) -> Result<AlignmentReport> {
    let start = Instant::now();
    log_operation_start("Aligning epidemiological weeks", table.len());

    validate_weeks(table)?;

    let records = table.records_mut();
    let mut rollover = Vec::new();
    for (idx, record) in records.iter_mut().enumerate() {
        if record.week == MIN_WEEK {
            rollover.push(idx);
        } else {
            record.week -= 1;
        }
    }
    debug!("{} rows identified with week = 1", rollover.len());

    // Highest aligned week per (year, region), from rows already aligned
    let mut max_week: FxHashMap<(i32, Option<String>), i32> = FxHashMap::default();
    for (idx, record) in records.iter().enumerate() {
        if rollover.binary_search(&idx).is_ok() {
            continue;
        }
        let entry = max_week
            .entry((record.year, record.region.clone()))
            .or_insert(record.week);
        *entry = (*entry).max(record.week);
    }
    let global_max = records.iter().map(|r| r.week).max().unwrap_or(MIN_WEEK);

    let mut global_fallback_rows = 0;
    for &idx in &rollover {
        let record = &mut records[idx];
        let previous_year = record.year - 1;
        let ceiling = match max_week.get(&(previous_year, record.region.clone())) {
            Some(&week) => week,
            None => {
                global_fallback_rows += 1;
                global_max
            }
        };
        record.year = previous_year;
        record.week = ceiling + 1;
    }
    if global_fallback_rows > 0 {
        debug!(
            "{global_fallback_rows} rollover rows had no previous year for their region, using global max week {global_max}"
        );
    }

    table.sort_chronologically();

    let duplicate_keys = table
        .records()
        .iter()
        .tuple_windows()
        .filter(|(a, b)| key(a) == key(b))
        .count();
    if duplicate_keys > 0 {
        warn!("{duplicate_keys} rows share a (year, region, week) key after alignment");
    }

    log_operation_complete("aligned", table.len(), Some(start.elapsed()));

    Ok(AlignmentReport {
        rows: table.len(),
        rollover_rows: rollover.len(),
        global_fallback_rows,
        duplicate_keys,
    })
}
