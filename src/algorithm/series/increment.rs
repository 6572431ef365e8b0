//! Incremental counts from cumulative counts
//!
//! Each region is one series in table order. A row takes the cumulative
//! counts of the previous row of its region as baseline; the first row of a
//! region and any aligned week 1 start a fresh accumulation and use the
//! cumulative value itself.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use log::debug;
use rustc_hash::FxHashMap;
use std::time::Instant;

use crate::error::{Result, SeriesError};
use crate::models::{CaseTable, Sex};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Outcome of increment computation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncrementReport {
    /// Rows in the table
    pub rows: usize,
    /// Distinct regions seen
    pub series: usize,
    /// Rows without a predecessor in their region
    pub series_starts: usize,
    /// Rows with a predecessor that restart at aligned week 1
    pub week_one_resets: usize,
    /// Negative male increments before correction
    pub negative_male: usize,
    /// Negative female increments before correction
    pub negative_female: usize,
    /// Week-1 dates moved forward to January 1
    pub dates_clamped: usize,
}

impl IncrementReport {
    /// Negative increments before correction for one sex
    #[must_use]
    pub const fn negatives(&self, sex: Sex) -> usize {
        match sex {
            Sex::Male => self.negative_male,
            Sex::Female => self.negative_female,
        }
    }
}

/// Monday of ISO week 1 of `year`, advanced by `week - 1` weeks
pub fn iso_week_monday(year: i32, week: i32) -> Result<NaiveDate> {
    let offset = u64::try_from(week - 1)
        .map_err(|_| SeriesError::validation(format!("week {week} of {year} is before week 1")))?;

    NaiveDate::from_isoywd_opt(year, 1, Weekday::Mon)
        .and_then(|first| first.checked_add_days(Days::new(offset * 7)))
        .ok_or_else(|| {
            SeriesError::validation(format!("week {week} of {year} is outside the calendar range"))
        })
}

/// Calendar date of an aligned (year, week).
///
/// ISO week 1 may start in late December; such dates are moved to
/// January 1 of `year`.
pub fn week_date(year: i32, week: i32) -> Result<NaiveDate> {
    let monday = iso_week_monday(year, week)?;
    if monday.year() < year {
        return NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| {
            SeriesError::validation(format!("year {year} is outside the calendar range"))
        });
    }
    Ok(monday)
}

/// Fill previous cumulative counts, increments and dates on an aligned table
pub fn compute_increments(table: &mut CaseTable) -> Result<IncrementReport> {
    let start = Instant::now();
    log_operation_start("Preparing weekly time series", table.len());

    let mut report = IncrementReport {
        rows: table.len(),
        ..IncrementReport::default()
    };
    let mut last_seen: FxHashMap<String, (i64, i64)> = FxHashMap::default();

    // Dates are resolved first so a failure leaves the table untouched
    let dates = table
        .records()
        .iter()
        .map(|record| {
            let date = week_date(record.year, record.week)?;
            let clamped = record.week == 1 && iso_week_monday(record.year, record.week)? != date;
            Ok((date, clamped))
        })
        .collect::<Result<Vec<_>>>()?;

    for (record, (date, clamped)) in table.records_mut().iter_mut().zip(dates) {
        // Rows without a region belong to no series
        let previous = record.region.as_ref().and_then(|region| {
            last_seen.insert(
                region.clone(),
                (record.cumulative_male, record.cumulative_female),
            )
        });

        record.set_previous(Sex::Male, previous.map(|(male, _)| male));
        record.set_previous(Sex::Female, previous.map(|(_, female)| female));

        if previous.is_none() {
            report.series_starts += 1;
        } else if record.week == 1 {
            report.week_one_resets += 1;
        }

        for sex in Sex::ALL {
            let increment = match record.previous(sex) {
                Some(baseline) if record.week != 1 => record.cumulative(sex) - baseline,
                _ => record.cumulative(sex),
            };
            record.set_increment(sex, increment);
            if increment < 0 {
                match sex {
                    Sex::Male => report.negative_male += 1,
                    Sex::Female => report.negative_female += 1,
                }
            }
        }

        if clamped {
            report.dates_clamped += 1;
        }
        record.date = Some(date);
    }
    report.series = last_seen.len();

    debug!(
        "{} series, {} series starts, {} week-1 resets",
        report.series, report.series_starts, report.week_one_resets
    );
    debug!(
        "Negative increments before correction: {} male, {} female",
        report.negative_male, report.negative_female
    );

    log_operation_complete("computed increments for", table.len(), Some(start.elapsed()));
    Ok(report)
}
