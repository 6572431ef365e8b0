//! Negative increment correction
//!
//! Retroactive corrections of the cumulative counter show up as negative
//! increments. Two passes remove them, each column independently:
//!
//! 1. Borrow-back: a negative week that directly follows a positive week of
//!    the same region and year is merged into that previous week (clamped at
//!    zero), and the negative week is re-estimated as the mean of up to three
//!    preceding weeks of the same region and year.
//! 2. Neighbour average: any value still negative is replaced by the mean of
//!    the values right before and after it in table order, with missing
//!    neighbours counting as zero.
//!
//! Both passes read a snapshot of the column taken when the pass starts.

use log::{debug, info};
use smallvec::SmallVec;
use std::time::Instant;

use crate::algorithm::series::numeric::{round_half_even, rounded_mean};
use crate::models::{CaseTable, Sex, WeeklyRecord};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Preceding weeks averaged when re-estimating a borrowed-back week
pub const TRAILING_WINDOW: usize = 3;

/// Outcome of negative correction for one increment column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustmentReport {
    pub sex: Sex,
    /// Negative values before the first pass
    pub negatives_found: usize,
    /// Values fixed by borrow-back
    pub borrowed: usize,
    /// Values fixed by neighbour average
    pub averaged: usize,
    /// Neighbour averages that were still negative and set to zero
    pub clamped: usize,
}

/// Borrow-back over a column snapshot.
///
/// `records` must be in table order with each (region, year) run contiguous,
/// as left by week alignment. Returns the corrected column and the number of
/// rows it fixed.
#[must_use]
pub fn borrow_back_values(records: &[WeeklyRecord], original: &[i64]) -> (Vec<i64>, usize) {
    let mut values = original.to_vec();

    let targets: Vec<usize> = (1..records.len().min(original.len()))
        .filter(|&idx| {
            original[idx] < 0 && original[idx - 1] > 0 && records[idx].follows(&records[idx - 1])
        })
        .collect();

    for &idx in &targets {
        values[idx - 1] = (original[idx - 1] + original[idx]).max(0);
    }

    // Means read the merged previous weeks but not other replacements
    let estimates: Vec<i64> = targets
        .iter()
        .map(|&idx| trailing_mean(records, &values, idx))
        .collect();
    for (&idx, estimate) in targets.iter().zip(estimates) {
        values[idx] = estimate;
    }

    (values, targets.len())
}

fn trailing_mean(records: &[WeeklyRecord], values: &[i64], idx: usize) -> i64 {
    let current = &records[idx];
    let window: SmallVec<[i64; TRAILING_WINDOW]> = (0..idx)
        .rev()
        .take_while(|&prev| records[prev].same_series(current))
        .take(TRAILING_WINDOW)
        .map(|prev| values[prev])
        .collect();
    rounded_mean(&window)
}

/// Neighbour average over a column snapshot.
///
/// Returns the corrected column, the number of rows replaced and how many of
/// those replacements were clamped to zero.
#[must_use]
pub fn neighbor_average_values(original: &[i64]) -> (Vec<i64>, usize, usize) {
    let mut values = original.to_vec();
    let mut averaged = 0;
    let mut clamped = 0;

    for (idx, &value) in original.iter().enumerate() {
        if value >= 0 {
            continue;
        }
        let previous = idx.checked_sub(1).map_or(0, |prev| original[prev]);
        let next = original.get(idx + 1).copied().unwrap_or(0);
        let mean = round_half_even((previous + next) as f64 / 2.0);

        averaged += 1;
        values[idx] = if mean < 0 {
            clamped += 1;
            0
        } else {
            mean
        };
    }

    (values, averaged, clamped)
}

/// Apply borrow-back to one increment column of the table
pub fn borrow_back(table: &mut CaseTable, sex: Sex) -> usize {
    let (values, fixed) = borrow_back_values(table.records(), &table.increments(sex));
    table.set_increments(sex, &values);
    fixed
}

/// Apply neighbour average to one increment column of the table
pub fn neighbor_average(table: &mut CaseTable, sex: Sex) -> (usize, usize) {
    let (values, averaged, clamped) = neighbor_average_values(&table.increments(sex));
    table.set_increments(sex, &values);
    (averaged, clamped)
}

/// Run both passes over both increment columns
pub fn adjust_negatives(table: &mut CaseTable) -> Vec<AdjustmentReport> {
    let start = Instant::now();
    log_operation_start("Adjusting negative increments", table.len());

    let mut reports = Vec::with_capacity(Sex::ALL.len());
    for sex in Sex::ALL {
        let negatives_found = table.records().iter().filter(|r| r.increment(sex) < 0).count();
        let borrowed = borrow_back(table, sex);
        let (averaged, clamped) = neighbor_average(table, sex);

        info!(
            "'{sex}': {negatives_found} negative values, {borrowed} borrowed back, {averaged} replaced by neighbour average"
        );
        if clamped > 0 {
            debug!("'{sex}': {clamped} neighbour averages were negative and set to 0");
        }

        reports.push(AdjustmentReport {
            sex,
            negatives_found,
            borrowed,
            averaged,
            clamped,
        });
    }

    let fixed = reports.iter().map(|r| r.borrowed + r.averaged).sum();
    log_operation_complete("corrected", fixed, Some(start.elapsed()));
    reports
}
