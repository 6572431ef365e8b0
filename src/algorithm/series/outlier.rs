//! IQR outlier bounding
//!
//! Quartiles are computed over the whole column, not per region. Values
//! outside `[Q1 - factor * IQR, Q3 + factor * IQR]` are clipped to the bound
//! they cross and the column is rounded back to integers.

use log::{debug, info};
use std::time::Instant;

use crate::algorithm::series::numeric::round_half_even;
use crate::config::OutlierConfig;
use crate::error::Result;
use crate::models::{CaseTable, Sex};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Quartiles and clipping range of one column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    /// Compute bounds for a column, `None` when it is empty
    #[must_use]
    pub fn from_values(values: &[i64], factor: f64) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().map(|&v| v as f64).collect();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25)?;
        let q3 = quantile(&sorted, 0.75)?;
        let iqr = q3 - q1;
        Some(Self {
            q1,
            q3,
            iqr,
            lower: q1 - factor * iqr,
            upper: q3 + factor * iqr,
        })
    }

    /// Clip a value into the bounds, rounding any clipped value
    #[must_use]
    pub fn clip(&self, value: i64) -> i64 {
        let as_float = value as f64;
        if as_float < self.lower {
            round_half_even(self.lower)
        } else if as_float > self.upper {
            round_half_even(self.upper)
        } else {
            value
        }
    }
}

/// Quantile of sorted data, interpolating linearly between closest ranks
#[must_use]
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Outcome of bounding one increment column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierReport {
    pub sex: Sex,
    pub bounds: IqrBounds,
    /// Values raised to the lower bound
    pub below: usize,
    /// Values lowered to the upper bound
    pub above: usize,
}

/// Clip one increment column of the table
pub fn bound_column(table: &mut CaseTable, sex: Sex, factor: f64) -> Option<OutlierReport> {
    let values = table.increments(sex);
    let Some(bounds) = IqrBounds::from_values(&values, factor) else {
        debug!("'{sex}' is empty, skipping outlier treatment");
        return None;
    };

    let below = values.iter().filter(|&&v| (v as f64) < bounds.lower).count();
    let above = values.iter().filter(|&&v| (v as f64) > bounds.upper).count();

    info!(
        "Interquartile range for '{sex}': IQR={}, Q1={}, Q3={}",
        bounds.iqr, bounds.q1, bounds.q3
    );
    info!("Lower bound: {} | Rows below the bound: {below}", bounds.lower);
    info!("Upper bound: {} | Rows above the bound: {above}", bounds.upper);

    let clipped: Vec<i64> = values.iter().map(|&v| bounds.clip(v)).collect();
    table.set_increments(sex, &clipped);

    Some(OutlierReport {
        sex,
        bounds,
        below,
        above,
    })
}

/// Clip the configured increment columns, if IQR treatment is enabled
pub fn bound_outliers(table: &mut CaseTable, config: &OutlierConfig) -> Result<Vec<OutlierReport>> {
    if !config.enabled {
        debug!("IQR outlier treatment disabled");
        return Ok(Vec::new());
    }

    let start = Instant::now();
    log_operation_start("Bounding outliers by IQR", table.len());
    info!(
        "IQR imputation enabled | Columns: {:?} | Factor: {}",
        config.columns, config.factor
    );

    let mut reports = Vec::new();
    for sex in config.sexes()? {
        if let Some(report) = bound_column(table, sex, config.factor) {
            reports.push(report);
        }
    }

    let clipped = reports.iter().map(|r| r.below + r.above).sum();
    log_operation_complete("clipped", clipped, Some(start.elapsed()));
    Ok(reports)
}
