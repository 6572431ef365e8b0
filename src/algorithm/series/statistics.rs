//! Run statistics and summaries
//!
//! This module renders the stage reports of a pipeline run as a
//! human-readable summary.

use std::fmt::Write;

use crate::algorithm::series::aggregate::Aggregate;
use crate::algorithm::series::pipeline::PipelineReport;

/// Functions for pipeline run summaries
pub struct SeriesStatistics;

impl SeriesStatistics {
    /// Share of negative increments that each pass fixed, in percent
    #[must_use]
    pub fn pass_shares(negatives: usize, borrowed: usize, averaged: usize) -> (f64, f64) {
        if negatives == 0 {
            return (0.0, 0.0);
        }
        let total = negatives as f64;
        (
            borrowed as f64 / total * 100.0,
            averaged as f64 / total * 100.0,
        )
    }

    /// Generate a detailed run summary
    #[must_use]
    pub fn generate_summary(report: &PipelineReport, aggregate: &Aggregate) -> String {
        let mut summary = String::new();
        summary.push_str("Weekly Case Series Summary:\n");
        let _ = writeln!(summary, "  Rows Processed: {}", report.alignment.rows);
        let _ = writeln!(summary, "  Regions: {}", report.increments.series);
        let _ = writeln!(
            summary,
            "  Rollover Rows Reassigned: {}",
            report.alignment.rollover_rows
        );
        if report.alignment.global_fallback_rows > 0 {
            let _ = writeln!(
                summary,
                "  Rollover Rows Using Global Max Week: {}",
                report.alignment.global_fallback_rows
            );
        }
        if report.alignment.duplicate_keys > 0 {
            let _ = writeln!(
                summary,
                "  Duplicate (Year, Region, Week) Keys: {}",
                report.alignment.duplicate_keys
            );
        }

        if !report.adjustments.is_empty() {
            summary.push_str("\nNegative Increment Correction:\n");
            for adjustment in &report.adjustments {
                let (borrowed_pct, averaged_pct) = Self::pass_shares(
                    adjustment.negatives_found,
                    adjustment.borrowed,
                    adjustment.averaged,
                );
                let _ = writeln!(
                    summary,
                    "  {}: {} negative, {} borrowed back ({borrowed_pct:.1}%), {} neighbour average ({averaged_pct:.1}%)",
                    adjustment.sex,
                    adjustment.negatives_found,
                    adjustment.borrowed,
                    adjustment.averaged,
                );
            }
        }

        if !report.outliers.is_empty() {
            summary.push_str("\nOutlier Bounds (IQR):\n");
            for outlier in &report.outliers {
                let _ = writeln!(
                    summary,
                    "  {}: Q1={:.2}, Q3={:.2}, bounds [{:.2}, {:.2}], {} below, {} above",
                    outlier.sex,
                    outlier.bounds.q1,
                    outlier.bounds.q3,
                    outlier.bounds.lower,
                    outlier.bounds.upper,
                    outlier.below,
                    outlier.above,
                );
            }
        }

        summary.push_str("\nAggregate:\n");
        match aggregate {
            Aggregate::BySex(_) => summary.push_str("  Grouping: sex\n"),
            Aggregate::ByRegion(_) => summary.push_str("  Grouping: region\n"),
            Aggregate::Empty => summary.push_str("  Grouping: none (unknown mode)\n"),
        }
        let _ = writeln!(summary, "  Rows: {}", aggregate.len());
        if let Some((first, last)) = aggregate.date_span() {
            let _ = writeln!(summary, "  Date Span: {first} to {last}");
        }

        summary
    }
}
