//! Ordered composition of the correction stages
//!
//! `SeriesPipeline` owns the table and moves through the stage markers
//! `Raw → Aligned → Incremented → Adjusted → Bounded`. Each stage method
//! consumes the pipeline and is only defined on the marker it follows, so a
//! reordered pipeline does not compile.

use log::info;
use std::marker::PhantomData;
use std::time::Instant;

use crate::algorithm::series::aggregate::{
    Aggregate, aggregate, macro_region_rollup, macro_region_series,
};
use crate::algorithm::series::increment::{IncrementReport, compute_increments};
use crate::algorithm::series::negative::{AdjustmentReport, adjust_negatives};
use crate::algorithm::series::outlier::{OutlierReport, bound_outliers};
use crate::algorithm::series::week::{AlignmentReport, align_weeks};
use crate::config::{OutlierConfig, PipelineConfig};
use crate::error::Result;
use crate::models::{CaseTable, MacroRegionRow};

/// Table as loaded
#[derive(Debug)]
pub struct Raw;
/// Weeks realigned and rows sorted
#[derive(Debug)]
pub struct Aligned;
/// Increments and dates computed
#[derive(Debug)]
pub struct Incremented;
/// Negative increments removed
#[derive(Debug)]
pub struct Adjusted;
/// Outliers bounded (or treatment skipped)
#[derive(Debug)]
pub struct Bounded;

/// Reports collected from each stage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineReport {
    pub alignment: AlignmentReport,
    pub increments: IncrementReport,
    pub adjustments: Vec<AdjustmentReport>,
    pub outliers: Vec<OutlierReport>,
}

/// The correction pipeline at stage `S`
#[derive(Debug)]
pub struct SeriesPipeline<S> {
    table: CaseTable,
    report: PipelineReport,
    _stage: PhantomData<S>,
}

impl<S> SeriesPipeline<S> {
    fn advance<T>(self) -> SeriesPipeline<T> {
        SeriesPipeline {
            table: self.table,
            report: self.report,
            _stage: PhantomData,
        }
    }

    /// The table in its current state
    #[must_use]
    pub fn table(&self) -> &CaseTable {
        &self.table
    }

    /// Reports of the stages run so far
    #[must_use]
    pub fn report(&self) -> &PipelineReport {
        &self.report
    }
}

impl SeriesPipeline<Raw> {
    #[must_use]
    pub fn new(table: CaseTable) -> Self {
        Self {
            table,
            report: PipelineReport::default(),
            _stage: PhantomData,
        }
    }

    pub fn align_weeks(mut self) -> Result<SeriesPipeline<Aligned>> {
        self.report.alignment = align_weeks(&mut self.table)?;
        Ok(self.advance())
    }
}

impl SeriesPipeline<Aligned> {
    pub fn compute_increments(mut self) -> Result<SeriesPipeline<Incremented>> {
        self.report.increments = compute_increments(&mut self.table)?;
        Ok(self.advance())
    }
}

impl SeriesPipeline<Incremented> {
    #[must_use]
    pub fn adjust_negatives(mut self) -> SeriesPipeline<Adjusted> {
        self.report.adjustments = adjust_negatives(&mut self.table);
        self.advance()
    }
}

impl SeriesPipeline<Adjusted> {
    pub fn bound_outliers(mut self, config: &OutlierConfig) -> Result<SeriesPipeline<Bounded>> {
        self.report.outliers = bound_outliers(&mut self.table, config)?;
        Ok(self.advance())
    }
}

impl SeriesPipeline<Bounded> {
    /// Group the corrected table and hand everything to the caller
    #[must_use]
    pub fn aggregate(self, config: &PipelineConfig) -> PipelineOutput {
        let aggregate = aggregate(&self.table, config);
        PipelineOutput {
            table: self.table,
            aggregate,
            report: self.report,
            target_region: config.target_region.clone(),
        }
    }
}

/// Result of a complete pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Corrected per-row table
    pub table: CaseTable,
    /// Grouped table; may be empty
    pub aggregate: Aggregate,
    pub report: PipelineReport,
    target_region: Option<String>,
}

impl PipelineOutput {
    /// Totals per (date, macro-region); empty unless grouped by region
    #[must_use]
    pub fn macro_region_summary(&self) -> Vec<MacroRegionRow> {
        match &self.aggregate {
            Aggregate::ByRegion(rows) => macro_region_rollup(rows),
            _ => Vec::new(),
        }
    }

    /// Date-ordered series of the configured macro-region
    #[must_use]
    pub fn target_region_series(&self) -> Vec<MacroRegionRow> {
        self.target_region
            .as_deref()
            .map(|region| macro_region_series(&self.macro_region_summary(), region))
            .unwrap_or_default()
    }
}

/// Run every stage in order
pub fn run(table: CaseTable, config: &PipelineConfig) -> Result<PipelineOutput> {
    let start = Instant::now();
    info!("Running weekly case pipeline on {} rows", table.len());

    let output = SeriesPipeline::new(table)
        .align_weeks()?
        .compute_increments()?
        .adjust_negatives()
        .bound_outliers(&config.outliers)?
        .aggregate(config);

    info!("Pipeline completed in {:?}", start.elapsed());
    Ok(output)
}
