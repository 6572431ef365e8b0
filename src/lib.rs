//! Correction pipeline for weekly cumulative case reports.
//!
//! Reports of a notifiable disease arrive as cumulative counts per region
//! and sex, labelled with the agency's own week numbering and carrying
//! negative jumps from retroactive corrections. The pipeline realigns the
//! weeks, derives incremental counts, removes negative increments, bounds
//! outliers and aggregates the result by sex or by macro-region.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;

// Re-export the most common types for easier use
pub use config::{Grouping, OutlierConfig, PipelineConfig, RegionMap};
pub use error::{Result, SeriesError};
pub use models::{ArrowSchema, CaseTable, Sex, WeeklyRecord};

// Pipeline
pub use algorithm::series::{
    Aggregate, PipelineOutput, PipelineReport, SeriesPipeline, SeriesStatistics, run,
};

// Arrow types
pub use arrow::record_batch::RecordBatch;
