//! Weekly case series correction
//!
//! The five stages run in a fixed order over one owned table:
//! week alignment, increment computation, negative correction, outlier
//! bounding and aggregation.

pub mod aggregate;
pub mod increment;
pub mod negative;
pub mod numeric;
pub mod outlier;
pub mod pipeline;
pub mod statistics;
pub mod week;

// Re-export commonly used items
pub use aggregate::{Aggregate, aggregate_by_region, aggregate_by_sex, macro_region_rollup};
pub use increment::{IncrementReport, compute_increments, week_date};
pub use negative::{AdjustmentReport, adjust_negatives};
pub use outlier::{IqrBounds, OutlierReport, bound_outliers};
pub use pipeline::{PipelineOutput, PipelineReport, SeriesPipeline, run};
pub use statistics::SeriesStatistics;
pub use week::{AlignmentReport, align_weeks};
