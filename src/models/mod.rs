//! Domain models for the weekly case pipeline
//!
//! This module contains the row and table types the pipeline stages operate
//! on, the grouped output rows, and their Arrow conversions.

pub mod aggregate;
pub mod columns;
pub mod conversion;
pub mod record;
pub mod table;
pub mod traits;

// Re-export commonly used types
pub use aggregate::{MacroRegionRow, RegionAggregateRow, SexAggregateRow};
pub use record::{Sex, WeeklyRecord};
pub use table::CaseTable;
pub use traits::ArrowSchema;
