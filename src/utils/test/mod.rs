//! Test utilities
//!
//! This module provides fixtures and assertions shared by the tests.


// Re-export commonly used functions for convenience
pub use fixtures::{increment_series, record, region_map, synthetic_reports, table};
pub use helpers::{assert_non_negative, increments, keys};
