//! Algorithm implementations for weekly surveillance data
//!
//! This module contains the correction pipeline that turns cumulative
//! weekly reports into corrected incremental series.

pub mod series;
