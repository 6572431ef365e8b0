//! Utility functions
//!
//! File IO, logging helpers and test fixtures.

pub mod io;
pub mod logging;
pub mod test;

pub use io::{read_table, write_table};
