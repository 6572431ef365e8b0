//! Logging utilities
//!
//! This module provides standardized logging functions for pipeline stages.

/// Log a stage start with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `rows` - Number of rows the stage works on
pub fn log_operation_start(operation: &str, rows: usize) {
    log::info!("{operation} ({rows} rows)");
}

/// Log a stage completion with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `items` - Number of items produced or affected
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(
    operation: &str,
    items: usize,
    elapsed: Option<std::time::Duration>,
) {
    if let Some(duration) = elapsed {
        log::info!("Successfully {operation} {items} items in {duration:?}");
    } else {
        log::info!("Successfully {operation} {items} items");
    }
}

/// Log a non-fatal condition the caller must handle
///
/// # Arguments
/// * `message` - Warning message
pub fn log_warning(message: &str) {
    log::warn!("{message}");
}
