//! Run reporting.
//!
//! Tracks what each run read, skipped and produced so that skipped inputs
//! are never silent.

pub mod log;

// Re-export commonly used types
pub use log::{RunReport, SkippedFile, PRODUCER_NAME};
