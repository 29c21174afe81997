//! Core feature extraction.
//!
//! This module contains:
//! - The in-memory sample table
//! - Window partitioning of a sample stream
//! - Per-window channel statistics
//! - The vectorizer assembling fixed-dimension feature vectors

pub mod features;
pub mod recording;
pub mod vectorizer;
pub mod windowing;

// Re-export commonly used types
pub use features::{channel_statistics, dimension_name, ChannelStatistics, Statistic};
pub use recording::Recording;
pub use vectorizer::{
    check_dimensions, vectorize, vectorize_with, vectorize_with_expected, FeatureTable,
    FeatureVector, VectorizeOptions, DEFAULT_METADATA_FIELDS,
};
pub use windowing::{partition, SampleWindow, WindowPlan};
