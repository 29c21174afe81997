//! Motion Vectorizer - per-second feature vectors from VR tracking data.
//!
//! This library turns raw per-frame head and hand tracking samples into
//! fixed-length feature vectors, one per complete window of samples, and
//! aggregates per-subject recordings into one combined table.
//!
//! # Feature Vectors
//!
//! - **Windows**: non-overlapping runs of `sampling_rate` samples (default 90);
//!   a trailing partial window is discarded
//! - **Channels**: 3 groups (head, left hand, right hand) × 3 position + 3
//!   rotation axes, supplied as configuration
//! - **Statistics**: max, min, median, mean and sample std per channel
//! - **Dimensions**: 18 channels × 5 statistics = 90 when fully present
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Motion Vectorizer                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │ Aggregator  │──▶│  Windowing  │──▶│  Features   │       │
//! │  │ (TSV tree)  │   │ (90 frames) │   │ (5 stats)   │       │
//! │  └─────────────┘   └─────────────┘   └─────────────┘       │
//! │         │                                    │              │
//! │         ▼                                    ▼              │
//! │  ┌─────────────┐                     ┌─────────────┐       │
//! │  │ Run Report  │                     │  Feature    │       │
//! │  │             │                     │   Table     │       │
//! │  └─────────────┘                     └─────────────┘       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use motion_vectorizer::{config::ChannelGroups, core, tsv};
//!
//! let recording = tsv::read_recording("combined_motion_data.tsv").expect("readable input");
//! let groups = ChannelGroups::default();
//!
//! let table = core::vectorize(&recording, &groups, 90).expect("90 dimensions");
//! tsv::write_feature_table("processed_dataset.tsv", &table).expect("writable output");
//! ```

pub mod aggregate;
pub mod config;
pub mod core;
pub mod error;
pub mod report;
pub mod tsv;

// Re-export key types at crate root for convenience
pub use aggregate::{Aggregation, Aggregator, SourceFile};
pub use config::{AggregationConfig, ChannelGroup, ChannelGroups, Config, ConfigError};
pub use crate::core::{
    vectorize, vectorize_with_expected, FeatureTable, FeatureVector, Recording, Statistic,
};
pub use error::{TableError, VectorizeError};
pub use report::{RunReport, SkippedFile};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
