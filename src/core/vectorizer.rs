//! Windowed feature extraction.
//!
//! Turns a time-ordered recording into one feature vector per complete
//! window. For each configured channel present in the input, five statistics
//! are computed per window and named `{channel}_{statistic}`. Metadata is
//! copied from the first sample of each window.
//!
//! Channel presence is decided once from the recording's header, so every
//! output row carries the same dimension set. A single end-of-run check
//! compares the realized dimension count against the expected total.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::config::ChannelGroups;
use crate::core::features::{channel_statistics, dimension_name, Statistic};
use crate::core::recording::Recording;
use crate::core::windowing::{partition, SampleWindow, WindowPlan};
use crate::error::VectorizeError;

/// Metadata columns copied onto every feature vector by default.
pub const DEFAULT_METADATA_FIELDS: [&str; 4] = ["user", "subject", "session", "build"];

/// Feature vector for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// The window this vector was computed from
    pub window: SampleWindow,
    /// Statistic values, aligned with [`FeatureTable::dimensions`]
    pub values: Vec<f64>,
    /// Metadata values, aligned with [`FeatureTable::metadata_fields`]
    pub metadata: Vec<String>,
}

/// All feature vectors for a recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    /// Configured channels found in the input, in configuration order
    pub channels: Vec<String>,
    /// Statistic dimension names, channel-major
    pub dimensions: Vec<String>,
    pub metadata_fields: Vec<String>,
    pub rows: Vec<FeatureVector>,
    /// Trailing samples that did not fill a window
    pub discarded_samples: usize,
}

impl FeatureTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of distinct statistic dimensions.
    pub fn dimension_count(&self) -> usize {
        self.dimensions.iter().collect::<BTreeSet<_>>().len()
    }

    /// Output header: statistic dimensions followed by metadata fields.
    pub fn header(&self) -> Vec<String> {
        self.dimensions
            .iter()
            .chain(self.metadata_fields.iter())
            .cloned()
            .collect()
    }

    /// Look up one value by row and dimension name.
    pub fn value(&self, row: usize, dimension: &str) -> Option<f64> {
        let col = self.dimensions.iter().position(|d| d == dimension)?;
        self.rows.get(row).map(|r| r.values[col])
    }
}

/// Options for a vectorization run.
#[derive(Debug, Clone)]
pub struct VectorizeOptions<'a> {
    pub channel_groups: &'a ChannelGroups,
    pub sampling_rate: usize,
    pub metadata_fields: Vec<String>,
    /// Expected statistic dimensions; the configured total when `None`
    pub expected_dimensions: Option<usize>,
}

impl<'a> VectorizeOptions<'a> {
    pub fn new(channel_groups: &'a ChannelGroups, sampling_rate: usize) -> Self {
        Self {
            channel_groups,
            sampling_rate,
            metadata_fields: DEFAULT_METADATA_FIELDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            expected_dimensions: None,
        }
    }

    pub fn with_metadata_fields(mut self, fields: Vec<String>) -> Self {
        self.metadata_fields = fields;
        self
    }

    pub fn with_expected_dimensions(mut self, expected: usize) -> Self {
        self.expected_dimensions = Some(expected);
        self
    }

    fn expected(&self) -> usize {
        self.expected_dimensions
            .unwrap_or_else(|| self.channel_groups.expected_dimensions())
    }
}

/// Vectorize a recording, expecting every configured channel to be present.
pub fn vectorize(
    recording: &Recording,
    channel_groups: &ChannelGroups,
    sampling_rate: usize,
) -> Result<FeatureTable, VectorizeError> {
    vectorize_with(recording, &VectorizeOptions::new(channel_groups, sampling_rate))
}

/// Vectorize a recording against a caller-supplied dimension expectation.
pub fn vectorize_with_expected(
    recording: &Recording,
    channel_groups: &ChannelGroups,
    sampling_rate: usize,
    expected_dimensions: usize,
) -> Result<FeatureTable, VectorizeError> {
    let options = VectorizeOptions::new(channel_groups, sampling_rate)
        .with_expected_dimensions(expected_dimensions);
    vectorize_with(recording, &options)
}

/// Vectorize a recording with explicit options.
pub fn vectorize_with(
    recording: &Recording,
    options: &VectorizeOptions<'_>,
) -> Result<FeatureTable, VectorizeError> {
    if options.sampling_rate == 0 {
        return Err(VectorizeError::InvalidSamplingRate);
    }

    let metadata_columns = options
        .metadata_fields
        .iter()
        .map(|field| {
            recording
                .column_index(field)
                .ok_or_else(|| VectorizeError::MissingMetadata {
                    field: field.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Presence is decided from the header, once for the whole recording.
    let mut channels = Vec::new();
    let mut series = Vec::new();
    for channel in options.channel_groups.channels() {
        match recording.numeric_column(channel)? {
            Some(values) => {
                channels.push(channel.to_string());
                series.push(values);
            }
            None => tracing::debug!(channel, "configured channel absent from input, skipping"),
        }
    }

    let dimensions: Vec<String> = channels
        .iter()
        .flat_map(|c| Statistic::ALL.into_iter().map(move |s| dimension_name(c, s)))
        .collect();

    let plan = partition(recording.len(), options.sampling_rate);
    tracing::debug!(
        samples = recording.len(),
        windows = plan.len(),
        discarded = plan.discarded,
        channels = channels.len(),
        "window plan"
    );

    let rows = window_vectors(recording, &plan, &series, &metadata_columns);

    let table = FeatureTable {
        channels,
        dimensions,
        metadata_fields: options.metadata_fields.clone(),
        rows,
        discarded_samples: plan.discarded,
    };

    check_dimensions(&table, options.expected())?;
    Ok(table)
}

/// Compute one feature vector per planned window, in window order.
fn window_vectors(
    recording: &Recording,
    plan: &WindowPlan,
    series: &[Vec<f64>],
    metadata_columns: &[usize],
) -> Vec<FeatureVector> {
    plan.windows
        .iter()
        .map(|window| {
            let values = series
                .iter()
                .flat_map(|values| channel_statistics(window.slice(values)).values())
                .collect();

            // First sample only; homogeneity across the window is not checked.
            let metadata = metadata_columns
                .iter()
                .map(|&col| recording.cell(window.start, col).to_string())
                .collect();

            FeatureVector {
                window: *window,
                values,
                metadata,
            }
        })
        .collect()
}

/// Verify the realized distinct dimension count equals the expected total.
pub fn check_dimensions(table: &FeatureTable, expected: usize) -> Result<(), VectorizeError> {
    let actual = table.dimension_count();
    if actual != expected {
        return Err(VectorizeError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
