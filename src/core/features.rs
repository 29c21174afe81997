//! Summary statistics computed per channel per window.
//!
//! Missing samples (NaN) are skipped by every statistic. A statistic that is
//! undefined for what remains (no values at all, or a standard deviation over
//! a single value) is NaN and is propagated as-is.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Number of statistics computed for each channel.
pub const STATISTICS_PER_CHANNEL: usize = 5;

/// One summary statistic over a channel's values in a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    Max,
    Min,
    Median,
    Mean,
    /// Sample standard deviation (N-1 denominator)
    Std,
}

impl Statistic {
    /// All statistics in output order.
    pub const ALL: [Statistic; STATISTICS_PER_CHANNEL] = [
        Statistic::Max,
        Statistic::Min,
        Statistic::Median,
        Statistic::Mean,
        Statistic::Std,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Statistic::Max => "max",
            Statistic::Min => "min",
            Statistic::Median => "median",
            Statistic::Mean => "mean",
            Statistic::Std => "std",
        }
    }
}

impl std::fmt::Display for Statistic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Output dimension name for a channel statistic.
pub fn dimension_name(channel: &str, statistic: Statistic) -> String {
    format!("{channel}_{}", statistic.name())
}

/// The five statistics of one channel within one window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelStatistics {
    pub max: f64,
    pub min: f64,
    pub median: f64,
    pub mean: f64,
    pub std: f64,
}

impl ChannelStatistics {
    pub fn get(&self, statistic: Statistic) -> f64 {
        match statistic {
            Statistic::Max => self.max,
            Statistic::Min => self.min,
            Statistic::Median => self.median,
            Statistic::Mean => self.mean,
            Statistic::Std => self.std,
        }
    }

    /// Values in [`Statistic::ALL`] order.
    pub fn values(&self) -> [f64; STATISTICS_PER_CHANNEL] {
        Statistic::ALL.map(|s| self.get(s))
    }
}

/// Compute all statistics over a channel's values in one window.
pub fn channel_statistics(values: &[f64]) -> ChannelStatistics {
    let present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();

    ChannelStatistics {
        max: Statistics::max(&present),
        min: Statistics::min(&present),
        median: median(&present),
        mean: Statistics::mean(&present),
        std: Statistics::std_dev(&present),
    }
}

/// Median of non-NaN values; the mean of the middle pair for even counts.
fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
