//! Partitioning of a sample stream into fixed-size windows.
//!
//! Windows are contiguous, non-overlapping runs of exactly `sampling_rate`
//! samples taken from index 0 with stride `sampling_rate`. A trailing run
//! shorter than that is discarded, never padded or merged.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// One complete window over a recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleWindow {
    /// Position of the window in the output (0-based)
    pub index: usize,
    /// First sample of the window
    pub start: usize,
    /// Number of samples in the window
    pub len: usize,
}

impl SampleWindow {
    /// One past the last sample of the window.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Sample indices covered by this window.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Slice of a per-sample series restricted to this window.
    pub fn slice<'a, T>(&self, series: &'a [T]) -> &'a [T] {
        &series[self.range()]
    }
}

/// The windows produced for one recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPlan {
    pub windows: Vec<SampleWindow>,
    /// Samples in the trailing partial window
    pub discarded: usize,
}

impl WindowPlan {
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

/// Partition `sample_count` samples into complete windows of `sampling_rate`.
///
/// `sampling_rate` must be positive.
pub fn partition(sample_count: usize, sampling_rate: usize) -> WindowPlan {
    debug_assert!(sampling_rate > 0);

    let complete = sample_count / sampling_rate;
    let windows = (0..complete)
        .map(|index| SampleWindow {
            index,
            start: index * sampling_rate,
            len: sampling_rate,
        })
        .collect();

    WindowPlan {
        windows,
        discarded: sample_count % sampling_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_multiple() {
        let plan = partition(180, 90);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.discarded, 0);
        assert_eq!(plan.windows[0].range(), 0..90);
        assert_eq!(plan.windows[1].range(), 90..180);
    }

    #[test]
    fn test_trailing_partial_discarded() {
        let plan = partition(95, 90);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.discarded, 5);
    }

    #[test]
    fn test_short_input_yields_nothing() {
        let plan = partition(89, 90);
        assert!(plan.is_empty());
        assert_eq!(plan.discarded, 89);

        assert!(partition(0, 90).is_empty());
    }

    #[test]
    fn test_windows_are_contiguous() {
        let plan = partition(10 * 7 + 3, 7);
        assert_eq!(plan.len(), 10);
        for pair in plan.windows.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start);
            assert_eq!(pair[0].index + 1, pair[1].index);
        }
    }

    #[test]
    fn test_slice() {
        let series: Vec<usize> = (0..10).collect();
        let window = SampleWindow {
            index: 1,
            start: 4,
            len: 4,
        };
        assert_eq!(window.slice(&series), &[4, 5, 6, 7]);
    }
}
