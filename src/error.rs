//! Error types for vectorization and table I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a recording into feature vectors.
///
/// All variants are fatal for the run: the output contract cannot be met.
#[derive(Error, Debug)]
pub enum VectorizeError {
    /// Realized statistic dimensions disagree with the expected total
    /// (schema drift between the channel configuration and the data).
    #[error(
        "Dimension mismatch: expected {expected} statistic dimensions, got {actual} \
         (channel configuration and input columns have drifted)"
    )]
    DimensionMismatch { expected: usize, actual: usize },

    /// A configured metadata column is absent from the input.
    #[error("Missing metadata column '{field}'")]
    MissingMetadata { field: String },

    /// A channel cell is neither empty nor numeric.
    #[error("Invalid value {value:?} in column '{column}' at data row {row}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    /// Windows must hold at least one sample.
    #[error("Sampling rate must be positive")]
    InvalidSamplingRate,
}

/// Errors raised while reading or writing tab-separated tables.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed table {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Table {path:?} has no header row")]
    Empty { path: PathBuf },
}

impl TableError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_names_both_counts() {
        let err = VectorizeError::DimensionMismatch {
            expected: 90,
            actual: 72,
        };
        let msg = err.to_string();
        assert!(msg.contains("90"));
        assert!(msg.contains("72"));
    }

    #[test]
    fn test_invalid_value_names_location() {
        let err = VectorizeError::InvalidValue {
            row: 12,
            column: "head_pos_x".to_string(),
            value: "abc".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("head_pos_x"));
        assert!(msg.contains("12"));
    }
}
