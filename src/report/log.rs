//! Per-run processing statistics.
//!
//! Records what a run read, skipped and produced, renders a summary for the
//! console, and persists the same figures as JSON next to the outputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::core::FeatureTable;

/// The name of this producer.
pub const PRODUCER_NAME: &str = "motion-vectorizer";

/// A source file left out of an aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Statistics for one aggregation or vectorization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique run identifier
    pub run_id: Uuid,
    pub producer: String,
    pub version: String,
    pub started_at: DateTime<Utc>,
    /// Recording files matched during discovery
    pub files_found: u64,
    /// Recording files read successfully
    pub files_read: u64,
    /// Data rows read across all inputs
    pub rows_read: u64,
    /// Files skipped and why
    pub skipped: Vec<SkippedFile>,
    /// Feature vectors produced
    pub windows_emitted: u64,
    /// Trailing samples that did not fill a window
    pub samples_discarded: u64,
    /// Statistic dimensions per feature vector
    pub dimensions: u64,
}

impl RunReport {
    /// Start a new report.
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            producer: PRODUCER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: Utc::now(),
            files_found: 0,
            files_read: 0,
            rows_read: 0,
            skipped: Vec::new(),
            windows_emitted: 0,
            samples_discarded: 0,
            dimensions: 0,
        }
    }

    /// Record a discovered recording file.
    pub fn record_file_found(&mut self) {
        self.files_found += 1;
    }

    /// Record a file read successfully with its row count.
    pub fn record_file_read(&mut self, rows: usize) {
        self.files_read += 1;
        self.rows_read += rows as u64;
    }

    /// Record a file that could not be read.
    pub fn record_skip(&mut self, path: impl Into<PathBuf>, reason: impl ToString) {
        self.skipped.push(SkippedFile {
            path: path.into(),
            reason: reason.to_string(),
        });
    }

    /// Record the outcome of a vectorization.
    pub fn record_features(&mut self, table: &FeatureTable) {
        self.windows_emitted += table.len() as u64;
        self.samples_discarded += table.discarded_samples as u64;
        self.dimensions = table.dimension_count() as u64;
    }

    pub fn files_skipped(&self) -> usize {
        self.skipped.len()
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Run Statistics ({}):\n\
             - Files found: {}\n\
             - Files read: {}\n\
             - Files skipped: {}\n\
             - Rows read: {}\n\
             - Feature vectors: {}\n\
             - Samples discarded: {}\n\
             - Dimensions per vector: {}",
            self.run_id,
            self.files_found,
            self.files_read,
            self.files_skipped(),
            self.rows_read,
            self.windows_emitted,
            self.samples_discarded,
            self.dimensions
        );
        for skip in &self.skipped {
            out.push_str(&format!("\n  skipped {:?}: {}", skip.path, skip.reason));
        }
        out
    }

    /// Save the report as JSON.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let persisted = PersistedReport {
            report: self,
            finished_at: Utc::now(),
        };

        let json = serde_json::to_string_pretty(&persisted).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Report format for persistence.
#[derive(Serialize)]
struct PersistedReport<'a> {
    #[serde(flatten)]
    report: &'a RunReport,
    finished_at: DateTime<Utc>,
}
