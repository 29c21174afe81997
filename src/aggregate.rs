//! Aggregation of per-subject recordings into one combined table.
//!
//! Expected layout:
//!
//! ```text
//! <root>/<subject>/<session>/<motion_dir>/<name><file_suffix>
//! ```
//!
//! Each matching file is read, stamped with `subject`, `session` and
//! `source_file`, and unioned into one table. A file that cannot be read is
//! logged and skipped; it never aborts the run.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::AggregationConfig;
use crate::core::Recording;
use crate::error::TableError;
use crate::report::RunReport;
use crate::tsv;

/// Annotation columns appended to every aggregated row.
pub const ANNOTATION_COLUMNS: [&str; 3] = ["subject", "session", "source_file"];

/// Canonical output format for normalized timestamps.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Naive timestamp layouts accepted on input.
const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
];

/// A recording file located under the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub subject: String,
    pub session: String,
    pub path: PathBuf,
}

impl SourceFile {
    /// File name recorded in the `source_file` column.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Result of an aggregation run.
#[derive(Debug)]
pub struct Aggregation {
    /// Combined table; `None` when no recording could be read
    pub table: Option<Recording>,
    pub report: RunReport,
}

impl Aggregation {
    pub fn is_empty(&self) -> bool {
        self.table.is_none()
    }
}

/// Aggregates recordings found under a root directory.
pub struct Aggregator<'a> {
    config: &'a AggregationConfig,
}

impl<'a> Aggregator<'a> {
    pub fn new(config: &'a AggregationConfig) -> Self {
        Self { config }
    }

    /// Locate every recording file, in sorted subject, session, file order.
    ///
    /// Fails only if the root itself cannot be listed.
    pub fn discover(&self, root: &Path) -> Result<Vec<SourceFile>, TableError> {
        let subjects = sorted_entries(root)?.into_iter().filter(|p| p.is_dir());

        let mut files = Vec::new();
        for subject_path in subjects {
            let subject = file_name_of(&subject_path);

            for session in &self.config.sessions {
                let motion_path = subject_path.join(session).join(&self.config.motion_dir);
                if !motion_path.is_dir() {
                    continue;
                }

                let entries = match sorted_entries(&motion_path) {
                    Ok(entries) => entries,
                    Err(e) => {
                        tracing::warn!(path = ?motion_path, error = %e, "cannot list session folder");
                        continue;
                    }
                };

                for path in entries {
                    if path.is_file() && file_name_of(&path).ends_with(&self.config.file_suffix) {
                        tracing::debug!(?path, "found recording");
                        files.push(SourceFile {
                            subject: subject.clone(),
                            session: session.clone(),
                            path,
                        });
                    }
                }
            }
        }

        Ok(files)
    }

    /// Read, annotate and union every recording under `root`.
    pub fn run(&self, root: &Path) -> Result<Aggregation, TableError> {
        let mut report = RunReport::new();
        let sources = self.discover(root)?;

        let mut tables = Vec::new();
        for source in sources {
            report.record_file_found();
            match tsv::read_recording(&source.path) {
                Ok(recording) => {
                    report.record_file_read(recording.len());
                    tables.push((source, recording));
                }
                Err(e) => {
                    tracing::warn!(path = ?source.path, error = %e, "skipping unreadable recording");
                    report.record_skip(&source.path, &e);
                }
            }
        }

        if tables.is_empty() {
            tracing::warn!(?root, "no recordings found");
            return Ok(Aggregation {
                table: None,
                report,
            });
        }

        let table = self.combine(&tables);
        tracing::info!(
            files = report.files_read,
            skipped = report.files_skipped(),
            rows = table.len(),
            "aggregation complete"
        );

        Ok(Aggregation {
            table: Some(table),
            report,
        })
    }

    /// Union annotated tables: data columns in first-seen order, then the
    /// annotation columns. Cells a file lacks are left empty.
    fn combine(&self, tables: &[(SourceFile, Recording)]) -> Recording {
        let mut columns: Vec<String> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for (_, recording) in tables {
            for column in recording.columns() {
                if ANNOTATION_COLUMNS.contains(&column.as_str()) || positions.contains_key(column)
                {
                    continue;
                }
                positions.insert(column.clone(), columns.len());
                columns.push(column.clone());
            }
        }

        let data_width = columns.len();
        let timestamp_col = self
            .config
            .timestamp_column
            .as_deref()
            .and_then(|name| positions.get(name).copied());
        columns.extend(ANNOTATION_COLUMNS.iter().map(|c| c.to_string()));

        let mut combined = Recording::new(columns);
        for (source, recording) in tables {
            let mapping: Vec<Option<usize>> = recording
                .columns()
                .iter()
                .map(|c| positions.get(c).copied())
                .collect();
            let source_file = source.file_name();

            for row in recording.rows() {
                let mut out = vec![String::new(); data_width];
                for (cell, target) in row.iter().zip(&mapping) {
                    if let Some(idx) = target {
                        out[*idx] = cell.clone();
                    }
                }
                if let Some(idx) = timestamp_col {
                    out[idx] = normalize_timestamp(&out[idx]).unwrap_or_default();
                }
                out.push(source.subject.clone());
                out.push(source.session.clone());
                out.push(source_file.clone());
                combined.push_row(out);
            }
        }

        combined
    }
}

/// Normalize a timestamp to `YYYY-MM-DD HH:MM:SS.ffffff`.
///
/// Offsets are converted to UTC. Returns `None` for values that do not parse.
pub fn normalize_timestamp(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let parsed = DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z"))
        .map(|dt| dt.naive_utc())
        .ok()
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    Some(parsed.format(TIMESTAMP_FORMAT).to_string())
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, TableError> {
    let mut entries = std::fs::read_dir(dir)
        .map_err(|e| TableError::io(dir, e))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect::<Vec<_>>();
    entries.sort();
    Ok(entries)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
