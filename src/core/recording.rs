//! In-memory sample table.
//!
//! A recording is an ordered header plus ordered rows of raw cells. Rows are
//! kept in arrival order; no timestamp is needed beyond that ordering.

use crate::error::VectorizeError;

/// Ordered rows of raw samples keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recording {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Recording {
    /// Create an empty recording with the given header.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Create a recording from a header and rows.
    ///
    /// Short rows are padded with empty cells and long rows truncated so that
    /// every row matches the header width.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut recording = Self::new(columns);
        for row in rows {
            recording.push_row(row);
        }
        recording
    }

    /// Append a row, fitting it to the header width.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column in the header.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Raw cell at a row and column index.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows[row][column].as_str()
    }

    /// Parse a column into numbers. Missing cells become NaN.
    pub fn numeric_column(&self, name: &str) -> Result<Option<Vec<f64>>, VectorizeError> {
        let Some(index) = self.column_index(name) else {
            return Ok(None);
        };

        self.rows
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                parse_cell(&row[index]).ok_or_else(|| VectorizeError::InvalidValue {
                    row: row_idx + 1,
                    column: name.to_string(),
                    value: row[index].clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// Consume the recording into header and rows.
    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<String>>) {
        (self.columns, self.rows)
    }
}

/// Parse one numeric cell. Empty and `NaN` spellings are missing values.
fn parse_cell(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") || trimmed == "NA" {
        return Some(f64::NAN);
    }
    trimmed.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_push_row_fits_header() {
        let mut rec = Recording::new(columns(&["a", "b", "c"]));
        rec.push_row(vec!["1".into()]);
        rec.push_row(vec!["1".into(), "2".into(), "3".into(), "4".into()]);

        assert_eq!(rec.len(), 2);
        assert_eq!(rec.rows()[0], vec!["1", "", ""]);
        assert_eq!(rec.rows()[1], vec!["1", "2", "3"]);
    }

    #[test]
    fn test_numeric_column_missing_values() {
        let rec = Recording::from_rows(
            columns(&["x"]),
            vec![vec!["1.5".into()], vec!["".into()], vec!["NaN".into()]],
        );

        let values = rec.numeric_column("x").unwrap().unwrap();
        assert_eq!(values[0], 1.5);
        assert!(values[1].is_nan());
        assert!(values[2].is_nan());
    }

    #[test]
    fn test_numeric_column_absent() {
        let rec = Recording::new(columns(&["x"]));
        assert!(rec.numeric_column("y").unwrap().is_none());
    }

    #[test]
    fn test_numeric_column_invalid_value() {
        let rec = Recording::from_rows(
            columns(&["x"]),
            vec![vec!["1".into()], vec!["oops".into()]],
        );

        match rec.numeric_column("x") {
            Err(VectorizeError::InvalidValue { row, column, value }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "x");
                assert_eq!(value, "oops");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
