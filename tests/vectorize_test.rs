//! Integration tests for windowed feature extraction

use motion_vectorizer::config::ChannelGroups;
use motion_vectorizer::core::{vectorize, vectorize_with_expected, Recording, Statistic};
use motion_vectorizer::{tsv, VectorizeError};
use std::path::PathBuf;

const RATE: usize = 90;

fn test_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("motion-vectorizer-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("Failed to create temp dir");
    dir
}

/// Deterministic pseudo-random values in [-1, 1).
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 11) as f64 / (1u64 << 53) as f64) * 2.0 - 1.0
    }
}

/// Build a recording with the given channels and `samples` rows. The user
/// field encodes the sample index so window order can be checked.
fn recording(channels: &[String], samples: usize) -> Recording {
    let mut columns: Vec<String> = vec!["timestamp".to_string()];
    columns.extend(channels.iter().cloned());
    columns.extend(["user", "subject", "session", "build"].map(String::from));

    let mut rng = Lcg(42);
    let rows = (0..samples)
        .map(|i| {
            let mut row = vec![format!("2023-05-01 10:00:{:02}", i / RATE % 60)];
            row.extend(channels.iter().map(|_| format!("{:.6}", rng.next())));
            row.extend([
                format!("user-{i}"),
                "sub-01".to_string(),
                "ses-A".to_string(),
                "build-3".to_string(),
            ]);
            row
        })
        .collect();

    Recording::from_rows(columns, rows)
}

fn all_channels() -> Vec<String> {
    ChannelGroups::default().channels().map(String::from).collect()
}

#[test]
fn test_exact_windows_in_order() {
    for k in 0..4 {
        let rec = recording(&all_channels(), k * RATE);
        let table = vectorize(&rec, &ChannelGroups::default(), RATE).unwrap();

        assert_eq!(table.len(), k);
        for (i, row) in table.rows.iter().enumerate() {
            assert_eq!(row.window.index, i);
            assert_eq!(row.metadata[0], format!("user-{}", i * RATE));
        }
    }
}

#[test]
fn test_trailing_partial_window_discarded() {
    for (k, r) in [(0, 1), (1, 5), (2, 89), (3, 45)] {
        let rec = recording(&all_channels(), k * RATE + r);
        let table = vectorize(&rec, &ChannelGroups::default(), RATE).unwrap();

        assert_eq!(table.len(), k);
        assert_eq!(table.discarded_samples, r);
    }
}

#[test]
fn test_statistic_ordering() {
    let rec = recording(&all_channels(), 5 * RATE);
    let table = vectorize(&rec, &ChannelGroups::default(), RATE).unwrap();

    for row in 0..table.len() {
        for channel in &table.channels {
            let get = |s: Statistic| {
                table
                    .value(row, &format!("{channel}_{}", s.name()))
                    .unwrap()
            };
            let (max, min, median, mean, std) = (
                get(Statistic::Max),
                get(Statistic::Min),
                get(Statistic::Median),
                get(Statistic::Mean),
                get(Statistic::Std),
            );

            assert!(min <= median && median <= max);
            assert!(min <= mean && mean <= max);
            assert!(std >= 0.0);
        }
    }
}

#[test]
fn test_full_configuration_yields_90_dimensions() {
    let rec = recording(&all_channels(), 180);
    let table = vectorize(&rec, &ChannelGroups::default(), RATE).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.dimension_count(), 90);
    assert_eq!(table.header().len(), 94);
    for row in &table.rows {
        assert_eq!(row.values.len(), 90);
        assert_eq!(row.metadata.len(), 4);
    }
}

#[test]
fn test_95_samples_yield_one_row() {
    let rec = recording(&all_channels(), 95);
    let table = vectorize(&rec, &ChannelGroups::default(), RATE).unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(table.discarded_samples, 5);
}

#[test]
fn test_absent_group_requires_matching_expectation() {
    let channels: Vec<String> = all_channels()
        .into_iter()
        .filter(|c| !c.starts_with("right_hand"))
        .collect();
    let rec = recording(&channels, 180);
    let groups = ChannelGroups::default();

    let table = vectorize_with_expected(&rec, &groups, RATE, 72).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.dimension_count(), 72);
    assert_eq!(table.channels.len(), 12);

    match vectorize_with_expected(&rec, &groups, RATE, 90) {
        Err(VectorizeError::DimensionMismatch { expected, actual }) => {
            assert_eq!(expected, 90);
            assert_eq!(actual, 72);
        }
        other => panic!("expected a dimension mismatch, got {other:?}"),
    }
}

#[test]
fn test_missing_cells_propagate_nan() {
    let channels = all_channels();
    let (columns, mut rows) = recording(&channels, RATE).into_parts();
    let col = columns.iter().position(|c| c == "head_pos_x").unwrap();
    for row in rows.iter_mut() {
        row[col] = String::new();
    }
    rows[10][col] = "0.5".to_string();
    let rec = Recording::from_rows(columns, rows);

    let table = vectorize(&rec, &ChannelGroups::default(), RATE).unwrap();
    assert_eq!(table.value(0, "head_pos_x_mean"), Some(0.5));
    assert!(table.value(0, "head_pos_x_std").unwrap().is_nan());
}

#[test]
fn test_file_round_trip_is_byte_identical() {
    let dir = test_dir();
    let input = dir.join("raw.tsv");
    tsv::write_recording(&input, &recording(&all_channels(), 2 * RATE + 7)).unwrap();

    let run = |name: &str| {
        let rec = tsv::read_recording(&input).unwrap();
        let table = vectorize(&rec, &ChannelGroups::default(), RATE).unwrap();
        let out = dir.join(name);
        tsv::write_feature_table(&out, &table).unwrap();
        std::fs::read(out).unwrap()
    };

    let first = run("first.tsv");
    let second = run("second.tsv");
    assert_eq!(first, second);

    let text = String::from_utf8(first).unwrap();
    let mut lines = text.lines();
    let header: Vec<&str> = lines.next().unwrap().split('\t').collect();
    assert_eq!(header.len(), 94);
    assert_eq!(header[0], "head_pos_x_max");
    assert_eq!(&header[90..], ["user", "subject", "session", "build"]);
    assert_eq!(lines.count(), 2);

    let _ = std::fs::remove_dir_all(dir);
}
