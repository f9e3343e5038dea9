/*!
 * Tests for the CSV report writer
 */

use filmfluency::report::{REPORT_HEADER, ReportRow, csv_field, write_report};
use filmfluency::selector::ScoredEntry;

use crate::common::entry;

fn row(seq_num: usize, text: &str, score: f64, asset: &str) -> ReportRow {
    ReportRow {
        scored: ScoredEntry {
            entry: entry(seq_num, 10, 15, text),
            score,
        },
        asset_path: asset.to_string(),
    }
}

/// An empty selection produces a header-only report
#[test]
fn test_write_report_withNoRows_shouldWriteHeaderOnly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("subtitles_important.csv");

    write_report(&path, &[]).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.trim_end(), REPORT_HEADER);
}

#[test]
fn test_write_report_withRows_shouldWriteOneLinePerEntry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("subtitles_important.csv");

    let rows = vec![
        row(1, "First line.", -12.5, "clips_local/clip_0001.mp4"),
        row(2, "Second line.", 10.0, "clips_local/clip_0002.mp4"),
    ];
    write_report(&path, &rows).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], REPORT_HEADER);
    assert_eq!(
        lines[1],
        "1,\"00:00:10,000\",\"00:00:15,000\",First line.,-12.5,clips_local/clip_0001.mp4"
    );
    assert!(lines[2].starts_with("2,"));
}

/// A rerun overwrites the previous report instead of appending
#[test]
fn test_write_report_withExistingFile_shouldOverwriteNotAppend() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("subtitles_important.csv");

    write_report(&path, &[row(1, "Old row.", 1.0, "a.mp4")]).unwrap();
    write_report(&path, &[]).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 1);
    assert!(!content.contains("Old row."));
}

/// Text containing commas, quotes or newlines is quoted RFC-4180 style
#[test]
fn test_csv_field_withSpecialCharacters_shouldQuote() {
    assert_eq!(csv_field("plain text"), "plain text");
    assert_eq!(csv_field("well, yes"), "\"well, yes\"");
    assert_eq!(csv_field("she said \"no\""), "\"she said \"\"no\"\"\"");
    assert_eq!(csv_field("two\nlines"), "\"two\nlines\"");
}

#[test]
fn test_write_report_withCommaInText_shouldStayOneLogicalRow() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("subtitles_important.csv");

    write_report(&path, &[row(1, "Well, maybe, later.", 20.0, "a.mp4")]).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("\"Well, maybe, later.\""));
}
