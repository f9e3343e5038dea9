use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::selector::ScoredEntry;

// @module: CSV report of the selected entries

/// Fixed column header of the report file.
pub const REPORT_HEADER: &str = "index,start_time,end_time,text,complexity_score,asset_path";

/// One report row: a selected entry plus the path of its extracted clip.
#[derive(Debug, Clone)]
pub struct ReportRow {
    /// Scored entry that was extracted
    pub scored: ScoredEntry,
    /// Path of the produced video asset
    pub asset_path: String,
}

/// Write the report, one row per successfully extracted entry.
///
/// The file is truncated first, never appended: a rerun fully replaces the
/// prior report. With an empty row set the file contains only the header.
pub fn write_report<P: AsRef<Path>>(path: P, rows: &[ReportRow]) -> Result<()> {
    let path = path.as_ref();

    let mut file = File::create(path)
        .with_context(|| format!("Failed to create report file: {}", path.display()))?;

    writeln!(file, "{}", REPORT_HEADER)?;

    for row in rows {
        let entry = &row.scored.entry;
        writeln!(
            file,
            "{},{},{},{},{},{}",
            entry.seq_num,
            // SRT timestamps carry a comma, so they are always quoted
            csv_field(&entry.format_start_time()),
            csv_field(&entry.format_end_time()),
            csv_field(&entry.text),
            row.scored.score,
            csv_field(&row.asset_path),
        )?;
    }

    info!("Saved report with {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Quote a CSV field when it contains a comma, quote, or newline
/// (RFC 4180 style: embedded quotes are doubled).
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
