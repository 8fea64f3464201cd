//! Scan loop over a capture log
//!
//! Drives every line of a reader through a [`SeriesBuilder`], applying the
//! skip-and-continue policy: one bad row does not lose an otherwise-valid
//! data file. Rejected rows are logged with their row number and counted so
//! the run summary can report them.

use std::io::{self, BufRead};

use tracing::warn;

use crate::series::{Disposition, RowError, SeriesBuilder};

/// Tally of one scan over a capture log.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// Total lines read from the input.
    pub lines_read: u64,
    /// Data rows accepted and appended to every series.
    pub rows_accepted: u64,
    /// Lines that failed the prefix filter and were ignored.
    pub rows_skipped: u64,
    /// Data rows rejected for supplying too few fields.
    pub malformed_rows: u64,
    /// Data rows rejected for an unparseable field.
    pub parse_errors: u64,
    /// First rejection encountered: row number and message.
    pub first_error: Option<(u64, String)>,
}

impl ScanReport {
    /// True when no data row was rejected.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.malformed_rows == 0 && self.parse_errors == 0
    }
}

/// Scan a reader to completion.
///
/// # Errors
///
/// Returns an error only when reading from the underlying source fails;
/// per-row problems are tallied in the report instead.
pub fn scan<R: BufRead>(reader: R, builder: &mut SeriesBuilder) -> io::Result<ScanReport> {
    let mut report = ScanReport::default();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let row = idx as u64 + 1;
        report.lines_read += 1;
        match builder.ingest(&line) {
            Ok(Disposition::Accepted) => report.rows_accepted += 1,
            Ok(Disposition::Skipped) => report.rows_skipped += 1,
            Err(error) => {
                match error {
                    RowError::Malformed { .. } => report.malformed_rows += 1,
                    RowError::FieldParse { .. } => report.parse_errors += 1,
                }
                warn!("row {row}: {error}");
                if report.first_error.is_none() {
                    report.first_error = Some((row, error.to_string()));
                }
            }
        }
    }
    Ok(report)
}
