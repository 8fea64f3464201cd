//! Stacked series aggregation
//!
//! The series builder consumes rows in file order and grows one named series
//! per layout field. Within a row each of the three stacking groups --
//! connection outcomes, HTTP outcomes, latency buckets -- keeps a running
//! cumulative total, reset to zero at the start of every row: a stored value
//! is the field's own count plus the counts of all earlier fields in the
//! same group. Layer boundaries of a filled area chart fall out directly.
//!
//! A row either commits in full or not at all. Values are staged while the
//! row parses and appended only once every field has been accepted, so a
//! rejected row can never leave the series at unequal lengths.

use chrono::{Local, TimeZone, Timelike};
use rustc_hash::FxHashMap;

use crate::layout::{FieldKind, RowLayout, TIME_FIELD};
use crate::line;

/// Per-row errors produced by [`SeriesBuilder`]
///
/// Both variants are scoped to the offending row: the caller skips the row,
/// reports it and continues.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// The row passed the prefix filter but supplies fewer fields than the
    /// layout requires.
    #[error("row supplies {actual} fields, layout requires {required}")]
    Malformed {
        /// Fields the layout requires.
        required: usize,
        /// Fields the row actually supplied.
        actual: usize,
    },
    /// A field did not parse as the expected integer or timestamp.
    #[error("field `{field}` does not parse: {value:?}")]
    FieldParse {
        /// Name of the offending field.
        field: String,
        /// The raw value as found in the row.
        value: String,
    },
}

/// What became of one ingested line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The line was a data row and its values were appended.
    Accepted,
    /// The line did not look like a data row and was ignored.
    Skipped,
}

/// The completed named series for one run.
///
/// One element per accepted row, insertion order = file order = x-axis
/// order. Read-only once parsing completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesSet {
    times: Vec<String>,
    names: Vec<String>,
    columns: Vec<Vec<u64>>,
    index: FxHashMap<String, usize>,
}

impl SeriesSet {
    fn new(layout: &RowLayout) -> Self {
        let names: Vec<String> = layout
            .fields()
            .iter()
            .skip(1)
            .map(|f| f.name.clone())
            .collect();
        let index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        let columns = vec![Vec::new(); names.len()];
        Self {
            times: Vec::new(),
            names,
            columns,
            index,
        }
    }

    /// The time-of-day series, the x axis of every chart.
    #[must_use]
    pub fn times(&self) -> &[String] {
        &self.times
    }

    /// The series for `name`, or `None` if the layout never defined it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[u64]> {
        self.index.get(name).map(|i| self.columns[*i].as_slice())
    }

    /// The value series names in layout order, time excluded.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of accepted rows. Every series has exactly this many entries.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.times.len()
    }
}

/// Builds a [`SeriesSet`] from raw log lines.
#[derive(Debug)]
pub struct SeriesBuilder {
    layout: RowLayout,
    set: SeriesSet,
}

impl SeriesBuilder {
    /// Create a builder over a resolved row layout.
    #[must_use]
    pub fn new(layout: RowLayout) -> Self {
        let set = SeriesSet::new(&layout);
        Self { layout, set }
    }

    /// Ingest one raw line.
    ///
    /// Lines that fail the prefix filter are skipped silently. Data rows are
    /// parsed, stacked within their groups and appended to every series.
    ///
    /// # Errors
    ///
    /// Returns [`RowError::Malformed`] when the row supplies too few fields
    /// and [`RowError::FieldParse`] when a field is not the expected integer
    /// or timestamp. In both cases nothing is appended.
    pub fn ingest(&mut self, raw: &str) -> Result<Disposition, RowError> {
        if !line::is_data_line(raw) {
            return Ok(Disposition::Skipped);
        }

        let parts = line::tokenize(raw);
        let required = self.layout.field_count();
        if parts.len() < required {
            return Err(RowError::Malformed {
                required,
                actual: parts.len(),
            });
        }

        // First field is the timestamp by layout construction.
        let raw_time = parts[0].trim();
        let seconds: i64 = raw_time.parse().map_err(|_| RowError::FieldParse {
            field: TIME_FIELD.to_string(),
            value: raw_time.to_string(),
        })?;
        let time_entry = time_of_day(seconds).ok_or_else(|| RowError::FieldParse {
            field: TIME_FIELD.to_string(),
            value: raw_time.to_string(),
        })?;

        let mut staged = Vec::with_capacity(required - 1);
        let mut conn_total: u64 = 0;
        let mut http_total: u64 = 0;
        let mut bucket_total: u64 = 0;
        for (field, raw_value) in self.layout.fields()[1..].iter().zip(&parts[1..]) {
            let raw_value = raw_value.trim();
            let value: u64 = raw_value.parse().map_err(|_| RowError::FieldParse {
                field: field.name.clone(),
                value: raw_value.to_string(),
            })?;
            let stacked = match field.kind {
                FieldKind::Connection => {
                    conn_total = conn_total.saturating_add(value);
                    conn_total
                }
                FieldKind::Http => {
                    http_total = http_total.saturating_add(value);
                    http_total
                }
                FieldKind::Bucket => {
                    bucket_total = bucket_total.saturating_add(value);
                    bucket_total
                }
                // Layout places the time field first only.
                FieldKind::Time => value,
            };
            staged.push(stacked);
        }

        // Commit: the row is now known good in full.
        self.set.times.push(time_entry);
        for (column, value) in self.set.columns.iter_mut().zip(staged) {
            column.push(value);
        }
        Ok(Disposition::Accepted)
    }

    /// Hand over the completed set.
    #[must_use]
    pub fn finish(self) -> SeriesSet {
        self.set
    }
}

/// Local time of day for a Unix timestamp, unpadded `H:M:S`.
///
/// Matches the upstream hour/minute/second concatenation; `None` for
/// timestamps outside the representable range.
#[must_use]
pub fn time_of_day(unix_seconds: i64) -> Option<String> {
    let t = Local.timestamp_opt(unix_seconds, 0).single()?;
    Some(format!("{}:{}:{}", t.hour(), t.minute(), t.second()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::BucketSchema;
    use proptest::prelude::*;

    fn builder() -> SeriesBuilder {
        SeriesBuilder::new(RowLayout::new(&BucketSchema::default()))
    }

    #[test]
    fn worked_example_row_stacks_per_group() {
        let mut b = builder();
        let disposition = b
            .ingest("1234567890\t3\t1\t0\t2\t10\t1\t5\t2\t1\t1")
            .expect("row is valid");
        assert_eq!(disposition, Disposition::Accepted);

        let set = b.finish();
        assert_eq!(set.row_count(), 1);
        assert_eq!(set.get("conn_success"), Some(&[3_u64][..]));
        assert_eq!(set.get("conn_error"), Some(&[4_u64][..]));
        assert_eq!(set.get("conn_timeout"), Some(&[4_u64][..]));
        assert_eq!(set.get("conn_close"), Some(&[6_u64][..]));
        assert_eq!(set.get("http_success"), Some(&[10_u64][..]));
        assert_eq!(set.get("http_error"), Some(&[11_u64][..]));
        assert_eq!(set.get("under_1"), Some(&[5_u64][..]));
        assert_eq!(set.get("under_10"), Some(&[7_u64][..]));
        assert_eq!(set.get("under_100"), Some(&[8_u64][..]));
        assert_eq!(set.get("over_100"), Some(&[9_u64][..]));

        // Deterministic function of the timestamp alone.
        let expected = time_of_day(1_234_567_890).expect("in range");
        assert_eq!(set.times(), [expected]);
    }

    #[test]
    fn non_data_line_appends_nothing() {
        let mut b = builder();
        assert_eq!(
            b.ingest("not_a_timestamp\tfoo"),
            Ok(Disposition::Skipped)
        );
        let set = b.finish();
        assert_eq!(set.row_count(), 0);
        for name in set.names() {
            assert_eq!(set.get(name).map(<[u64]>::len), Some(0));
        }
    }

    #[test]
    fn short_row_is_malformed_and_leaves_no_trace() {
        let mut b = builder();
        let err = b.ingest("1234567890\t1\t2\t3\t4").expect_err("too short");
        assert_eq!(
            err,
            RowError::Malformed {
                required: 11,
                actual: 5
            }
        );
        let set = b.finish();
        assert_eq!(set.row_count(), 0);
    }

    #[test]
    fn parse_failure_mid_row_commits_nothing() {
        let mut b = builder();
        // conn_timeout is junk; earlier fields must not have been appended.
        let err = b
            .ingest("1234567890\t3\t1\tjunk\t2\t10\t1\t5\t2\t1\t1")
            .expect_err("junk field");
        assert_eq!(
            err,
            RowError::FieldParse {
                field: "conn_timeout".to_string(),
                value: "junk".to_string()
            }
        );
        let set = b.finish();
        assert_eq!(set.row_count(), 0);
        assert_eq!(set.get("conn_success"), Some(&[][..]));
    }

    #[test]
    fn skipped_and_rejected_rows_do_not_disturb_neighbors() {
        let mut b = builder();
        b.ingest("1234567890\t1\t1\t1\t1\t1\t1\t1\t1\t1\t1")
            .expect("valid row");
        assert_eq!(b.ingest("bogus line"), Ok(Disposition::Skipped));
        let _ = b
            .ingest("1234567891\t1\t2")
            .expect_err("malformed row");
        b.ingest("1234567892\t1\t1\t1\t1\t1\t1\t1\t1\t1\t1")
            .expect("valid row");

        let set = b.finish();
        assert_eq!(set.row_count(), 2);
        // Stacking totals reset per row: identical inputs, identical stacks.
        assert_eq!(set.get("conn_close"), Some(&[4_u64, 4][..]));
        assert_eq!(set.get("over_100"), Some(&[4_u64, 4][..]));
    }

    #[test]
    fn extra_trailing_fields_are_ignored() {
        let mut b = builder();
        b.ingest("1234567890\t3\t1\t0\t2\t10\t1\t5\t2\t1\t1\t99\t98")
            .expect("extra fields tolerated");
        let set = b.finish();
        assert_eq!(set.row_count(), 1);
        assert_eq!(set.get("over_100"), Some(&[9_u64][..]));
    }

    #[test]
    fn time_of_day_is_unpadded() {
        if let Some(entry) = time_of_day(1_234_567_890) {
            let parts: Vec<&str> = entry.split(':').collect();
            assert_eq!(parts.len(), 3);
            for part in parts {
                assert!(!part.is_empty());
                assert!(part.chars().all(|c| c.is_ascii_digit()));
                // Unpadded: no leading zero unless the component is zero.
                assert!(part == "0" || !part.starts_with('0'));
            }
        }
    }

    proptest! {
        #[test]
        fn last_field_of_each_group_equals_group_sum(
            conn in prop::collection::vec(0_u64..10_000, 4),
            http in prop::collection::vec(0_u64..10_000, 2),
            buckets in prop::collection::vec(0_u64..10_000, 4),
        ) {
            let mut fields = vec!["1234567890".to_string()];
            fields.extend(conn.iter().map(u64::to_string));
            fields.extend(http.iter().map(u64::to_string));
            fields.extend(buckets.iter().map(u64::to_string));
            let row = fields.join("\t");

            let mut b = builder();
            b.ingest(&row).expect("row is valid");
            let set = b.finish();

            prop_assert_eq!(set.get("conn_close"), Some(&[conn.iter().sum::<u64>()][..]));
            prop_assert_eq!(set.get("http_error"), Some(&[http.iter().sum::<u64>()][..]));
            prop_assert_eq!(set.get("over_100"), Some(&[buckets.iter().sum::<u64>()][..]));

            // Each stored value is the prefix sum of its group in field order.
            let mut prefix = 0_u64;
            for (value, name) in conn.iter().zip(crate::layout::CONNECTION_FIELDS) {
                prefix += value;
                prop_assert_eq!(set.get(name), Some(&[prefix][..]));
            }
        }

        #[test]
        fn ingestion_is_idempotent_across_builders(
            rows in prop::collection::vec(prop::collection::vec(0_u64..1_000, 10), 0..8),
        ) {
            let lines: Vec<String> = rows
                .iter()
                .enumerate()
                .map(|(i, values)| {
                    let mut fields = vec![format!("{}", 1_234_567_890 + i as u64)];
                    fields.extend(values.iter().map(u64::to_string));
                    fields.join("\t")
                })
                .collect();

            let mut first = builder();
            let mut second = builder();
            for row in &lines {
                first.ingest(row).expect("row is valid");
                second.ingest(row).expect("row is valid");
            }
            prop_assert_eq!(first.finish(), second.finish());
        }
    }
}
