//! Latency bucket schema resolution
//!
//! hstress reports request latency as counts in configurable millisecond
//! buckets. The series names for those buckets are a pure function of the
//! threshold list: one `under_<b>` series per threshold plus a single
//! `over_<max>` terminal for everything beyond the largest threshold. The
//! schema is fixed before any row is parsed and never mutated afterwards.

/// Errors produced by [`BucketSchema`]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The threshold list was empty.
    #[error("bucket threshold list must not be empty")]
    Empty,
    /// A threshold was zero. Thresholds are positive millisecond values.
    #[error("bucket thresholds must be positive, got 0")]
    NonPositive,
}

/// The ordered latency-bucket series names derived from a threshold list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSchema {
    thresholds: Vec<u64>,
    names: Vec<String>,
}

impl BucketSchema {
    /// Resolve a schema from a list of millisecond thresholds.
    ///
    /// Thresholds are sorted ascending and deduplicated. The resulting name
    /// list has one `under_<b>` entry per distinct threshold followed by
    /// `over_<max>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or contains a zero threshold.
    /// Both are configuration errors and must be rejected before parsing
    /// begins.
    pub fn new(thresholds: &[u64]) -> Result<Self, Error> {
        if thresholds.is_empty() {
            return Err(Error::Empty);
        }
        if thresholds.contains(&0) {
            return Err(Error::NonPositive);
        }
        let mut thresholds = thresholds.to_vec();
        thresholds.sort_unstable();
        thresholds.dedup();

        let mut names: Vec<String> = thresholds.iter().map(|b| format!("under_{b}")).collect();
        let largest = thresholds
            .last()
            .copied()
            .expect("thresholds non-empty by check above");
        names.push(format!("over_{largest}"));

        Ok(Self { thresholds, names })
    }

    /// The distinct thresholds, sorted ascending.
    #[must_use]
    pub fn thresholds(&self) -> &[u64] {
        &self.thresholds
    }

    /// The ordered bucket series names, `under_*` ascending then `over_*`.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of bucket series, always `thresholds + 1`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false for a resolved schema, present for completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for BucketSchema {
    /// The hstress default buckets: 1ms, 10ms, 100ms.
    fn default() -> Self {
        Self::new(&[1, 10, 100]).expect("default thresholds are valid")
    }
}
