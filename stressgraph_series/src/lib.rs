//! Crate regarding hstress capture logs
//!
//! An hstress run writes one tab-delimited row per sample to stdout. This
//! crate turns such a log into per-series cumulative sequences suitable for
//! stacked area-chart rendering: bucket schema resolution, row tokenization
//! and the stacking series builder all live here, free of any plotting or
//! terminal concern.

#![deny(clippy::all)]
#![deny(clippy::cargo)]
#![deny(clippy::perf)]
#![deny(clippy::suspicious)]
#![deny(clippy::complexity)]
#![deny(unused_extern_crates)]
#![deny(unused_allocation)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]
#![deny(unreachable_pub)]
#![deny(missing_docs)]

pub mod bucket;
pub mod layout;
pub mod line;
pub mod scan;
pub mod series;
