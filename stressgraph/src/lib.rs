//! The stressgraph chart generation tool.
//!
//! Library half of the stressgraph binary: run configuration, chart
//! assembly and the plotters-backed sink live here so the whole pipeline
//! short of pixel output can be exercised in tests. Nothing in this crate
//! is meant as a general-purpose API.

#![deny(clippy::all)]
#![deny(clippy::cargo)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
#![deny(clippy::dbg_macro)]
#![deny(unused_extern_crates)]
#![deny(unused_allocation)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]
#![deny(unreachable_pub)]
#![deny(missing_docs)]
#![allow(clippy::multiple_crate_versions)]

pub mod chart;
pub mod config;
pub mod render;
