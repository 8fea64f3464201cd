//! Chart specification and the fixed per-run chart set
//!
//! A chart is a title, the time series as x axis and an ordered list of
//! stacked layers. Layer order is the visual stacking order and is chosen
//! per chart, independent of the field order used during aggregation: the
//! largest cumulative layer comes first so that later, smaller layers paint
//! over it. Rendering happens behind [`ChartSink`] so the pipeline is
//! testable without any real plotting or file I/O.

use stressgraph_series::bucket::BucketSchema;
use stressgraph_series::series::SeriesSet;
use tracing::error;

/// Errors produced by chart assembly and [`ChartSink`] implementations.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A requested series name is absent from the data set.
    #[error("series `{0}` is not present in the data set")]
    MissingSeries(String),
    /// The sink failed to produce an image.
    #[error("failed to render chart `{chart}`: {reason}")]
    Render {
        /// Title of the failed chart.
        chart: String,
        /// What went wrong, as reported by the backend.
        reason: String,
    },
}

/// One stacked layer of a chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer<'a> {
    /// Legend label, the series name.
    pub name: &'a str,
    /// Pre-stacked y values, aligned with the x axis.
    pub points: &'a [u64],
}

/// A fully assembled chart, ready for a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec<'a> {
    /// Chart title.
    pub title: &'static str,
    /// Time-of-day labels, the x axis.
    pub x: &'a [String],
    /// Stacked layers in visual stacking order.
    pub layers: Vec<Layer<'a>>,
}

impl ChartSpec<'_> {
    /// Output file stem: the first word of the title.
    #[must_use]
    pub fn file_stem(&self) -> &str {
        self.title.split_whitespace().next().unwrap_or(self.title)
    }
}

/// Something that can turn a [`ChartSpec`] into output.
///
/// The production implementation plots PNGs; tests substitute a recorder.
pub trait ChartSink {
    /// Render one chart, including any size variants the sink produces.
    ///
    /// # Errors
    ///
    /// Returns an error when the chart cannot be produced. Failures are
    /// per chart; the caller reports them and continues with the rest.
    fn render(&mut self, spec: &ChartSpec) -> Result<(), Error>;
}

fn layer<'a>(set: &'a SeriesSet, name: &'a str) -> Result<Layer<'a>, Error> {
    let points = set
        .get(name)
        .ok_or_else(|| Error::MissingSeries(name.to_string()))?;
    Ok(Layer { name, points })
}

/// The connection-outcome chart: timeout over error over success.
///
/// # Errors
///
/// Returns an error if a connection series is absent from the set.
pub fn connections(set: &SeriesSet) -> Result<ChartSpec<'_>, Error> {
    let layers = ["conn_timeout", "conn_error", "conn_success"]
        .into_iter()
        .map(|name| layer(set, name))
        .collect::<Result<Vec<_>, Error>>()?;
    Ok(ChartSpec {
        title: "Connections",
        x: set.times(),
        layers,
    })
}

/// The HTTP-outcome chart: error over success.
///
/// # Errors
///
/// Returns an error if an HTTP series is absent from the set.
pub fn http_status(set: &SeriesSet) -> Result<ChartSpec<'_>, Error> {
    let layers = ["http_error", "http_success"]
        .into_iter()
        .map(|name| layer(set, name))
        .collect::<Result<Vec<_>, Error>>()?;
    Ok(ChartSpec {
        title: "HTTP Status",
        x: set.times(),
        layers,
    })
}

/// The latency-bucket chart, descending threshold order: the over bucket is
/// drawn first, the tightest bucket last.
///
/// # Errors
///
/// Returns an error if a bucket series is absent from the set, which can
/// only happen when `schema` is not the schema the set was built with.
pub fn buckets<'a>(set: &'a SeriesSet, schema: &'a BucketSchema) -> Result<ChartSpec<'a>, Error> {
    let layers = schema
        .names()
        .iter()
        .rev()
        .map(|name| layer(set, name))
        .collect::<Result<Vec<_>, Error>>()?;
    Ok(ChartSpec {
        title: "Buckets (ms)",
        x: set.times(),
        layers,
    })
}

/// Render every assembled chart through the sink.
///
/// Failures are per chart: an assembly or render error is reported and
/// counted, and the remaining charts are still attempted. Returns the
/// number of charts that failed.
pub fn render_all(specs: &[Result<ChartSpec<'_>, Error>], sink: &mut dyn ChartSink) -> usize {
    let mut failed = 0;
    for spec in specs {
        match spec {
            Ok(spec) => {
                if let Err(error) = sink.render(spec) {
                    error!("{error}");
                    failed += 1;
                }
            }
            Err(error) => {
                error!("{error}");
                failed += 1;
            }
        }
    }
    failed
}
