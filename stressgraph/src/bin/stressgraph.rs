//! Graph hstress capture logs as stacked area charts.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use clap::Parser;
use stressgraph::chart;
use stressgraph::config::{self, Config, GraphSize};
use stressgraph::render::PlottersSink;
use stressgraph_series::bucket::BucketSchema;
use stressgraph_series::layout::RowLayout;
use stressgraph_series::scan;
use stressgraph_series::series::SeriesBuilder;
use tracing::info;
use tracing_subscriber::{EnvFilter, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Graph output from hstress", long_about = None)]
struct Args {
    /// Data file of hstress stdout
    #[clap(short, long)]
    data_file: PathBuf,

    /// Latency buckets matching the hstress invocation, comma separated
    #[clap(short, long, value_delimiter = ',', default_values_t = config::DEFAULT_BUCKETS)]
    buckets: Vec<u64>,

    /// Generate thumbnail images also
    #[clap(short, long)]
    thumbnails: bool,

    /// The directory in which to store the images, created next to the data file
    #[clap(long, default_value = config::DEFAULT_IMAGES_DIR)]
    images_dir: String,

    /// Font file to use, resolved by its family name
    #[clap(long)]
    font_file: Option<PathBuf>,

    /// Font size to use for thumbnails
    #[clap(long, default_value_t = config::DEFAULT_FONT_SIZE_THUMB)]
    font_size_thumb: u32,

    /// Font size to use for standard graphs
    #[clap(long, default_value_t = config::DEFAULT_FONT_SIZE_STANDARD)]
    font_size_standard: u32,

    /// Pixel size to use for thumbnail graphs, WIDTH,HEIGHT
    #[clap(long, default_value_t = config::DEFAULT_GRAPH_SIZE_THUMB)]
    graph_size_thumb: GraphSize,

    /// Pixel size to use for standard graphs, WIDTH,HEIGHT
    #[clap(long, default_value_t = config::DEFAULT_GRAPH_SIZE_STANDARD)]
    graph_size_standard: GraphSize,

    /// Show the values and other interesting info
    #[clap(short, long)]
    verbose: bool,
}

/// Errors that can occur while running stressgraph.
#[derive(thiserror::Error, Debug)]
enum Error {
    /// Invalid run configuration.
    #[error(transparent)]
    Config(#[from] config::Error),
    /// Invalid bucket threshold list.
    #[error(transparent)]
    Bucket(#[from] stressgraph_series::bucket::Error),
    /// I/O operation failed.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// One or more charts could not be rendered.
    #[error("{failed} chart(s) failed to render")]
    Render {
        /// Number of failed charts.
        failed: usize,
    },
}

fn main() -> Result<(), Error> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if args.verbose { "debug" } else { "info" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .finish()
        .init();

    // The schema is a pure function of the threshold list; resolve it before
    // anything touches the file system.
    let schema = BucketSchema::new(&args.buckets)?;

    let config = Config::builder(args.data_file)
        .buckets(args.buckets)
        .thumbnails(args.thumbnails)
        .images_dir_name(args.images_dir)
        .font_file(args.font_file)
        .font_size_thumb(args.font_size_thumb)
        .font_size_standard(args.font_size_standard)
        .graph_size_thumb(args.graph_size_thumb)
        .graph_size_standard(args.graph_size_standard)
        .verbose(args.verbose)
        .build()?;

    let images_dir = config.ensure_images_dir()?;
    info!("images dir: {dir}", dir = images_dir.display());

    let file = File::open(&config.data_file)?;
    let mut builder = SeriesBuilder::new(RowLayout::new(&schema));
    let report = scan::scan(BufReader::new(file), &mut builder)?;
    info!(
        "scanned {lines} lines: {accepted} rows accepted, {skipped} skipped, \
         {malformed} malformed, {parse} unparseable",
        lines = report.lines_read,
        accepted = report.rows_accepted,
        skipped = report.rows_skipped,
        malformed = report.malformed_rows,
        parse = report.parse_errors,
    );
    let series = builder.finish();

    let mut sink = PlottersSink::new(&config, images_dir);
    let specs = [
        chart::connections(&series),
        chart::http_status(&series),
        chart::buckets(&series, &schema),
    ];
    let failed = chart::render_all(&specs, &mut sink);

    if failed > 0 {
        return Err(Error::Render { failed });
    }
    info!("done");
    Ok(())
}
