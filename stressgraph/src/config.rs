//! This module controls configuration of a stressgraph run, providing a
//! convenience mechanism for the rest of the program. The value is built
//! once from defaults overridden by command-line input and is immutable from
//! then on; parsing and rendering receive it by reference.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    str,
};

/// Default bucket thresholds, matching hstress defaults, in milliseconds.
pub const DEFAULT_BUCKETS: [u64; 3] = [1, 10, 100];
/// Default name of the image output directory.
pub const DEFAULT_IMAGES_DIR: &str = "test_images";
/// Default font size for thumbnail charts.
pub const DEFAULT_FONT_SIZE_THUMB: u32 = 8;
/// Default font size for standard charts.
pub const DEFAULT_FONT_SIZE_STANDARD: u32 = 13;
/// Default pixel dimensions for thumbnail charts.
pub const DEFAULT_GRAPH_SIZE_THUMB: GraphSize = GraphSize {
    width: 600,
    height: 200,
};
/// Default pixel dimensions for standard charts.
pub const DEFAULT_GRAPH_SIZE_STANDARD: GraphSize = GraphSize {
    width: 1200,
    height: 300,
};

/// Errors produced by [`Config`]
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The data file does not exist.
    #[error("data file {0:?} does not exist")]
    MissingDataFile(PathBuf),
    /// A graph size did not parse as `WIDTH,HEIGHT`.
    #[error("invalid graph size {0:?}, expected WIDTH,HEIGHT")]
    InvalidGraphSize(String),
    /// The images directory could not be created.
    #[error("failed to create images directory {path:?}: {source}")]
    ImagesDir {
        /// Directory path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },
}

/// Pixel dimensions of a rendered chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl fmt::Display for GraphSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{width},{height}", width = self.width, height = self.height)
    }
}

impl str::FromStr for GraphSize {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidGraphSize(input.to_string());
        let (width, height) = input.split_once(',').ok_or_else(invalid)?;
        let width = width.trim().parse().map_err(|_| invalid())?;
        let height = height.trim().parse().map_err(|_| invalid())?;
        Ok(Self { width, height })
    }
}

/// Main configuration struct for this program
#[derive(Debug, Clone)]
pub struct Config {
    /// The hstress capture log to graph.
    pub data_file: PathBuf,
    /// Latency bucket thresholds, must match the hstress invocation.
    pub buckets: Vec<u64>,
    /// Whether to additionally render thumbnail variants.
    pub thumbnails: bool,
    /// Name of the image directory, created next to the data file.
    pub images_dir_name: String,
    /// Optional font file; its stem selects the font family.
    pub font_file: Option<PathBuf>,
    /// Font size for thumbnail charts.
    pub font_size_thumb: u32,
    /// Font size for standard charts.
    pub font_size_standard: u32,
    /// Pixel dimensions for thumbnail charts.
    pub graph_size_thumb: GraphSize,
    /// Pixel dimensions for standard charts.
    pub graph_size_standard: GraphSize,
    /// Emit per-chart series diagnostics.
    pub verbose: bool,
}

/// Assembles a [`Config`] from defaults plus explicit overrides.
///
/// The resulting value is complete at construction; nothing mutates it
/// afterwards.
#[derive(Debug)]
pub struct Builder {
    data_file: PathBuf,
    buckets: Vec<u64>,
    thumbnails: bool,
    images_dir_name: String,
    font_file: Option<PathBuf>,
    font_size_thumb: u32,
    font_size_standard: u32,
    graph_size_thumb: GraphSize,
    graph_size_standard: GraphSize,
    verbose: bool,
}

impl Builder {
    /// Override the bucket thresholds.
    #[must_use]
    pub fn buckets(mut self, buckets: Vec<u64>) -> Self {
        self.buckets = buckets;
        self
    }

    /// Enable or disable thumbnail variants.
    #[must_use]
    pub fn thumbnails(mut self, thumbnails: bool) -> Self {
        self.thumbnails = thumbnails;
        self
    }

    /// Override the image directory name.
    #[must_use]
    pub fn images_dir_name(mut self, name: String) -> Self {
        self.images_dir_name = name;
        self
    }

    /// Select a font file.
    #[must_use]
    pub fn font_file(mut self, font_file: Option<PathBuf>) -> Self {
        self.font_file = font_file;
        self
    }

    /// Override the thumbnail font size.
    #[must_use]
    pub fn font_size_thumb(mut self, size: u32) -> Self {
        self.font_size_thumb = size;
        self
    }

    /// Override the standard font size.
    #[must_use]
    pub fn font_size_standard(mut self, size: u32) -> Self {
        self.font_size_standard = size;
        self
    }

    /// Override the thumbnail graph dimensions.
    #[must_use]
    pub fn graph_size_thumb(mut self, size: GraphSize) -> Self {
        self.graph_size_thumb = size;
        self
    }

    /// Override the standard graph dimensions.
    #[must_use]
    pub fn graph_size_standard(mut self, size: GraphSize) -> Self {
        self.graph_size_standard = size;
        self
    }

    /// Enable or disable verbose diagnostics.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Finish the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the data file does not exist; the run must fail
    /// fast before any output is produced.
    pub fn build(self) -> Result<Config, Error> {
        if !self.data_file.exists() {
            return Err(Error::MissingDataFile(self.data_file));
        }
        Ok(Config {
            data_file: self.data_file,
            buckets: self.buckets,
            thumbnails: self.thumbnails,
            images_dir_name: self.images_dir_name,
            font_file: self.font_file,
            font_size_thumb: self.font_size_thumb,
            font_size_standard: self.font_size_standard,
            graph_size_thumb: self.graph_size_thumb,
            graph_size_standard: self.graph_size_standard,
            verbose: self.verbose,
        })
    }
}

impl Config {
    /// Start a builder around a data file, all other settings at their
    /// defaults.
    #[must_use]
    pub fn builder(data_file: PathBuf) -> Builder {
        Builder {
            data_file,
            buckets: DEFAULT_BUCKETS.to_vec(),
            thumbnails: false,
            images_dir_name: DEFAULT_IMAGES_DIR.to_string(),
            font_file: None,
            font_size_thumb: DEFAULT_FONT_SIZE_THUMB,
            font_size_standard: DEFAULT_FONT_SIZE_STANDARD,
            graph_size_thumb: DEFAULT_GRAPH_SIZE_THUMB,
            graph_size_standard: DEFAULT_GRAPH_SIZE_STANDARD,
            verbose: false,
        }
    }

    /// The default configuration around a data file.
    ///
    /// # Errors
    ///
    /// Returns an error if the data file does not exist.
    pub fn new(data_file: PathBuf) -> Result<Self, Error> {
        Self::builder(data_file).build()
    }

    /// The image output directory, relative to the data file's location.
    #[must_use]
    pub fn images_dir(&self) -> PathBuf {
        self.data_file
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(&self.images_dir_name)
    }

    /// Create the image output directory if needed and return it.
    ///
    /// Creation is idempotent; there is exactly one writer per run.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created, a fatal
    /// configuration problem.
    pub fn ensure_images_dir(&self) -> Result<PathBuf, Error> {
        let path = self.images_dir();
        fs::create_dir_all(&path).map_err(|source| Error::ImagesDir {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
