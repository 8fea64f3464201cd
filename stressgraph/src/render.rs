//! Plotters-backed chart sink
//!
//! Renders each [`ChartSpec`] as a filled stacked area chart, one PNG per
//! size variant: `<stem>.png` at standard size, `<stem>_tn.png` at thumbnail
//! size when thumbnails are enabled. Layers arrive pre-stacked and are drawn
//! in spec order; later, smaller layers paint over earlier ones. The x axis
//! ranges over row indices and is labeled with the time-of-day strings, so
//! x/y sequences of unequal length truncate to the shorter, tolerating
//! partially-written log files.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::{debug, info};

use crate::chart::{ChartSink, ChartSpec, Error};
use crate::config::{Config, GraphSize};

/// Renders charts into an images directory via [`plotters`].
#[derive(Debug)]
pub struct PlottersSink {
    images_dir: PathBuf,
    thumbnails: bool,
    font_family: String,
    font_size_thumb: u32,
    font_size_standard: u32,
    graph_size_thumb: GraphSize,
    graph_size_standard: GraphSize,
    verbose: bool,
}

impl PlottersSink {
    /// Create a sink writing into `images_dir`, which must already exist.
    #[must_use]
    pub fn new(config: &Config, images_dir: PathBuf) -> Self {
        Self {
            images_dir,
            thumbnails: config.thumbnails,
            font_family: font_family(config.font_file.as_deref()),
            font_size_thumb: config.font_size_thumb,
            font_size_standard: config.font_size_standard,
            graph_size_thumb: config.graph_size_thumb,
            graph_size_standard: config.graph_size_standard,
            verbose: config.verbose,
        }
    }

    fn render_variant(
        &self,
        spec: &ChartSpec,
        suffix: &str,
        size: GraphSize,
        font_size: u32,
    ) -> Result<(), Error> {
        let path = self
            .images_dir
            .join(format!("{stem}{suffix}.png", stem = spec.file_stem()));
        info!("generating image: {path}", path = path.display());
        self.draw(spec, &path, size, font_size)
            .map_err(|reason| Error::Render {
                chart: spec.title.to_string(),
                reason: reason.to_string(),
            })
    }

    fn draw(
        &self,
        spec: &ChartSpec,
        path: &Path,
        size: GraphSize,
        font_size: u32,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let x_len = spec.x.len().max(1);
        let y_max = spec
            .layers
            .iter()
            .flat_map(|layer| layer.points.iter().copied())
            .max()
            .unwrap_or(0)
            .max(1);
        // A little headroom so the top layer does not touch the frame.
        let y_top = y_max + y_max / 20 + 1;

        let root = BitMapBackend::new(path, (size.width, size.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(spec.title, (self.font_family.as_str(), font_size))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(0..x_len, 0_u64..y_top)?;

        chart
            .configure_mesh()
            .x_labels(10)
            .x_label_formatter(&|i| spec.x.get(*i).cloned().unwrap_or_default())
            .label_style((self.font_family.as_str(), font_size))
            .draw()?;

        if self.verbose {
            debug!(
                "chart `{title}` x axis ({len} points): {values:?}",
                title = spec.title,
                len = spec.x.len(),
                values = spec.x
            );
        }

        for (idx, layer) in spec.layers.iter().enumerate() {
            // Unmatched trailing points on either axis are silently ignored.
            let n = spec.x.len().min(layer.points.len());
            if self.verbose {
                debug!(
                    "chart `{title}` {dump}",
                    title = spec.title,
                    dump = layer_dump(layer.name, layer.points, spec.x.len())
                );
            }
            let color = Palette99::pick(idx);
            chart
                .draw_series(AreaSeries::new(
                    (0..n).map(|i| (i, layer.points[i])),
                    0_u64,
                    color,
                ))?
                .label(layer.name)
                .legend(move |(x, y)| {
                    Rectangle::new(
                        [(x - 4, y - 4), (x + 4, y + 4)],
                        Palette99::pick(idx).filled(),
                    )
                });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((self.font_family.as_str(), font_size))
            .draw()?;

        root.present()?;
        Ok(())
    }
}

impl ChartSink for PlottersSink {
    fn render(&mut self, spec: &ChartSpec) -> Result<(), Error> {
        self.render_variant(spec, "", self.graph_size_standard, self.font_size_standard)?;
        if self.thumbnails {
            self.render_variant(spec, "_tn", self.graph_size_thumb, self.font_size_thumb)?;
        }
        Ok(())
    }
}

/// Verbose diagnostic for one layer: sizes and the full value sequence.
fn layer_dump(name: &str, points: &[u64], x_len: usize) -> String {
    format!(
        "layer `{name}`: x size {x_len}, y size {y_len}, values {points:?}",
        y_len = points.len()
    )
}

/// Font family for the backend: the configured font file's stem, falling
/// back to a generic family. Plotters resolves fonts by family name.
fn font_family(font_file: Option<&Path>) -> String {
    font_file
        .and_then(Path::file_stem)
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sans-serif".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_dump_carries_sizes_and_values() {
        let dump = layer_dump("conn_success", &[3, 7, 12], 4);
        assert_eq!(
            dump,
            "layer `conn_success`: x size 4, y size 3, values [3, 7, 12]"
        );
    }

    #[test]
    fn font_family_falls_back_to_sans_serif() {
        assert_eq!(font_family(None), "sans-serif");
        assert_eq!(
            font_family(Some(Path::new("/fonts/RopaSans-Regular.ttf"))),
            "RopaSans-Regular"
        );
    }
}
