use crate::color::parse_palette;
use crate::error::RenderResult;
use crate::{clock, cloud, radar};
use chatlens_core::RenderConfig;
use plotters::style::RGBColor;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// One radar panel: a titled set of series, each with one value per axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarPanel {
    /// Panel title, usually the sender.
    pub title: String,
    /// Series drawn in this panel, coloured by palette order.
    pub series: Vec<Vec<f64>>,
}

impl RadarPanel {
    /// Panel with a single series.
    pub fn single(title: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            title: title.into(),
            series: vec![values],
        }
    }
}

/// Renders the radar grid and the hourly activity chart.
pub trait ChartRenderer {
    /// Draw one panel per entry, sharing axis `labels`.
    fn render_radar(
        &self,
        panels: &[RadarPanel],
        labels: &[String],
        path: &Path,
    ) -> RenderResult<()>;

    /// Draw 24 hourly bars with radii in `[0, 1]`.
    fn render_clock(&self, radii: &[f64], path: &Path) -> RenderResult<()>;
}

/// Renders a weighted term list as a word cloud.
pub trait WordCloudRenderer {
    /// Draw `words` (term, weight) into an image at `path`.
    fn render_cloud(&self, words: &[(String, f64)], path: &Path) -> RenderResult<()>;
}

/// SVG renderer backed by plotters.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    config: RenderConfig,
    palette: Vec<RGBColor>,
}

impl SvgRenderer {
    /// Create a renderer, validating the palette up front.
    pub fn new(config: RenderConfig) -> RenderResult<Self> {
        let palette = parse_palette(&config.palette)?;
        Ok(Self { config, palette })
    }

    /// The configuration this renderer draws with.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }
}

fn ensure_parent(path: &Path) -> RenderResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

impl ChartRenderer for SvgRenderer {
    fn render_radar(
        &self,
        panels: &[RadarPanel],
        labels: &[String],
        path: &Path,
    ) -> RenderResult<()> {
        ensure_parent(path)?;
        radar::draw_radar_grid(&self.config, &self.palette, panels, labels, path)?;
        debug!("radar chart written to {}", path.display());
        Ok(())
    }

    fn render_clock(&self, radii: &[f64], path: &Path) -> RenderResult<()> {
        ensure_parent(path)?;
        clock::draw_clock(&self.config, radii, path)?;
        debug!("clock chart written to {}", path.display());
        Ok(())
    }
}

impl WordCloudRenderer for SvgRenderer {
    fn render_cloud(&self, words: &[(String, f64)], path: &Path) -> RenderResult<()> {
        ensure_parent(path)?;
        let layout = cloud::WordCloudLayout::new(
            self.config.cloud_width,
            self.config.cloud_height,
            self.config.cloud_min_font,
            self.config.cloud_max_font,
        );
        let placed = layout.place(words);
        cloud::draw_cloud(&self.config, &self.palette, &placed, path)?;
        debug!(
            "word cloud with {} of {} words written to {}",
            placed.len(),
            words.len(),
            path.display()
        );
        Ok(())
    }
}
