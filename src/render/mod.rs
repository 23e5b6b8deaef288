/// Chart renderers.
///
/// Architecture:
/// ```text
///   Dataset ──► line / bar / scatter / histogram / heatmap
///                          │
///                          ▼
///                 ┌─────────────────┐
///                 │ canvas          │  RGB buffer at dpi → PNG
///                 └─────────────────┘
///                          │
///                          ▼
///             <tag>_<YYYYMMDD_HHMMSS>.png
/// ```
pub mod bar;
pub mod canvas;
pub mod heatmap;
pub mod histogram;
pub mod line;
pub mod scatter;

use std::fmt;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::config::Settings;
use crate::data::model::{Dataset, Metric, Series};
use crate::error::{DataVisError, Result};
use crate::output::{Artifact, ArtifactKind, FileNamer};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartOptions {
    pub dpi: u32,
    pub histogram_bins: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions::from(&Settings::default())
    }
}

impl From<&Settings> for ChartOptions {
    fn from(settings: &Settings) -> Self {
        ChartOptions {
            dpi: settings.dpi,
            histogram_bins: settings.histogram_bins,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
    Histogram,
    Heatmap,
}

impl ChartKind {
    /// Order used by "generate all".
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Scatter,
        ChartKind::Histogram,
        ChartKind::Heatmap,
    ];

    /// File name prefix.
    pub fn tag(self) -> &'static str {
        match self {
            ChartKind::Line => "line_plot",
            ChartKind::Bar => "bar_chart",
            ChartKind::Scatter => "scatter_plot",
            ChartKind::Histogram => "histogram",
            ChartKind::Heatmap => "heatmap",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Line => "Line plot",
            ChartKind::Bar => "Bar chart",
            ChartKind::Scatter => "Scatter plot",
            ChartKind::Histogram => "Histogram",
            ChartKind::Heatmap => "Heatmap",
        }
    }

    /// Figure size in inches; the PNG is this times the dpi.
    pub fn figure_size(self) -> (f64, f64) {
        match self {
            ChartKind::Line => line::FIGURE_SIZE,
            ChartKind::Bar => bar::FIGURE_SIZE,
            ChartKind::Scatter => scatter::FIGURE_SIZE,
            ChartKind::Histogram => histogram::FIGURE_SIZE,
            ChartKind::Heatmap => heatmap::FIGURE_SIZE,
        }
    }

    /// Render this chart to `path`.
    pub fn render(self, dataset: &Dataset, path: &Path, opts: &ChartOptions) -> Result<()> {
        match self {
            ChartKind::Line => line::render(dataset, path, opts),
            ChartKind::Bar => bar::render(dataset, path, opts),
            ChartKind::Scatter => scatter::render(dataset, path, opts),
            ChartKind::Histogram => histogram::render(dataset, path, opts),
            ChartKind::Heatmap => heatmap::render(dataset, path, opts),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Name, render and record one chart.
pub fn render_chart(
    kind: ChartKind,
    dataset: &Dataset,
    namer: &mut FileNamer,
    opts: &ChartOptions,
    now: NaiveDateTime,
) -> Result<Artifact> {
    namer.ensure_dir()?;
    let path = namer.next_path(kind.tag(), now, "png");
    log::info!("Rendering {kind} to {}", path.display());
    kind.render(dataset, &path, opts)?;
    Ok(Artifact {
        kind: ArtifactKind::Chart,
        path,
    })
}

/// Every chart in [`ChartKind::ALL`] order. One failure does not stop the rest.
pub fn render_all(
    dataset: &Dataset,
    namer: &mut FileNamer,
    opts: &ChartOptions,
    now: NaiveDateTime,
) -> Vec<(ChartKind, Result<Artifact>)> {
    ChartKind::ALL
        .into_iter()
        .map(|kind| (kind, render_chart(kind, dataset, namer, opts, now)))
        .collect()
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn ensure_plottable(dataset: &Dataset) -> Result<()> {
    if dataset.is_empty() || dataset.numeric.is_empty() {
        return Err(DataVisError::Render("no numeric data to plot".into()));
    }
    Ok(())
}

/// `(rows, cols)` for `n` panels, two per row.
fn grid_shape(n: usize) -> (usize, usize) {
    match n {
        0 | 1 => (1, 1),
        n => (n.div_ceil(2), 2),
    }
}

fn series_label(series: &Series) -> String {
    Metric::from_column(&series.name)
        .map(|m| m.axis_label().to_string())
        .unwrap_or_else(|| series.name.clone())
}
