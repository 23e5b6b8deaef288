use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::canvas::{self, padded_range, Scale};
use super::{ensure_plottable, grid_shape, series_label, ChartOptions};
use crate::analysis::fit::{histogram, Bin};
use crate::color::generate_palette;
use crate::data::model::{Dataset, Series};
use crate::error::Result;

pub const FIGURE_SIZE: (f64, f64) = (14.0, 10.0);

/// Distribution panel per numeric column.
pub fn render(dataset: &Dataset, path: &Path, opts: &ChartOptions) -> Result<()> {
    ensure_plottable(dataset)?;

    canvas::render_png(path, FIGURE_SIZE, opts.dpi, |root, scale| {
        let body = root.titled("Data Distribution Analysis", scale.bold(16.0))?;
        let panels = body.split_evenly(grid_shape(dataset.numeric.len()));
        let colors = generate_palette(dataset.numeric.len());

        for (i, (series, area)) in dataset.numeric.iter().zip(&panels).enumerate() {
            let bins = histogram(&series.values, opts.histogram_bins);
            draw_panel(area, series, &bins, colors[i], scale)?;
        }
        Ok(())
    })
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    series: &Series,
    bins: &[Bin],
    color: RGBColor,
    scale: Scale,
) -> Result<()> {
    let x_range = padded_range(
        bins.iter().flat_map(|b| [b.lower, b.upper]),
        0.03,
    );
    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0);
    let y_range = 0.0..(max_count as f64 * 1.1).max(1.0);

    let mut chart = ChartBuilder::on(area)
        .caption(format!("{} Distribution", series.name), scale.bold(12.0))
        .margin(scale.px(8.0))
        .x_label_area_size(scale.px(30.0))
        .y_label_area_size(scale.px(40.0))
        .build_cartesian_2d(x_range, y_range)?;

    let whole = |y: &f64| format!("{y:.0}");
    chart
        .configure_mesh()
        .x_desc(series_label(series))
        .y_desc("Frequency")
        .y_label_formatter(&whole)
        .label_style(scale.font(9.0))
        .axis_desc_style(scale.font(10.0))
        .light_line_style(&BLACK.mix(0.04))
        .bold_line_style(&BLACK.mix(0.12))
        .draw()?;

    chart.draw_series(bins.iter().map(|b| {
        Rectangle::new([(b.lower, 0.0), (b.upper, b.count as f64)], color.mix(0.7).filled())
    }))?;
    let edge = BLACK.stroke_width(scale.px(0.6));
    chart.draw_series(
        bins.iter()
            .filter(|b| b.count > 0)
            .map(|b| Rectangle::new([(b.lower, 0.0), (b.upper, b.count as f64)], edge)),
    )?;
    Ok(())
}
