use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::canvas::{self, padded_range, Scale};
use super::{ensure_plottable, grid_shape, series_label, ChartOptions};
use crate::color::generate_palette;
use crate::data::model::{Dataset, Series};
use crate::error::Result;

pub const FIGURE_SIZE: (f64, f64) = (15.0, 10.0);

/// One trend panel per numeric column, months on the x-axis.
pub fn render(dataset: &Dataset, path: &Path, opts: &ChartOptions) -> Result<()> {
    ensure_plottable(dataset)?;

    canvas::render_png(path, FIGURE_SIZE, opts.dpi, |root, scale| {
        let body = root.titled("Business Performance Trends", scale.bold(16.0))?;
        let panels = body.split_evenly(grid_shape(dataset.numeric.len()));
        let colors = generate_palette(dataset.numeric.len());

        for (i, (series, area)) in dataset.numeric.iter().zip(&panels).enumerate() {
            draw_panel(area, dataset, series, colors[i], i, scale)?;
        }
        Ok(())
    })
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    dataset: &Dataset,
    series: &Series,
    color: RGBColor,
    index: usize,
    scale: Scale,
) -> Result<()> {
    let n = dataset.len();
    let x_range = -0.5..(n as f64 - 0.5);
    let y_range = padded_range(series.values.iter().copied(), 0.08);

    let mut chart = ChartBuilder::on(area)
        .caption(format!("Monthly {} Trend", series.name), scale.bold(12.0))
        .margin(scale.px(8.0))
        .x_label_area_size(scale.px(28.0))
        .y_label_area_size(scale.px(48.0))
        .build_cartesian_2d(x_range, y_range)?;

    let labels = &dataset.labels;
    let month = |x: &f64| canvas::category_label(labels, *x);
    chart
        .configure_mesh()
        .x_labels(n)
        .x_label_formatter(&month)
        .y_desc(series_label(series))
        .label_style(scale.font(9.0))
        .axis_desc_style(scale.font(10.0))
        .light_line_style(&BLACK.mix(0.04))
        .bold_line_style(&BLACK.mix(0.12))
        .draw()?;

    let points: Vec<(f64, f64)> = series
        .values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v))
        .collect();
    let line_style = color.stroke_width(scale.px(2.0));
    chart.draw_series(LineSeries::new(points.iter().copied(), line_style))?;

    let size = scale.px(3.0) as i32;
    let fill = color.filled();
    // Each panel gets its own marker shape.
    match index % 4 {
        0 => {
            chart.draw_series(points.iter().map(|&p| Circle::new(p, size, fill)))?;
        }
        1 => {
            chart.draw_series(
                points
                    .iter()
                    .map(|&p| EmptyElement::at(p) + Rectangle::new([(-size, -size), (size, size)], fill)),
            )?;
        }
        2 => {
            chart.draw_series(points.iter().map(|&p| TriangleMarker::new(p, size + 1, fill)))?;
        }
        _ => {
            chart.draw_series(points.iter().map(|&p| Cross::new(p, size, color.stroke_width(scale.px(1.5)))))?;
        }
    }
    Ok(())
}
