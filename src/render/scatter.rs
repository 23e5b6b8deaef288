use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use super::canvas::{self, padded_range, Scale};
use super::{ensure_plottable, ChartOptions};
use crate::analysis::fit::linear_fit;
use crate::color::ColorScale;
use crate::data::model::{Dataset, Metric};
use crate::error::Result;

pub const FIGURE_SIZE: (f64, f64) = (15.0, 6.0);

/// x metric, y metric, colour metric, colour scale.
struct Pairing {
    x: Metric,
    y: Metric,
    hue: Metric,
    scale: fn() -> ColorScale,
}

const PAIRINGS: [Pairing; 2] = [
    Pairing {
        x: Metric::Customers,
        y: Metric::Sales,
        hue: Metric::Profit,
        scale: ColorScale::viridis,
    },
    Pairing {
        x: Metric::Expenses,
        y: Metric::Profit,
        hue: Metric::Sales,
        scale: ColorScale::plasma,
    },
];

/// Two relationship panels, points coloured by a third metric with a
/// dashed least-squares trend line on top.
pub fn render(dataset: &Dataset, path: &Path, opts: &ChartOptions) -> Result<()> {
    ensure_plottable(dataset)?;

    canvas::render_png(path, FIGURE_SIZE, opts.dpi, |root, scale| {
        let body = root.titled("Relationship Analysis", scale.bold(16.0))?;
        let panels = body.split_evenly((1, PAIRINGS.len()));
        for (pairing, area) in PAIRINGS.iter().zip(&panels) {
            draw_panel(area, dataset, pairing, scale)?;
        }
        Ok(())
    })
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    dataset: &Dataset,
    pairing: &Pairing,
    scale: Scale,
) -> Result<()> {
    let xs = dataset.metric(pairing.x);
    let ys = dataset.metric(pairing.y);
    let hues = dataset.metric(pairing.hue);

    let x_range = padded_range(xs.iter().copied(), 0.08);
    let y_range = padded_range(ys.iter().copied(), 0.08);
    let (x_lo, x_hi) = (x_range.start, x_range.end);

    let mut chart = ChartBuilder::on(area)
        .caption(
            format!("{} vs {} (Color = {})", pairing.y, pairing.x, pairing.hue),
            scale.bold(12.0),
        )
        .margin(scale.px(10.0))
        .x_label_area_size(scale.px(32.0))
        .y_label_area_size(scale.px(52.0))
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(pairing.x.axis_label())
        .y_desc(pairing.y.axis_label())
        .label_style(scale.font(9.0))
        .axis_desc_style(scale.bold(10.0))
        .light_line_style(&BLACK.mix(0.04))
        .bold_line_style(&BLACK.mix(0.12))
        .draw()?;

    let colors = (pairing.scale)();
    let (h_lo, h_hi) = hues
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let radius = scale.px(5.0) as i32;

    chart.draw_series(xs.iter().zip(ys).zip(hues).map(|((&x, &y), &h)| {
        Circle::new((x, y), radius, colors.map(h, h_lo, h_hi).mix(0.75).filled())
    }))?;

    match linear_fit(xs, ys) {
        Some(fit) => {
            let trend = [(x_lo, fit.at(x_lo)), (x_hi, fit.at(x_hi))];
            chart.draw_series(DashedLineSeries::new(
                trend,
                scale.px(6.0),
                scale.px(4.0),
                RED.mix(0.8).stroke_width(scale.px(2.0)),
            ))?;
        }
        None => log::warn!(
            "No trend line for {} vs {}: x values do not vary",
            pairing.y,
            pairing.x
        ),
    }
    Ok(())
}
