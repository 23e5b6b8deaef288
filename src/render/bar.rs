use std::path::Path;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::canvas::{self, money};
use super::{ensure_plottable, ChartOptions};
use crate::color::generate_palette;
use crate::data::model::{Dataset, Metric};
use crate::error::Result;

pub const FIGURE_SIZE: (f64, f64) = (14.0, 8.0);
const BAR_WIDTH: f64 = 0.25;
const GROUPED: [Metric; 3] = [Metric::Sales, Metric::Expenses, Metric::Profit];

/// Grouped bars per month for the currency metrics, each bar labelled with
/// its value.
pub fn render(dataset: &Dataset, path: &Path, opts: &ChartOptions) -> Result<()> {
    ensure_plottable(dataset)?;
    let n = dataset.len();

    let all_values = GROUPED.iter().flat_map(|&m| dataset.metric(m).iter().copied());
    let (lo, hi) = all_values.fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let headroom = if hi - lo > 0.0 { (hi - lo) * 0.12 } else { 1.0 };
    let y_range = (lo - if lo < 0.0 { headroom } else { 0.0 })..(hi + headroom);

    canvas::render_png(path, FIGURE_SIZE, opts.dpi, |root, scale| {
        let x_range = -0.5..(n as f64 - 0.5);
        let mut chart = ChartBuilder::on(root)
            .caption("Monthly Financial Performance Comparison", scale.bold(16.0))
            .margin(scale.px(12.0))
            .x_label_area_size(scale.px(36.0))
            .y_label_area_size(scale.px(60.0))
            .build_cartesian_2d(x_range, y_range)?;

        let labels = &dataset.labels;
        let month = |x: &f64| canvas::category_label(labels, *x);
        let dollars = |y: &f64| money(*y);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&month)
            .y_label_formatter(&dollars)
            .x_desc("Month")
            .y_desc("Amount ($)")
            .label_style(scale.font(10.0))
            .axis_desc_style(scale.bold(11.0))
            .bold_line_style(&BLACK.mix(0.12))
            .light_line_style(&BLACK.mix(0.04))
            .draw()?;

        let colors = generate_palette(GROUPED.len());
        let label_font = scale.font(7.0);
        let gap = scale.pt(2.0) as i32;
        let swatch = scale.px(5.0) as i32;

        for (k, &metric) in GROUPED.iter().enumerate() {
            let color = colors[k];
            let offset = (k as f64 - 1.0) * BAR_WIDTH;
            let values = dataset.metric(metric);

            chart
                .draw_series(values.iter().enumerate().map(|(i, &v)| {
                    let x0 = i as f64 + offset - BAR_WIDTH / 2.0;
                    Rectangle::new([(x0, 0.0), (x0 + BAR_WIDTH, v)], color.mix(0.8).filled())
                }))?
                .label(metric.column())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - swatch), (x + 3 * swatch, y + swatch)], color.filled())
                });

            let style = TextStyle::from(label_font.clone())
                .pos(Pos::new(HPos::Center, VPos::Bottom));
            chart.draw_series(values.iter().enumerate().map(|(i, &v)| {
                let x = i as f64 + offset;
                EmptyElement::at((x, v)) + Text::new(money(v), (0, -gap), style.clone())
            }))?;
        }

        chart
            .configure_series_labels()
            .label_font(scale.font(11.0))
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK.mix(0.3))
            .position(SeriesLabelPosition::UpperLeft)
            .draw()?;
        Ok(())
    })
}
