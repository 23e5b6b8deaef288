use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::canvas::{self, Scale};
use super::ChartOptions;
use crate::analysis::CorrelationMatrix;
use crate::color::ColorScale;
use crate::data::model::Dataset;
use crate::error::{DataVisError, Result};

pub const FIGURE_SIZE: (f64, f64) = (10.0, 8.0);
const COLORBAR_STEPS: usize = 100;

/// Correlation matrix as an annotated diverging-colour grid.
pub fn render(dataset: &Dataset, path: &Path, opts: &ChartOptions) -> Result<()> {
    let matrix = CorrelationMatrix::compute(dataset)
        .map_err(|e| DataVisError::Render(format!("cannot build heatmap: {e}")))?;
    if matrix.is_empty() {
        return Err(DataVisError::Render("no numeric columns to correlate".into()));
    }

    canvas::render_png(path, FIGURE_SIZE, opts.dpi, |root, scale| {
        let body = root.titled("Correlation Matrix Heatmap", scale.bold(16.0))?;
        let (width, _) = body.dim_in_pixel();
        let (grid_area, bar_area) = body.split_horizontally(width as i32 * 85 / 100);
        let colors = ColorScale::coolwarm();
        draw_grid(&grid_area, &matrix, &colors, scale)?;
        draw_colorbar(&bar_area, &colors, scale)
    })
}

/// Position of `r` on the colour scale, centred on zero.
fn scale_position(r: f64) -> f64 {
    (r + 1.0) / 2.0
}

/// Plot coordinates of matrix cell `(row, col)`; row 0 is drawn at the top.
fn cell_center(n: usize, row: usize, col: usize) -> (f64, f64) {
    (col as f64, (n - 1 - row) as f64)
}

/// Inverse of the y half of [`cell_center`].
fn row_of(n: usize, y: f64) -> f64 {
    n as f64 - 1.0 - y
}

fn draw_grid<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    matrix: &CorrelationMatrix,
    colors: &ColorScale,
    scale: Scale,
) -> Result<()> {
    let n = matrix.len();
    // Cell (i, j) is centred on (j, n - 1 - i) so ticks land on cell centres.
    let span = -0.5..(n as f64 - 0.5);

    let mut chart = ChartBuilder::on(area)
        .margin(scale.px(10.0))
        .x_label_area_size(scale.px(36.0))
        .y_label_area_size(scale.px(64.0))
        .build_cartesian_2d(span.clone(), span)?;

    let names = &matrix.names;
    let column_name = |x: &f64| canvas::category_label(names, *x);
    let row_name = |y: &f64| canvas::category_label(names, row_of(n, *y));
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n)
        .y_labels(n)
        .x_label_formatter(&column_name)
        .y_label_formatter(&row_name)
        .label_style(scale.font(10.0))
        .draw()?;

    let cells = (0..n).flat_map(|i| (0..n).map(move |j| (i, j)));
    chart.draw_series(cells.clone().map(|(i, j)| {
        let r = matrix.values[i][j];
        let (x, y) = cell_center(n, i, j);
        let fill = if r.is_nan() {
            RGBColor(200, 200, 200)
        } else {
            colors.at(scale_position(r))
        };
        Rectangle::new([(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)], fill.filled())
    }))?;

    let font = scale.font(11.0);
    chart.draw_series(cells.map(|(i, j)| {
        let r = matrix.values[i][j];
        let ink = if r.abs() > 0.6 { &WHITE } else { &BLACK };
        let style = TextStyle::from(font.clone())
            .color(ink)
            .pos(Pos::new(HPos::Center, VPos::Center));
        let label = if r.is_nan() { "nan".to_string() } else { format!("{r:.2}") };
        Text::new(label, cell_center(n, i, j), style)
    }))?;
    Ok(())
}

fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    colors: &ColorScale,
    scale: Scale,
) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .margin_top(scale.px(24.0))
        .margin_bottom(scale.px(48.0))
        .margin_right(scale.px(8.0))
        .y_label_area_size(scale.px(36.0))
        .build_cartesian_2d(0.0..1.0, -1.0..1.0)?;

    let one_place = |y: &f64| format!("{y:.1}");
    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(9)
        .y_label_formatter(&one_place)
        .label_style(scale.font(9.0))
        .draw()?;

    let step = 2.0 / COLORBAR_STEPS as f64;
    chart.draw_series((0..COLORBAR_STEPS).map(|k| {
        let lo = -1.0 + k as f64 * step;
        let color = colors.at(scale_position(lo + step / 2.0));
        Rectangle::new([(0.0, lo), (1.0, lo + step)], color.filled())
    }))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_correlation_sits_mid_scale() {
        assert_eq!(scale_position(-1.0), 0.0);
        assert_eq!(scale_position(0.0), 0.5);
        assert_eq!(scale_position(1.0), 1.0);
    }

    #[test]
    fn first_row_is_drawn_on_top() {
        assert_eq!(cell_center(4, 0, 0), (0.0, 3.0));
        assert_eq!(cell_center(4, 3, 2), (2.0, 0.0));
        assert_eq!(row_of(4, 3.0), 0.0);

        let names = vec!["Sales".to_string(), "Profit".to_string()];
        assert_eq!(canvas::category_label(&names, row_of(2, 1.0)), "Sales");
        assert_eq!(canvas::category_label(&names, row_of(2, 0.5)), "");
    }
}
