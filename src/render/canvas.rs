use std::fs::File;
use std::io::BufWriter;
use std::ops::Range;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::{DataVisError, Result};

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for DataVisError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        DataVisError::render(err)
    }
}

/// Converts typographic sizes to pixels for a given resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub dpi: u32,
}

impl Scale {
    /// Points (1/72 inch) to pixels.
    pub fn pt(&self, points: f64) -> f64 {
        points * self.dpi as f64 / 72.0
    }

    pub fn px(&self, points: f64) -> u32 {
        self.pt(points).round().max(1.0) as u32
    }

    pub fn font(&self, points: f64) -> FontDesc<'static> {
        ("sans-serif", self.pt(points)).into_font()
    }

    pub fn bold(&self, points: f64) -> FontDesc<'static> {
        self.font(points).style(FontStyle::Bold)
    }
}

/// Physical density stored in the PNG `pHYs` chunk.
pub fn pixels_per_meter(dpi: u32) -> u32 {
    (dpi as f64 / 0.0254).round() as u32
}

/// Draw a `width × height` inch figure at `dpi` and write it as PNG.
///
/// The figure is rendered into an in-memory RGB buffer and encoded with the
/// density recorded, so print tools see the requested dpi.
pub fn render_png<F>(path: &Path, size_in: (f64, f64), dpi: u32, draw: F) -> Result<()>
where
    F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>, Scale) -> Result<()>,
{
    let width = (size_in.0 * dpi as f64).round() as u32;
    let height = (size_in.1 * dpi as f64).round() as u32;
    if width == 0 || height == 0 {
        return Err(DataVisError::Render(format!(
            "figure size {width}x{height} px is empty"
        )));
    }

    let mut buffer = vec![255u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root, Scale { dpi })?;
        root.present()?;
    }

    let image = image::RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| DataVisError::Render("pixel buffer has the wrong size".into()))?;
    write_png(path, &image, dpi)?;
    log::debug!("Wrote {width}x{height} px PNG to {}", path.display());
    Ok(())
}

fn write_png(path: &Path, image: &image::RgbImage, dpi: u32) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    let mut encoder = png::Encoder::new(file, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let ppm = pixels_per_meter(dpi);
    encoder.set_pixel_dims(Some(png::PixelDimensions {
        xppu: ppm,
        yppu: ppm,
        unit: png::Unit::Meter,
    }));
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())?;
    writer.finish()?;
    Ok(())
}

/// Value range with a margin on both sides; flat or empty input still
/// yields a usable non-empty range.
pub fn padded_range(values: impl IntoIterator<Item = f64>, pad: f64) -> Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() {
        return 0.0..1.0;
    }
    if lo == hi {
        let half = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
        return (lo - half)..(hi + half);
    }
    let margin = (hi - lo) * pad;
    (lo - margin)..(hi + margin)
}

/// Label for a category axis tick at `x`, empty between categories.
pub fn category_label(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Whole-dollar amount with thousands separators, e.g. `$12,340`.
pub fn money(value: f64) -> String {
    format!("${}", thousands(value))
}

/// Rounded to a whole number with thousands separators.
pub fn thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0.0 {
        out.insert(0, '-');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_scale_with_dpi() {
        let s = Scale { dpi: 144 };
        assert_eq!(s.pt(36.0), 72.0);
        assert_eq!(s.px(0.1), 1);
    }

    #[test]
    fn padded_range_handles_flat_and_empty() {
        assert_eq!(padded_range([0.0, 10.0], 0.1), -1.0..11.0);
        assert_eq!(padded_range([5.0, 5.0], 0.1), 4.5..5.5);
        assert_eq!(padded_range([0.0], 0.1), -1.0..1.0);
        assert_eq!(padded_range(Vec::<f64>::new(), 0.1), 0.0..1.0);
    }

    #[test]
    fn category_labels_only_on_integers() {
        let labels = vec!["Jan".to_string(), "Feb".to_string()];
        assert_eq!(category_label(&labels, 1.0), "Feb");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(thousands(0.0), "0");
        assert_eq!(thousands(999.0), "999");
        assert_eq!(thousands(1234.4), "1,234");
        assert_eq!(thousands(1_234_567.0), "1,234,567");
        assert_eq!(money(-2500.0), "$-2,500");
    }

    #[test]
    fn huge_amounts_keep_every_digit() {
        assert_eq!(thousands(1e20), "100,000,000,000,000,000,000");
        assert_eq!(money(-3e19), "$-30,000,000,000,000,000,000");
        assert_eq!(thousands(f64::NAN), "NaN");
    }

    #[test]
    fn density_round_trips_through_the_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("blank.png");
        render_png(&path, (0.5, 0.25), 300, |_, _| Ok(())).expect("render");

        let decoder = png::Decoder::new(File::open(&path).expect("open"));
        let reader = decoder.read_info().expect("png header");
        let info = reader.info();
        assert_eq!((info.width, info.height), (150, 75));
        let dims = info.pixel_dims.expect("pHYs chunk");
        assert_eq!(dims.xppu, 11811);
        assert_eq!(dims.yppu, 11811);
        assert!(matches!(dims.unit, png::Unit::Meter));
        assert_eq!((dims.xppu as f64 * 0.0254).round(), 300.0);
    }
}
