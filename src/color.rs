use palette::{Hsl, IntoColor, Lab, Mix, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_rgb(rgb)
        })
        .collect()
}

fn to_rgb(c: Srgb) -> RGBColor {
    let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    RGBColor(byte(c.red), byte(c.green), byte(c.blue))
}

fn hex(rgb: u32) -> Lab {
    let srgb = Srgb::new(
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
    );
    srgb.into_color()
}

// ---------------------------------------------------------------------------
// Continuous colour scales: value → colour
// ---------------------------------------------------------------------------

/// Piecewise interpolation between evenly spaced anchor colours, in Lab
/// space so steps look even.
#[derive(Debug, Clone)]
pub struct ColorScale {
    anchors: Vec<Lab>,
}

impl ColorScale {
    fn from_hex(anchors: &[u32]) -> Self {
        ColorScale {
            anchors: anchors.iter().map(|&h| hex(h)).collect(),
        }
    }

    /// Sequential purple → yellow.
    pub fn viridis() -> Self {
        Self::from_hex(&[0x440154, 0x3b528b, 0x21918c, 0x5ec962, 0xfde725])
    }

    /// Sequential blue → yellow through magenta.
    pub fn plasma() -> Self {
        Self::from_hex(&[0x0d0887, 0x7e03a8, 0xcc4778, 0xf89540, 0xf0f921])
    }

    /// Diverging blue → grey → red.
    pub fn coolwarm() -> Self {
        Self::from_hex(&[0x3b4cc0, 0xdddcdc, 0xb40426])
    }

    /// Colour at position `t` in `[0, 1]`. Out-of-range and NaN clamp to the ends.
    pub fn at(&self, t: f64) -> RGBColor {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) } as f32;
        let segments = self.anchors.len().saturating_sub(1);
        if segments == 0 {
            return self.anchors.first().map_or(RGBColor(128, 128, 128), |&c| lab_to_rgb(c));
        }
        let pos = t * segments as f32;
        let idx = (pos.floor() as usize).min(segments - 1);
        let local = pos - idx as f32;
        lab_to_rgb(self.anchors[idx].mix(self.anchors[idx + 1], local))
    }

    /// Colour for `value` on a linear scale from `lo` to `hi`.
    pub fn map(&self, value: f64, lo: f64, hi: f64) -> RGBColor {
        if hi <= lo {
            return self.at(0.5);
        }
        self.at((value - lo) / (hi - lo))
    }
}

fn lab_to_rgb(c: Lab) -> RGBColor {
    let rgb: Srgb = c.into_color();
    to_rgb(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        assert_ne!(p[0], p[1]);
    }

    #[test]
    fn scale_ends_match_anchors() {
        let s = ColorScale::coolwarm();
        let RGBColor(r, g, b) = s.at(0.0);
        assert!((r as i32 - 0x3b).abs() <= 1 && (g as i32 - 0x4c).abs() <= 1 && (b as i32 - 0xc0).abs() <= 1);
        let RGBColor(r, _, b) = s.at(1.0);
        assert!(r > 150 && b < 60);
    }

    #[test]
    fn map_clamps_and_handles_flat_range() {
        let s = ColorScale::viridis();
        assert_eq!(s.map(-5.0, 0.0, 1.0), s.at(0.0));
        assert_eq!(s.map(3.0, 2.0, 2.0), s.at(0.5));
        assert_eq!(s.at(f64::NAN), s.at(0.0));
    }
}
