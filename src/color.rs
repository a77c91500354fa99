use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};
use plotters::style::RGBColor;

use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Neutral colour for values missing from a [`ColorMap`].
pub const GRAY: RGBColor = RGBColor(128, 128, 128);

/// Fill used by the unsplit discreteness histograms.
pub const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);

fn to_rgb(rgb: Srgb) -> RGBColor {
    RGBColor(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = 220.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            to_rgb(hsl.into_color())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Diverging colormap for correlation heatmaps
// ---------------------------------------------------------------------------

/// Blue → light grey → red, mixed in linear RGB.
///
/// `t` is clamped to `[-1, 1]`; non-finite input maps to [`GRAY`].
pub fn cool_warm(t: f64) -> RGBColor {
    if !t.is_finite() {
        return GRAY;
    }
    let t = t.clamp(-1.0, 1.0) as f32;
    let cool: LinSrgb = Srgb::new(0.23f32, 0.30, 0.75).into_linear();
    let mid: LinSrgb = Srgb::new(0.87f32, 0.87, 0.87).into_linear();
    let warm: LinSrgb = Srgb::new(0.71f32, 0.02, 0.15).into_linear();
    let mixed = if t < 0.0 {
        mid.mix(cool, -t)
    } else {
        mid.mix(warm, t)
    };
    to_rgb(Srgb::from_linear(mixed))
}

// ---------------------------------------------------------------------------
// Color mapping: label value → RGBColor
// ---------------------------------------------------------------------------

/// Maps unique label values of a chosen column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: String,
    mapping: BTreeMap<CellValue, RGBColor>,
    default_color: RGBColor,
}

impl ColorMap {
    /// Build a colour map for the given column from its unique values.
    pub fn new<'a>(column: &str, unique_values: impl IntoIterator<Item = &'a CellValue>) -> Self {
        let values: Vec<&CellValue> = unique_values.into_iter().collect();
        let palette = generate_palette(values.len());
        let mapping: BTreeMap<CellValue, RGBColor> = values
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();

        ColorMap {
            column: column.to_string(),
            mapping,
            default_color: GRAY,
        }
    }

    /// Look up the colour for a given label value.
    pub fn color_for(&self, value: &CellValue) -> RGBColor {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}
