use palette::{FromColor, Lab, Srgb, Xyz};
use serde::{Deserialize, Serialize};

/// Display color used when a chart carries no expected-color table at all.
pub const FALLBACK_COLOR: &str = "#FFFFFF";

/// Color space the expected patch values are expressed in before conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColorSpace {
    #[default]
    Xyz,
    Lab,
}

/// Convert an expected-color triple into display RGB on the 0–255 scale.
///
/// The triple is expected pre-scaled by 1/100, as stored by the chart
/// parser. Out-of-gamut results are not clamped here; clamping happens at
/// display-string formatting.
pub fn convert_to_rgb(space: ColorSpace, triple: [f32; 3]) -> [f32; 3] {
    let srgb = match space {
        ColorSpace::Xyz => Srgb::from_color(Xyz::new(triple[0], triple[1], triple[2])),
        ColorSpace::Lab => Srgb::from_color(Lab::new(triple[0], triple[1], triple[2])),
    };
    [srgb.red * 255.0, srgb.green * 255.0, srgb.blue * 255.0]
}

/// Format an RGB triple as a `#RRGGBB` display string, clamping each
/// channel to `[0, 255]`.
pub fn hex_color(rgb: [f32; 3]) -> String {
    let r = rgb[0].clamp(0.0, 255.0) as u8;
    let g = rgb[1].clamp(0.0, 255.0) as u8;
    let b = rgb[2].clamp(0.0, 255.0) as u8;
    format!("#{r:02X}{g:02X}{b:02X}")
}
