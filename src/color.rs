use std::str::FromStr;

use eframe::egui::Color32;
use palette::{Darken, Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Bar colours
// ---------------------------------------------------------------------------

/// Fill of the leading bar in every chart.
pub const HIGHLIGHT_HEX: &str = "#72BCD4";
/// Fill of every other bar.
pub const MUTED_HEX: &str = "#D3D3D3";

/// Parse `#rrggbb` (or `rrggbb`) into an egui colour.
pub fn hex_to_color32(hex: &str) -> Option<Color32> {
    let rgb = Srgb::<u8>::from_str(hex).ok()?;
    Some(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

/// Darken a colour in HSL space by `amount` (0.0 – 1.0).
pub fn darken(color: Color32, amount: f32) -> Color32 {
    let rgb: Srgb = Srgb::new(color.r(), color.g(), color.b()).into_format();
    let hsl: Hsl = rgb.into_color();
    let rgb: Srgb = hsl.darken(amount).into_color();
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Fill and outline colours for highlighted and muted bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarPalette {
    highlight: Color32,
    muted: Color32,
}

impl Default for BarPalette {
    fn default() -> Self {
        Self {
            highlight: hex_to_color32(HIGHLIGHT_HEX).unwrap_or(Color32::LIGHT_BLUE),
            muted: hex_to_color32(MUTED_HEX).unwrap_or(Color32::LIGHT_GRAY),
        }
    }
}

impl BarPalette {
    pub fn fill(&self, highlighted: bool) -> Color32 {
        if highlighted {
            self.highlight
        } else {
            self.muted
        }
    }

    pub fn outline(&self, highlighted: bool) -> Color32 {
        darken(self.fill(highlighted), 0.25)
    }
}
