//! Shared chart styling: embedded font, palette and axis helpers.

use crate::error::{AnalysisError, Result};
use once_cell::sync::Lazy;
use plotters::style::{FontStyle, RGBColor, register_font};
use std::ops::Range;
use tracing::warn;

/// Family every chart text uses. Registered from the embedded font.
pub(crate) const FONT_FAMILY: &str = "sans-serif";

pub(crate) const TITLE_FONT_SIZE: u32 = 28;
pub(crate) const LABEL_FONT_SIZE: u32 = 18;

const FONT_BYTES: &[u8] = include_bytes!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/DejaVuSans.ttf"
));

static FONT_REGISTERED: Lazy<bool> = Lazy::new(|| {
    match register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES) {
        Ok(()) => true,
        // InvalidFont carries no detail to report
        Err(_) => {
            warn!("Embedded chart font rejected by the font parser");
            false
        }
    }
});

/// Register the embedded font once per process.
pub(crate) fn ensure_font() -> Result<()> {
    if *FONT_REGISTERED {
        Ok(())
    } else {
        Err(AnalysisError::Render(
            "embedded chart font could not be loaded".to_string(),
        ))
    }
}

/// ColorBrewer Set1, the qualitative palette used for category series.
pub(crate) const SET1: [RGBColor; 9] = [
    RGBColor(0xE4, 0x1A, 0x1C),
    RGBColor(0x37, 0x7E, 0xB8),
    RGBColor(0x4D, 0xAF, 0x4A),
    RGBColor(0x98, 0x4E, 0xA3),
    RGBColor(0xFF, 0x7F, 0x00),
    RGBColor(0xFF, 0xFF, 0x33),
    RGBColor(0xA6, 0x56, 0x28),
    RGBColor(0xF7, 0x81, 0xBF),
    RGBColor(0x99, 0x99, 0x99),
];

/// Palette color for the `idx`-th series, cycling.
pub(crate) fn palette_color(idx: usize) -> RGBColor {
    SET1[idx % SET1.len()]
}

/// Axis range covering `values` with a 5% margin on each side.
pub(crate) fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if !lo.is_finite() {
        return 0.0..1.0;
    }
    if lo == hi {
        return (lo - 0.5)..(hi + 0.5);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad)..(hi + pad)
}
