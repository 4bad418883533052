//! Color scale for correlation coefficients.
//!
//! Rules are evaluated in order and the first match wins. The three point
//! rules come first so that exact `1`, `-1` and `0` never fall into a band.

use serde::{Deserialize, Serialize};

/// A 24-bit RGB color, e.g. `HexColor(0xFF4500)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexColor(pub u32);

impl HexColor {
    pub const BLACK: HexColor = HexColor(0x000000);

    /// `RRGGBB` in upper case.
    pub fn to_hex(self) -> String {
        format!("{:06X}", self.0)
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        )
    }
}

/// Value range matched by a [`ColorRule`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleBounds {
    /// Exactly this value
    Point(f64),
    /// `min < r <= max`
    RightClosed { min: f64, max: f64 },
    /// `min <= r < max`
    LeftClosed { min: f64, max: f64 },
}

impl RuleBounds {
    pub fn contains(&self, r: f64) -> bool {
        match *self {
            Self::Point(value) => r == value,
            Self::RightClosed { min, max } => min < r && r <= max,
            Self::LeftClosed { min, max } => min <= r && r < max,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRule {
    pub bounds: RuleBounds,
    pub color: HexColor,
}

const fn point(value: f64, color: u32) -> ColorRule {
    ColorRule {
        bounds: RuleBounds::Point(value),
        color: HexColor(color),
    }
}

const fn positive(min: f64, max: f64, color: u32) -> ColorRule {
    ColorRule {
        bounds: RuleBounds::RightClosed { min, max },
        color: HexColor(color),
    }
}

const fn negative(min: f64, max: f64, color: u32) -> ColorRule {
    ColorRule {
        bounds: RuleBounds::LeftClosed { min, max },
        color: HexColor(color),
    }
}

/// Ordered rule table: warm colors for positive, cool for negative.
pub const CORRELATION_COLOR_RULES: [ColorRule; 13] = [
    point(1.0, 0xFF0000),
    point(-1.0, 0x0000FF),
    point(0.0, 0xFFFFFF),
    positive(0.8, 1.0, 0xFF4500),
    positive(0.6, 0.8, 0xFF8C00),
    positive(0.4, 0.6, 0xFFFF00),
    positive(0.2, 0.4, 0xFFBC00),
    positive(0.0, 0.2, 0xFFFFE0),
    negative(-0.2, 0.0, 0xBCFFFF),
    negative(-0.4, -0.2, 0x00FFFF),
    negative(-0.6, -0.4, 0x25BEFF),
    negative(-0.8, -0.6, 0x0093D2),
    negative(-1.0, -0.8, 0x0080FF),
];

/// Color of a correlation coefficient. NaN and out-of-range values are black.
pub fn colorize(r: f64) -> HexColor {
    CORRELATION_COLOR_RULES
        .iter()
        .find(|rule| rule.bounds.contains(r))
        .map(|rule| rule.color)
        .unwrap_or(HexColor::BLACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_rules_win() {
        assert_eq!(colorize(1.0), HexColor(0xFF0000));
        assert_eq!(colorize(-1.0), HexColor(0x0000FF));
        assert_eq!(colorize(0.0), HexColor(0xFFFFFF));
        assert_eq!(colorize(-0.0), HexColor(0xFFFFFF));
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(colorize(0.8), HexColor(0xFF8C00));
        assert_eq!(colorize(0.85), HexColor(0xFF4500));
        assert_eq!(colorize(0.2), HexColor(0xFFFFE0));
        assert_eq!(colorize(0.5), HexColor(0xFFFF00));
        assert_eq!(colorize(-0.2), HexColor(0xBCFFFF));
        assert_eq!(colorize(-0.8), HexColor(0x0093D2));
        assert_eq!(colorize(-0.95), HexColor(0x0080FF));
    }

    #[test]
    fn test_every_valid_coefficient_is_colored() {
        for step in -1000..=1000 {
            let r = step as f64 / 1000.0;
            assert_ne!(colorize(r), HexColor::BLACK, "r = {r}");
        }
    }

    #[test]
    fn test_undefined_is_black() {
        assert_eq!(colorize(f64::NAN), HexColor::BLACK);
        assert_eq!(colorize(1.5), HexColor::BLACK);
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(HexColor(0x25BEFF).to_hex(), "25BEFF");
        assert_eq!(HexColor(0x0000FF).to_hex(), "0000FF");
        assert_eq!(HexColor(0x0093D2).rgb(), (0x00, 0x93, 0xD2));
    }
}
