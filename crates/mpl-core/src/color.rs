// ABOUTME: Color representation and conversion utilities.
// ABOUTME: Supports RGBA, hex string parsing, and entity accent handling.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Default accent when an entity color fails to parse
    pub const ACCENT: Self = Self::rgb(0.0, 0.957, 1.0);

    /// Near-black page background
    pub const BACKGROUND: Self = Self::rgb(0.039, 0.039, 0.039);

    /// Boot terminal green
    pub const TERMINAL_GREEN: Self = Self::rgb(0.29, 0.87, 0.5);

    /// Parse a `#rrggbb` hex string
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::rgb(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
        ))
    }

    /// Parse a hex string, falling back to the default accent.
    /// Render paths never fail on a bad color.
    pub fn from_hex_or_accent(hex: &str) -> Self {
        Self::from_hex(hex).unwrap_or(Self::ACCENT)
    }

    pub fn to_hex(self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Dimmed variant at 60% brightness
    pub fn dim(self) -> Self {
        Self {
            r: self.r * 0.6,
            g: self.g * 0.6,
            b: self.b * 0.6,
            a: self.a,
        }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a)]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::ACCENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let color = Color::from_hex("#9b59ff").unwrap();
        assert_eq!(color.to_hex(), "#9b59ff");
    }

    #[test]
    fn test_hex_without_hash() {
        assert!(Color::from_hex("00f4ff").is_some());
    }

    #[test]
    fn test_bad_hex_falls_back() {
        assert_eq!(Color::from_hex_or_accent("nope"), Color::ACCENT);
        assert_eq!(Color::from_hex_or_accent("#12345"), Color::ACCENT);
        assert!(Color::from_hex("#zzzzzz").is_none());
    }

    #[test]
    fn test_dim_scales_rgb_only() {
        let dimmed = Color::rgba(1.0, 0.5, 0.0, 0.8).dim();
        assert_eq!(dimmed.r, 0.6);
        assert_eq!(dimmed.a, 0.8);
    }
}
