//! Color definitions and HSV shading for map rendering

use image::Rgba;
use serde::{Deserialize, Serialize};

/// 8-bit RGBA color
///
/// Serialized as a `#rrggbb` (opaque) or `#rrggbbaa` string. That string is
/// also the color's identity in attack-overlay requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Same value as `Qt::gray`
    pub const GRAY: Color = Color::rgb(0xa0, 0xa0, 0xa4);
    pub const GREEN: Color = Color::rgb(0, 0xff, 0);
    pub const RED: Color = Color::rgb(0xff, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`
    pub fn from_hex(text: &str) -> Option<Self> {
        let hex = text.strip_prefix('#')?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// `#rrggbb` name, alpha ignored
    pub fn name(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_rgba(&self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }

    /// Darker color; `factor` is a percentage (200 halves the HSV value)
    ///
    /// Factors below 100 lighten instead, and 0 leaves the color unchanged.
    pub fn darker(&self, factor: u32) -> Self {
        if factor == 0 {
            return *self;
        }
        if factor < 100 {
            return self.lighter(10_000 / factor);
        }
        let (h, s, v) = self.to_hsv();
        Self::from_hsv(h, s, v * 100.0 / factor as f32, self.a)
    }

    /// Lighter color; `factor` is a percentage (150 raises HSV value by half)
    ///
    /// Value overflowing the channel range is taken out of saturation, so
    /// saturated colors wash toward white.
    pub fn lighter(&self, factor: u32) -> Self {
        if factor == 0 {
            return *self;
        }
        if factor < 100 {
            return self.darker(10_000 / factor);
        }
        let (h, mut s, mut v) = self.to_hsv();
        v = v * factor as f32 / 100.0;
        if v > 255.0 {
            s = (s - (v - 255.0)).max(0.0);
            v = 255.0;
        }
        Self::from_hsv(h, s, v, self.a)
    }

    /// Hue in degrees, saturation and value on a 0..=255 scale
    fn to_hsv(self) -> (f32, f32, f32) {
        let r = self.r as f32;
        let g = self.g as f32;
        let b = self.b as f32;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let s = if max > 0.0 { delta / max * 255.0 } else { 0.0 };
        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        (h, s, max)
    }

    fn from_hsv(h: f32, s: f32, v: f32, a: u8) -> Self {
        let chroma = v * s / 255.0;
        let sector = h / 60.0;
        let x = chroma * (1.0 - (sector.rem_euclid(2.0) - 1.0).abs());
        let (r, g, b) = match sector as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = v - chroma;
        let channel = |c: f32| (c + m).round().clamp(0.0, 255.0) as u8;
        Self::rgba(channel(r), channel(g), channel(b), a)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.a == 0xff {
            write!(f, "{}", self.name())
        } else {
            write!(f, "{}{:02x}", self.name(), self.a)
        }
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid color '{}', expected #rrggbb", value))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Fill for unclaimed map pixels
pub const BACKGROUND: Color = Color::WHITE;

/// Neutral player color: `GRAY.darker(200)`
pub const NEUTRAL: Color = Color::rgb(0x50, 0x50, 0x52);
