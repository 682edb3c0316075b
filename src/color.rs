use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An RGBA color with premultiplied components in `0.0..=1.0`.
///
/// An alpha of zero with non-zero color channels is an additive tint: it
/// brightens whatever is underneath instead of covering it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(value: &str) -> Result<Self> {
        let hex = value.trim().trim_start_matches('#');
        if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
            return Err(Error::InvalidColor(value.to_string()));
        }

        let channel = |idx: usize| -> Result<f32> {
            u8::from_str_radix(&hex[idx..idx + 2], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| Error::InvalidColor(value.to_string()))
        };

        let alpha = if hex.len() == 8 { channel(6)? } else { 1.0 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, alpha))
    }

    /// Multiply every color channel by `factor`, replacing alpha.
    pub fn faded(self, factor: f32, alpha: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor, alpha)
    }

    pub fn is_additive(&self) -> bool {
        self.a <= 0.0
    }

    /// `#rrggbb` of the color channels, ignoring alpha.
    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}
