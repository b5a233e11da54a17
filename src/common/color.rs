//! RGBA color representation and mapfile encodings.

use serde::{Deserialize, Serialize};

/// RGBA color value.
///
/// Mapfile attributes consume this in three shapes: a plain RGB triple
/// (`COLOR r g b`), a 0-255 alpha channel, and a 0-100 integer opacity
/// percentage (`OPACITY`). The triple is emitted by the mapfile writer;
/// the two alpha encodings are exposed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbaColor {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
    /// Alpha component (0-255, 255 = opaque)
    pub a: u8,
}

impl RgbaColor {
    /// Create a new RGBA color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// The RGB triple, dropping alpha.
    #[inline]
    pub const fn triple(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Alpha scaled to an integer 0-100 opacity percentage.
    #[inline]
    pub fn opacity_percent(&self) -> u8 {
        ((self.a as f64 / 255.0) * 100.0).round() as u8
    }

    /// Whether the color is fully transparent.
    #[inline]
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

impl Default for RgbaColor {
    fn default() -> Self {
        Self::rgb(0, 0, 0)
    }
}
