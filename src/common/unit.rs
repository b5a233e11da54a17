//! Size-unit conversion utilities.
//!
//! MapServer style properties are emitted in pixels under a fixed 72 dpi
//! display assumption, matching what a standard desktop canvas renders.

use serde::{Deserialize, Serialize};

/// Pixels per millimeter at 72 dpi.
pub const PX_PER_MM: f64 = 3.779527559;

/// Pixels per point (1/72 inch) on a 96 dpi raster.
pub const PX_PER_PT: f64 = 96.0 / 72.0;

/// Units a source style size can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeUnit {
    /// Millimeter
    Millimeter,
    /// Point (1/72 inch)
    Point,
    /// Device pixel
    Pixel,
    /// Ground units of the map projection
    MapUnit,
}

/// Convert millimeters to pixels.
#[inline]
pub fn mm_to_px(mm: f64) -> f64 {
    mm * PX_PER_MM
}

/// Convert points to pixels.
#[inline]
pub fn pt_to_px(pt: f64) -> f64 {
    pt * PX_PER_PT
}

/// Convert a size to target pixels.
///
/// Map-unit sizes pass through unconverted: the consuming style is expected
/// to flip the owning layer's size-unit mode to map units instead (see
/// [`crate::mapfile::TargetLayer::maybe_use_map_units`]).
#[inline]
pub fn to_pixels(value: f64, unit: SizeUnit) -> f64 {
    match unit {
        SizeUnit::Millimeter => mm_to_px(value),
        SizeUnit::Point => pt_to_px(value),
        SizeUnit::Pixel | SizeUnit::MapUnit => value,
    }
}
