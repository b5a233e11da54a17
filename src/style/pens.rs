//! Pen style, cap and join translation tables.

use crate::common::unit::mm_to_px;
use crate::mapfile::{CapStyle, JoinStyle};
use crate::model::{PenCapStyle, PenJoinStyle, PenStyle};

/// Width drawn for an outline whose configured width is zero but whose pen
/// style is still set. Source renderers draw a hairline of roughly one pixel
/// in that case.
pub const DEFAULT_OUTLINE_WIDTH: f64 = 1.0;

/// Dash patterns in millimeters, matching the tables SLD exporters use for
/// the named pen styles.
const DASH_MM: [f64; 2] = [4.0, 2.0];
const DOT_MM: [f64; 2] = [1.0, 2.0];
const DASH_DOT_MM: [f64; 4] = [4.0, 2.0, 1.0, 2.0];
const DASH_DOT_DOT_MM: [f64; 6] = [4.0, 2.0, 1.0, 2.0, 1.0, 2.0];

/// Dash pattern of a pen style, converted to pixels.
///
/// Custom dash vectors are already in device units and pass through
/// verbatim. Solid and no-pen styles have no pattern.
pub fn dash_pattern(style: &PenStyle) -> Option<Vec<f64>> {
    match style {
        PenStyle::NoPen | PenStyle::Solid => None,
        PenStyle::Dash => Some(DASH_MM.iter().map(|mm| mm_to_px(*mm)).collect()),
        PenStyle::Dot => Some(DOT_MM.iter().map(|mm| mm_to_px(*mm)).collect()),
        PenStyle::DashDot => Some(DASH_DOT_MM.iter().map(|mm| mm_to_px(*mm)).collect()),
        PenStyle::DashDotDot => Some(DASH_DOT_DOT_MM.iter().map(|mm| mm_to_px(*mm)).collect()),
        PenStyle::CustomDash(lengths) => Some(lengths.clone()),
    }
}

/// Map a pen cap onto the target cap keyword.
pub fn cap_style(cap: PenCapStyle) -> CapStyle {
    match cap {
        PenCapStyle::Flat => CapStyle::Butt,
        PenCapStyle::Round => CapStyle::Round,
        PenCapStyle::Square => CapStyle::Square,
    }
}

/// Map a pen join onto the target join keyword.
pub fn join_style(join: PenJoinStyle) -> JoinStyle {
    match join {
        PenJoinStyle::Bevel => JoinStyle::Bevel,
        PenJoinStyle::Miter => JoinStyle::Miter,
        PenJoinStyle::Round => JoinStyle::Round,
    }
}
