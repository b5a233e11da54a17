//! Symbols and symbol layers.
//!
//! A [`Symbol`] is an ordered stack of drawing primitives rendered
//! back-to-front; later layers draw on top. [`SymbolLayer`] is a closed
//! tagged union, so serializer dispatch is exhaustive.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::common::{RgbaColor, SizeUnit};

/// Pen stroke style of a line or outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PenStyle {
    /// No stroke at all
    NoPen,
    Solid,
    Dash,
    Dot,
    DashDot,
    DashDotDot,
    /// Custom dash vector; lengths are already in device units and pass
    /// through to the target pattern verbatim
    CustomDash(Vec<f64>),
}

impl PenStyle {
    /// Whether the style draws anything.
    #[inline]
    pub fn is_pen(&self) -> bool {
        !matches!(self, PenStyle::NoPen)
    }

    /// Whether the style is a non-solid, drawn pattern.
    #[inline]
    pub fn is_patterned(&self) -> bool {
        !matches!(self, PenStyle::NoPen | PenStyle::Solid)
    }
}

/// Line end cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PenCapStyle {
    Flat,
    Round,
    Square,
}

/// Line join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PenJoinStyle {
    Bevel,
    Miter,
    Round,
}

/// A stroked line primitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleLine {
    pub color: RgbaColor,
    pub pen_style: PenStyle,
    pub cap_style: PenCapStyle,
    pub join_style: PenJoinStyle,
    pub width: f64,
    pub width_unit: SizeUnit,
}

/// A filled polygon primitive with an optional border.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleFill {
    pub fill_color: RgbaColor,
    pub angle: f64,
    pub border_color: RgbaColor,
    pub border_style: PenStyle,
    pub border_width: f64,
    pub border_width_unit: SizeUnit,
}

/// A named vector marker primitive (`circle`, `rectangle`, `triangle`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleMarker {
    /// Well-known marker name; unknown names fall back to an ellipse
    pub name: String,
    pub size: f64,
    pub size_unit: SizeUnit,
    pub angle: f64,
    pub fill_color: RgbaColor,
    pub outline_color: RgbaColor,
    pub outline_style: PenStyle,
    pub outline_width: f64,
    pub outline_width_unit: SizeUnit,
}

/// A single glyph from a font, used as a marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontMarker {
    pub font_family: String,
    pub character: char,
    pub color: RgbaColor,
    pub size: f64,
    pub size_unit: SizeUnit,
}

/// An SVG file used as a marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvgMarker {
    pub path: PathBuf,
    pub size: f64,
    pub size_unit: SizeUnit,
}

/// A polygon fill made of parallel hatch lines drawn with a sub-symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinePatternFill {
    pub sub_symbol: Symbol,
    pub distance: f64,
    pub distance_unit: SizeUnit,
    pub line_angle: f64,
}

/// A polygon fill made of a regular grid of markers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointPatternFill {
    pub sub_symbol: Symbol,
    pub distance_x: f64,
    pub distance_x_unit: SizeUnit,
    pub distance_y: f64,
    pub distance_y_unit: SizeUnit,
    pub displacement_x: f64,
    pub displacement_x_unit: SizeUnit,
    pub displacement_y: f64,
    pub displacement_y_unit: SizeUnit,
}

/// One drawing primitive within a composite symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SymbolLayer {
    SimpleLine(SimpleLine),
    SimpleFill(SimpleFill),
    SimpleMarker(SimpleMarker),
    FontMarker(FontMarker),
    SvgMarker(SvgMarker),
    LinePatternFill(LinePatternFill),
    PointPatternFill(PointPatternFill),
}

impl SymbolLayer {
    /// Short kind name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SymbolLayer::SimpleLine(_) => "simple line",
            SymbolLayer::SimpleFill(_) => "simple fill",
            SymbolLayer::SimpleMarker(_) => "simple marker",
            SymbolLayer::FontMarker(_) => "font marker",
            SymbolLayer::SvgMarker(_) => "svg marker",
            SymbolLayer::LinePatternFill(_) => "line pattern fill",
            SymbolLayer::PointPatternFill(_) => "point pattern fill",
        }
    }
}

/// An ordered stack of symbol layers, rendered back-to-front.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Symbol {
    pub layers: Vec<SymbolLayer>,
}

impl Symbol {
    pub fn new(layers: Vec<SymbolLayer>) -> Self {
        Self { layers }
    }
}
