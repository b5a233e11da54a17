//! Label configuration of a source layer.

use serde::{Deserialize, Serialize};

use crate::common::{RgbaColor, SizeUnit};

/// What the label text is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelBinding {
    /// Label text comes from a feature attribute
    Field(String),
    /// Label text comes from an expression; the target format has no
    /// equivalent, so these are skipped with a diagnostic
    Expression(String),
}

/// One of the nine relative placement directions around a point feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quadrant {
    AboveLeft,
    Above,
    AboveRight,
    Left,
    Over,
    Right,
    BelowLeft,
    Below,
    BelowRight,
}

/// Label placement mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelPlacement {
    /// Let the renderer pick the best position around the feature
    AroundPoint,
    /// Fixed quadrant relative to the feature
    OverPoint(Quadrant),
}

/// Label settings of one source layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelSettings {
    pub binding: LabelBinding,
    pub placement: LabelPlacement,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Attribute carrying a per-feature rotation angle; when set the target
    /// label's angle is bound to this field instead of `angle_offset`
    pub rotation_field: Option<String>,
    pub angle_offset: f64,
    /// Minimum visible scale denominator; zero means unset
    pub scale_min: f64,
    /// Maximum visible scale denominator; zero means unset
    pub scale_max: f64,
    pub font_family: String,
    /// Named font style (e.g. `Bold Italic`); `*` means any
    pub font_named_style: String,
    /// Resolved pixel height of the label font, computed by the host's font
    /// metrics (no font engine is in scope here)
    pub font_pixel_size: u32,
    pub font_size_in_map_units: bool,
    pub color: RgbaColor,
    pub limit_pixel_size: bool,
    pub min_pixel_size: u32,
    pub max_pixel_size: u32,
    /// Wrap character; must be exactly one character to take effect
    pub wrap_char: String,
    pub priority: i32,
    /// Render every label even when colliding
    pub display_all: bool,
    pub buffer_size: f64,
    pub buffer_size_unit: SizeUnit,
    /// Minimum feature size in millimeters; zero means unset
    pub min_feature_size: f64,
}
