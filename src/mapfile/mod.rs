//! Target-side model: the in-memory mirror of the emitted mapfile.
//!
//! The aggregate is plain data owned by the crate; [`writer`] renders it to
//! mapfile text.

pub mod writer;

use serde::{Deserialize, Serialize};

use crate::common::{RgbaColor, id::symbol_name};
use crate::model::Extent;

/// Map-level coordinate units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapUnits {
    DecimalDegrees,
    Meters,
    Feet,
}

impl MapUnits {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            MapUnits::DecimalDegrees => "DD",
            MapUnits::Meters => "METERS",
            MapUnits::Feet => "FEET",
        }
    }
}

/// Layer drawing type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerType {
    Raster,
    Point,
    Line,
    Polygon,
}

impl LayerType {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            LayerType::Raster => "RASTER",
            LayerType::Point => "POINT",
            LayerType::Line => "LINE",
            LayerType::Polygon => "POLYGON",
        }
    }
}

/// ON/OFF toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    On,
    Off,
}

impl From<bool> for Status {
    fn from(on: bool) -> Self {
        if on { Status::On } else { Status::Off }
    }
}

impl Status {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            Status::On => "ON",
            Status::Off => "OFF",
        }
    }
}

/// Connection type of a layer's data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionType {
    Postgis,
    Wms,
    Ogr,
}

impl ConnectionType {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            ConnectionType::Postgis => "POSTGIS",
            ConnectionType::Wms => "WMS",
            ConnectionType::Ogr => "OGR",
        }
    }
}

/// Line cap keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapStyle {
    Butt,
    Round,
    Square,
}

impl CapStyle {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            CapStyle::Butt => "BUTT",
            CapStyle::Round => "ROUND",
            CapStyle::Square => "SQUARE",
        }
    }
}

/// Line join keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinStyle {
    Bevel,
    Miter,
    Round,
}

impl JoinStyle {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            JoinStyle::Bevel => "BEVEL",
            JoinStyle::Miter => "MITER",
            JoinStyle::Round => "ROUND",
        }
    }
}

/// Label anchor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelPosition {
    Auto,
    UpperLeft,
    UpperCenter,
    UpperRight,
    CenterLeft,
    CenterCenter,
    CenterRight,
    LowerLeft,
    LowerCenter,
    LowerRight,
}

impl LabelPosition {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            LabelPosition::Auto => "AUTO",
            LabelPosition::UpperLeft => "UL",
            LabelPosition::UpperCenter => "UC",
            LabelPosition::UpperRight => "UR",
            LabelPosition::CenterLeft => "CL",
            LabelPosition::CenterCenter => "CC",
            LabelPosition::CenterRight => "CR",
            LabelPosition::LowerLeft => "LL",
            LabelPosition::LowerCenter => "LC",
            LabelPosition::LowerRight => "LR",
        }
    }
}

/// Unit mode style sizes on a layer are interpreted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeUnits {
    Pixels,
    MapUnits,
}

impl SizeUnits {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            SizeUnits::Pixels => "PIXELS",
            SizeUnits::MapUnits => "MAPUNITS",
        }
    }
}

/// Symbol kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolKind {
    Vector,
    Ellipse,
    Hatch,
    Truetype,
    Svg,
    Pixmap,
}

impl SymbolKind {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            SymbolKind::Vector => "VECTOR",
            SymbolKind::Ellipse => "ELLIPSE",
            SymbolKind::Hatch => "HATCH",
            SymbolKind::Truetype => "TRUETYPE",
            SymbolKind::Svg => "SVG",
            SymbolKind::Pixmap => "PIXMAP",
        }
    }
}

/// One inline symbol definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetSymbol {
    /// Unique within the document's symbol set
    pub name: String,
    pub kind: Option<SymbolKind>,
    /// Vector/ellipse geometry, including `(-99, 99)` pen-up sentinels
    pub points: Vec<(f64, f64)>,
    pub filled: bool,
    /// Truetype font name
    pub font: Option<String>,
    /// Truetype glyph
    pub character: Option<char>,
    /// Image path for svg/pixmap symbols
    pub image: Option<String>,
    pub anchor_point: Option<(f64, f64)>,
}

impl TargetSymbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind: Some(kind),
            ..Self::default()
        }
    }
}

/// The document's symbol set.
///
/// The hatch symbol is a per-document singleton: HATCH symbols carry no
/// attributes beyond name and type, so one instance serves every hatch
/// style. It is created lazily on first request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolSet {
    symbols: Vec<TargetSymbol>,
    hatch_name: Option<String>,
}

impl SymbolSet {
    /// Append a symbol and return its name.
    pub fn push(&mut self, symbol: TargetSymbol) -> String {
        let name = symbol.name.clone();
        self.symbols.push(symbol);
        name
    }

    /// Name of the singleton hatch symbol, creating it on first use.
    pub fn hatch_symbol_name(&mut self) -> String {
        match &self.hatch_name {
            Some(name) => name.clone(),
            None => {
                let sym = TargetSymbol::new(symbol_name("hatch"), SymbolKind::Hatch);
                let name = self.push(sym);
                self.hatch_name = Some(name.clone());
                name
            },
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TargetSymbol> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// How a label's angle is determined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LabelAngle {
    Fixed(f64),
    /// Angle bound to a feature attribute
    Binding(String),
}

/// One label definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetLabel {
    /// Font name as known to the fontset; omitted when no fontset is in play
    pub font: Option<String>,
    pub size: u32,
    pub color: RgbaColor,
    pub position: LabelPosition,
    pub offset: (i32, i32),
    pub angle: LabelAngle,
    pub min_size: Option<u32>,
    pub max_size: Option<u32>,
    pub wrap: Option<char>,
    pub priority: i32,
    pub force: bool,
    pub partials: bool,
    pub buffer: i32,
    pub min_feature_size: Option<f64>,
}

/// One style entry of a class.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetStyle {
    /// Reference into the document symbol set
    pub symbol: Option<String>,
    pub color: Option<RgbaColor>,
    pub outline_color: Option<RgbaColor>,
    /// Integer 0-100 opacity percentage
    pub opacity: Option<u8>,
    pub width: Option<f64>,
    pub size: Option<f64>,
    pub angle: Option<f64>,
    pub gap: Option<f64>,
    /// Dash pattern lengths in pixels
    pub pattern: Option<Vec<f64>>,
    pub line_cap: Option<CapStyle>,
    pub line_join: Option<JoinStyle>,
}

impl TargetStyle {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A grouping of styles with an optional filter expression and label.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetClass {
    pub name: String,
    /// Filter expression in mapfile expression syntax, emitted verbatim
    pub expression: Option<String>,
    pub styles: Vec<TargetStyle>,
    pub label: Option<TargetLabel>,
}

impl TargetClass {
    pub fn new() -> Self {
        Self::default()
    }
}

/// One LAYER block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetLayer {
    pub name: String,
    pub layer_type: LayerType,
    pub status: Status,
    pub extent: Option<Extent>,
    pub min_scale_denom: Option<f64>,
    pub max_scale_denom: Option<f64>,
    /// Attribute the layer's labels read their text from
    pub label_item: Option<String>,
    pub label_min_scale_denom: Option<f64>,
    pub label_max_scale_denom: Option<f64>,
    pub size_units: SizeUnits,
    size_units_locked: bool,
    /// Integer 0-100 layer opacity (raster layers)
    pub opacity: Option<u8>,
    pub connection_type: Option<ConnectionType>,
    pub connection: Option<String>,
    pub data: Option<String>,
    pub projection: Option<String>,
    pub metadata: Vec<(String, String)>,
    pub classes: Vec<TargetClass>,
}

impl TargetLayer {
    pub fn new(name: impl Into<String>, layer_type: LayerType) -> Self {
        Self {
            name: name.into(),
            layer_type,
            status: Status::On,
            extent: None,
            min_scale_denom: None,
            max_scale_denom: None,
            label_item: None,
            label_min_scale_denom: None,
            label_max_scale_denom: None,
            size_units: SizeUnits::Pixels,
            size_units_locked: false,
            opacity: None,
            connection_type: None,
            connection: None,
            data: None,
            projection: None,
            metadata: Vec::new(),
            classes: Vec::new(),
        }
    }

    /// Flip the layer to map-unit sizes when `unit` is the map unit.
    ///
    /// First qualifying style wins and the mode never flips back. SIZEUNITS
    /// is a layer-wide setting, so styles on the same layer that use other
    /// units are not individually convertible once this is set.
    pub fn maybe_use_map_units(&mut self, unit: crate::common::SizeUnit) {
        if self.size_units_locked {
            return;
        }
        if unit == crate::common::SizeUnit::MapUnit {
            self.size_units = SizeUnits::MapUnits;
            self.size_units_locked = true;
        }
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.push((key.into(), value.into()));
    }
}

/// WEB block fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebConfig {
    pub image_path: String,
    pub image_url: String,
    pub temp_path: String,
    pub template: String,
    pub header: String,
    pub footer: String,
    /// VALIDATION entries (key, pattern)
    pub validation: Vec<(String, String)>,
}

/// The whole document before serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetMap {
    pub name: String,
    pub status: Status,
    pub size: Option<(u32, u32)>,
    pub units: MapUnits,
    pub extent: Extent,
    pub projection: String,
    pub shape_path: Option<String>,
    pub image_color: RgbaColor,
    pub image_type: String,
    pub output_transparent: bool,
    pub web: WebConfig,
    /// WEB METADATA entries, in insertion order
    pub metadata: Vec<(String, String)>,
    pub symbols: SymbolSet,
    pub layers: Vec<TargetLayer>,
}

impl TargetMap {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: Status::On,
            size: None,
            units: MapUnits::Meters,
            extent: Extent::default(),
            projection: String::new(),
            shape_path: None,
            image_color: RgbaColor::rgb(255, 255, 255),
            image_type: "PNG".to_string(),
            output_transparent: false,
            web: WebConfig::default(),
            metadata: Vec::new(),
            symbols: SymbolSet::default(),
            layers: Vec::new(),
        }
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.push((key.into(), value.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::SizeUnit;

    #[test]
    fn hatch_symbol_is_a_singleton() {
        let mut set = SymbolSet::default();
        let first = set.hatch_symbol_name();
        let second = set.hatch_symbol_name();
        assert_eq!(first, second);
        assert_eq!(set.len(), 1);
        assert!(first.starts_with("hatch_"));
    }

    #[test]
    fn size_units_set_once() {
        let mut layer = TargetLayer::new("roads", LayerType::Line);
        assert_eq!(layer.size_units, SizeUnits::Pixels);

        layer.maybe_use_map_units(SizeUnit::Millimeter);
        assert_eq!(layer.size_units, SizeUnits::Pixels);

        layer.maybe_use_map_units(SizeUnit::MapUnit);
        assert_eq!(layer.size_units, SizeUnits::MapUnits);

        // later styles cannot flip the mode back
        layer.maybe_use_map_units(SizeUnit::Millimeter);
        assert_eq!(layer.size_units, SizeUnits::MapUnits);
    }
}
