//! Source-side model: the layer, renderer, symbol and label description the
//! host GIS application hands to the exporter.
//!
//! Everything here is read-only input. A [`LayerDescriptor`] is constructed
//! once per export run from the host's live layer objects; connection
//! descriptors arrive pre-resolved from the host's data-provider layer.

mod label;
mod symbol;

pub use label::{LabelBinding, LabelPlacement, LabelSettings, Quadrant};
pub use symbol::{
    FontMarker, LinePatternFill, PenCapStyle, PenJoinStyle, PenStyle, PointPatternFill,
    SimpleFill, SimpleLine, SimpleMarker, SvgMarker, Symbol, SymbolLayer,
};

use serde::{Deserialize, Serialize};

use crate::mapfile::ConnectionType;

/// Rectangular extent in map coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

/// Geometry family of a drawable layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryKind {
    Raster,
    Point,
    Line,
    Polygon,
}

/// Scale-denominator visibility range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleRange {
    pub min_denom: f64,
    pub max_denom: f64,
}

/// Pre-resolved connection information for one layer.
///
/// Built by the host's data-provider layer (postgres/WMS/WFS/spatialite/OGR
/// connection-string construction happens there); the exporter copies these
/// fields onto the target layer without interpreting them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionDescriptor {
    /// Target connection type, when the provider maps onto one
    pub connection_type: Option<ConnectionType>,
    /// CONNECTION string (database DSN, WMS endpoint, ...)
    pub connection: Option<String>,
    /// DATA string (geometry column/table clause, file path, ...)
    pub data: Option<String>,
    /// Provider-specific metadata entries (e.g. `ows_name`, `wmsServer_version`)
    pub metadata: Vec<(String, String)>,
}

/// One exportable layer as handed over by the host application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerDescriptor {
    /// Layer name, also used as the base for class names
    pub name: String,
    /// Geometry family; `None` for providers without drawable geometry
    /// (such layers are skipped with a diagnostic)
    pub geometry: Option<GeometryKind>,
    /// Layer extent in map coordinates
    pub extent: Extent,
    /// Scale-based visibility range, when enabled on the layer
    pub scale_range: Option<ScaleRange>,
    /// Projection as a proj4 string
    pub projection: String,
    /// Authority identifier of the layer CRS (e.g. `EPSG:4326`)
    pub srs_authid: String,
    /// Whether the layer is checked visible in the host legend; the
    /// visibility lookup collaborator consults this by default
    pub visible: bool,
    /// Pre-resolved connection information
    pub connection: ConnectionDescriptor,
    /// Raster renderer opacity in `[0, 1]`, when the host exposes one
    pub opacity: Option<f64>,
    /// Legacy raster transparency in `[0, 255]`, used when `opacity` is absent
    pub legacy_transparency: Option<u8>,
    /// Vector renderer, absent on raster layers
    pub renderer: Option<Renderer>,
    /// Label configuration, when labeling is set up on the layer
    pub labeling: Option<LabelSettings>,
}

/// One category of a categorized renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Attribute value in its string form
    pub value: String,
    pub symbol: Symbol,
}

/// One range of a graduated renderer.
///
/// Ranges are contiguous and non-overlapping, sorted ascending. The first
/// range includes its lower bound, every later range excludes it, and every
/// range includes its upper bound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraduatedRange {
    pub lower: f64,
    pub upper: f64,
    pub symbol: Symbol,
}

/// Strategy selecting which symbol draws a given feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Renderer {
    /// Every feature drawn with the same symbol
    SingleSymbol { symbol: Symbol },
    /// One symbol per attribute value
    Categorized {
        attribute: String,
        categories: Vec<Category>,
    },
    /// One symbol per attribute value range
    Graduated {
        attribute: String,
        ranges: Vec<GraduatedRange>,
    },
}
