//! Whole-run export orchestration.
//!
//! Builds the target map from an [`ExportConfig`] and the caller's layer
//! descriptors, drives the renderer and label serializers per layer, saves
//! the mapfile, and hands the saved file to the textual post-processing
//! pass.

pub mod postprocess;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::common::{Diagnostics, Result, RgbaColor};
use crate::mapfile::{writer, LayerType, MapUnits, TargetLayer, TargetMap};
use crate::model::{Extent, GeometryKind, LayerDescriptor};
use crate::style::{serialize_label, serialize_renderer};

const DIAG_SOURCE: &str = "export";

/// Resolves whether a layer is checked visible in the host legend.
pub trait VisibilityLookup {
    fn is_layer_visible(&self, layer: &LayerDescriptor) -> bool;
}

/// Default lookup: trust the descriptor's own visibility flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptorVisibility;

impl VisibilityLookup for DescriptorVisibility {
    fn is_layer_visible(&self, layer: &LayerDescriptor) -> bool {
        layer.visible
    }
}

/// The host's labeling engine: decides which layers it would actually label
/// and whether partially visible labels are rendered.
pub trait LabelingEngine {
    fn will_label(&self, layer: &LayerDescriptor) -> bool;
    fn shows_partial_labels(&self) -> bool;
}

/// Default engine: label every layer that has label settings, render
/// partials.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLabeling;

impl LabelingEngine for DefaultLabeling {
    fn will_label(&self, layer: &LayerDescriptor) -> bool {
        layer.labeling.is_some()
    }

    fn shows_partial_labels(&self) -> bool {
        true
    }
}

/// Caller-supplied export options, typically collected by a GUI or CLI
/// front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Map name
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub units: MapUnits,
    pub extent: Extent,
    /// Map projection as a proj4 string
    pub projection: String,
    /// Authority identifier of the map CRS (e.g. `EPSG:3857`)
    pub srs_authid: String,
    /// SHAPEPATH; empty means unset
    pub shape_path: String,
    pub background_color: RgbaColor,
    pub image_type: String,
    pub image_path: String,
    pub image_url: String,
    pub temp_path: String,
    /// WEB VALIDATION pattern for externally supplied SLD graphics
    pub validation_regexp: Option<String>,
    pub template_path: String,
    pub template_header_path: String,
    pub template_footer_path: String,
    /// Base URL of the map server, used for the online-resource metadata
    pub map_server_url: String,
    /// Where the mapfile is written
    pub mapfile_path: PathBuf,
    /// Write a `fonts.txt` alias list beside the mapfile
    pub create_font_file: bool,
    /// Path recorded in the FONTSET directive; also gates font name emission
    pub fontset_path: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            width: 600,
            height: 600,
            units: MapUnits::Meters,
            extent: Extent::default(),
            projection: String::new(),
            srs_authid: String::new(),
            shape_path: String::new(),
            background_color: RgbaColor::rgb(255, 255, 255),
            image_type: "PNG".to_string(),
            image_path: String::new(),
            image_url: String::new(),
            temp_path: String::new(),
            validation_regexp: None,
            template_path: String::new(),
            template_header_path: String::new(),
            template_footer_path: String::new(),
            map_server_url: String::new(),
            mapfile_path: PathBuf::new(),
            create_font_file: true,
            fontset_path: None,
        }
    }
}

/// What an export run produced.
#[derive(Debug, Clone)]
pub struct ExportReport {
    /// Path of the written mapfile
    pub mapfile_path: PathBuf,
    /// Font aliases discovered during post-processing
    pub font_aliases: Vec<String>,
    /// Recoverable failures collected along the way
    pub diagnostics: Diagnostics,
}

/// Export `layers` to the mapfile named by `config`.
///
/// Failures local to one layer, class or style are recorded in the returned
/// diagnostics and never abort the run; only failing to persist the document
/// itself is fatal, in which case no partial mapfile is left behind and the
/// post-processing pass does not run.
pub fn export(
    config: &ExportConfig,
    layers: &[LayerDescriptor],
    visibility: &dyn VisibilityLookup,
    labeling: &dyn LabelingEngine,
) -> Result<ExportReport> {
    let mut diag = Diagnostics::new();
    let mut map = build_map(config);

    for descriptor in layers {
        let Some(geometry) = descriptor.geometry else {
            diag.warn(
                DIAG_SOURCE,
                format!("skipped unsupported layer: {}", descriptor.name),
            );
            continue;
        };

        let mut layer = build_layer(descriptor, geometry, visibility);

        match geometry {
            GeometryKind::Raster => {
                layer.opacity = Some(raster_opacity(descriptor));
            },
            _ => {
                // Vector layer: renderer first, then labels. SLD transfer is
                // not an option here, the target's SLD dialect diverges too
                // far from the source's for complex styles.
                match &descriptor.renderer {
                    Some(renderer) => {
                        serialize_renderer(renderer, &mut layer, &mut map.symbols, &mut diag)
                    },
                    None => diag.warn(
                        DIAG_SOURCE,
                        format!("layer '{}' has no renderer, left unstyled", descriptor.name),
                    ),
                }

                if let Some(settings) = &descriptor.labeling {
                    if labeling.will_label(descriptor) {
                        serialize_label(
                            settings,
                            labeling.shows_partial_labels(),
                            config.fontset_path.is_some(),
                            &mut layer,
                            &mut diag,
                        );
                    }
                }
            },
        }

        map.layers.push(layer);
    }

    // Fatal from here on: without a saved document there is nothing to
    // post-process
    writer::save(&map, &config.mapfile_path)?;

    let font_aliases = postprocess::postprocess_mapfile(
        &config.mapfile_path,
        config.create_font_file,
        config.fontset_path.as_deref(),
        &mut diag,
    )?;

    Ok(ExportReport {
        mapfile_path: config.mapfile_path.clone(),
        font_aliases,
        diagnostics: diag,
    })
}

fn build_map(config: &ExportConfig) -> TargetMap {
    let mut map = TargetMap::new(&config.name);
    map.size = Some((config.width, config.height));
    map.units = config.units;
    map.extent = config.extent;
    map.projection = config.projection.clone();
    if !config.shape_path.is_empty() {
        map.shape_path = Some(config.shape_path.clone());
    }
    map.image_color = config.background_color;
    map.image_type = config.image_type.clone();
    map.output_transparent = false;

    map.web.image_path = config.image_path.clone();
    map.web.image_url = config.image_url.clone();
    map.web.temp_path = config.temp_path.clone();
    map.web.template = config.template_path.clone();
    map.web.header = config.template_header_path.clone();
    map.web.footer = config.template_footer_path.clone();
    if let Some(regexp) = &config.validation_regexp {
        // Pattern correctness is the server's problem, not checked here
        map.web
            .validation
            .push(("sld_external_graphic".to_string(), regexp.clone()));
    }

    map.set_metadata("ows_title", &config.name);
    map.set_metadata(
        "ows_onlineresource",
        format!(
            "{}?map={}",
            config.map_server_url,
            config.mapfile_path.display()
        ),
    );
    map.set_metadata("ows_srs", &config.srs_authid);
    map.set_metadata("ows_enable_request", "*");

    map
}

fn build_layer(
    descriptor: &LayerDescriptor,
    geometry: GeometryKind,
    visibility: &dyn VisibilityLookup,
) -> TargetLayer {
    let layer_type = match geometry {
        GeometryKind::Raster => LayerType::Raster,
        GeometryKind::Point => LayerType::Point,
        GeometryKind::Line => LayerType::Line,
        GeometryKind::Polygon => LayerType::Polygon,
    };

    let mut layer = TargetLayer::new(&descriptor.name, layer_type);
    layer.status = visibility.is_layer_visible(descriptor).into();
    layer.extent = Some(descriptor.extent);

    if let Some(range) = descriptor.scale_range {
        layer.min_scale_denom = Some(range.min_denom);
        layer.max_scale_denom = Some(range.max_denom);
    }

    layer.projection = Some(descriptor.projection.clone());

    layer.set_metadata("ows_title", &descriptor.name);
    layer.set_metadata("ows_srs", &descriptor.srs_authid);
    layer.set_metadata("gml_include_items", "all");

    // Connection details arrive pre-resolved from the host's data providers
    let connection = &descriptor.connection;
    layer.connection_type = connection.connection_type;
    layer.connection = connection.connection.clone();
    layer.data = connection.data.clone();
    for (key, value) in &connection.metadata {
        layer.set_metadata(key, value);
    }

    layer
}

/// Layer opacity as an integer percentage, from the renderer's 0-1 opacity
/// or, on older hosts, a legacy 0-255 transparency value.
fn raster_opacity(descriptor: &LayerDescriptor) -> u8 {
    match descriptor.opacity {
        Some(opacity) => (100.0 * opacity).round() as u8,
        None => {
            let transparency = descriptor.legacy_transparency.unwrap_or(255);
            (100.0 * transparency as f64 / 255.0) as u8
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConnectionDescriptor;

    fn raster(name: &str) -> LayerDescriptor {
        LayerDescriptor {
            name: name.to_string(),
            geometry: Some(GeometryKind::Raster),
            extent: Extent::new(0.0, 0.0, 1.0, 1.0),
            scale_range: None,
            projection: "+proj=longlat +datum=WGS84 +no_defs".to_string(),
            srs_authid: "EPSG:4326".to_string(),
            visible: true,
            connection: ConnectionDescriptor::default(),
            opacity: None,
            legacy_transparency: None,
            renderer: None,
            labeling: None,
        }
    }

    #[test]
    fn raster_opacity_prefers_renderer_value() {
        let mut desc = raster("dem");
        desc.opacity = Some(0.755);
        assert_eq!(raster_opacity(&desc), 76);
    }

    #[test]
    fn raster_opacity_falls_back_to_legacy_transparency() {
        let mut desc = raster("dem");
        desc.legacy_transparency = Some(128);
        assert_eq!(raster_opacity(&desc), 50);

        desc.legacy_transparency = None;
        assert_eq!(raster_opacity(&desc), 100);
    }

    #[test]
    fn layer_metadata_and_connection_passthrough() {
        let mut desc = raster("ortho");
        desc.connection = ConnectionDescriptor {
            connection_type: Some(crate::mapfile::ConnectionType::Wms),
            connection: Some("http://wms.example.org/".to_string()),
            data: None,
            metadata: vec![("wmsServer_version".to_string(), "1.1.1".to_string())],
        };

        let layer = build_layer(&desc, GeometryKind::Raster, &DescriptorVisibility);

        assert_eq!(
            layer.connection_type,
            Some(crate::mapfile::ConnectionType::Wms)
        );
        assert_eq!(layer.connection.as_deref(), Some("http://wms.example.org/"));
        assert!(layer
            .metadata
            .iter()
            .any(|(k, v)| k == "wmsServer_version" && v == "1.1.1"));
        assert!(layer
            .metadata
            .iter()
            .any(|(k, v)| k == "gml_include_items" && v == "all"));
    }

    #[test]
    fn invisible_layer_is_exported_off() {
        let mut desc = raster("hidden");
        desc.visible = false;
        let layer = build_layer(&desc, GeometryKind::Raster, &DescriptorVisibility);
        assert_eq!(layer.status, crate::mapfile::Status::Off);
    }
}
