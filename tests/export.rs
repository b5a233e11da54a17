//! End-to-end export scenarios over real files.

use std::fs;
use std::path::Path;

use mapscribe::common::{RgbaColor, SizeUnit};
use mapscribe::export::{export, DefaultLabeling, DescriptorVisibility, ExportConfig};
use mapscribe::mapfile::MapUnits;
use mapscribe::model::{
    ConnectionDescriptor, Extent, GeometryKind, LabelBinding, LabelPlacement, LabelSettings,
    LayerDescriptor, PenCapStyle, PenJoinStyle, PenStyle, Quadrant, Renderer, SimpleLine,
    SimpleMarker, Symbol, SymbolLayer,
};

fn config(dir: &Path) -> ExportConfig {
    ExportConfig {
        name: "testmap".to_string(),
        width: 600,
        height: 600,
        units: MapUnits::Meters,
        extent: Extent::new(0.0, 0.0, 100.0, 100.0),
        projection: "+proj=longlat +datum=WGS84 +no_defs".to_string(),
        srs_authid: "EPSG:4326".to_string(),
        map_server_url: "http://maps.example.org/cgi-bin/mapserv".to_string(),
        mapfile_path: dir.join("test.map"),
        create_font_file: false,
        fontset_path: None,
        ..ExportConfig::default()
    }
}

fn vector_layer(name: &str, geometry: GeometryKind, renderer: Renderer) -> LayerDescriptor {
    LayerDescriptor {
        name: name.to_string(),
        geometry: Some(geometry),
        extent: Extent::new(0.0, 0.0, 100.0, 100.0),
        scale_range: None,
        projection: "+proj=longlat +datum=WGS84 +no_defs".to_string(),
        srs_authid: "EPSG:4326".to_string(),
        visible: true,
        connection: ConnectionDescriptor {
            data: Some("/data/layer.shp".to_string()),
            ..ConnectionDescriptor::default()
        },
        opacity: None,
        legacy_transparency: None,
        renderer: Some(renderer),
        labeling: None,
    }
}

fn circle_marker_symbol() -> Symbol {
    Symbol::new(vec![SymbolLayer::SimpleMarker(SimpleMarker {
        name: "circle".to_string(),
        size: 2.0,
        size_unit: SizeUnit::Millimeter,
        angle: 0.0,
        fill_color: RgbaColor::rgb(255, 0, 0),
        outline_color: RgbaColor::rgb(0, 0, 0),
        outline_style: PenStyle::NoPen,
        outline_width: 0.0,
        outline_width_unit: SizeUnit::Millimeter,
    })])
}

fn count_blocks(text: &str, keyword: &str) -> usize {
    text.lines().filter(|l| l.trim() == keyword).count()
}

#[test]
fn single_symbol_point_layer_yields_one_filled_ellipse_style() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    let layers = vec![vector_layer(
        "wells",
        GeometryKind::Point,
        Renderer::SingleSymbol {
            symbol: circle_marker_symbol(),
        },
    )];

    let report = export(&cfg, &layers, &DescriptorVisibility, &DefaultLabeling).unwrap();
    assert!(report.diagnostics.is_empty());

    let text = fs::read_to_string(&cfg.mapfile_path).unwrap();
    assert_eq!(count_blocks(&text, "LAYER"), 1);
    assert_eq!(count_blocks(&text, "CLASS"), 1);
    assert_eq!(count_blocks(&text, "STYLE"), 1);
    assert_eq!(count_blocks(&text, "SYMBOL"), 1);

    // the generated marker symbol is an ellipse with fill
    assert!(text.contains("TYPE ELLIPSE"));
    assert!(text.contains("FILLED TRUE"));

    // the one style references the generated symbol by name
    let symbol_name = text
        .lines()
        .find_map(|l| l.trim().strip_prefix("NAME \"circle_"))
        .expect("generated symbol name");
    let symbol_name = format!("circle_{}", symbol_name.trim_end_matches('"'));
    assert!(text.contains(&format!("SYMBOL \"{symbol_name}\"")));
}

#[test]
fn labeled_layer_gets_aliased_font_and_fontset() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(dir.path());
    cfg.create_font_file = true;
    cfg.fontset_path = Some(dir.path().join("fontset.txt"));

    let mut layer = vector_layer(
        "places",
        GeometryKind::Point,
        Renderer::SingleSymbol {
            symbol: circle_marker_symbol(),
        },
    );
    layer.labeling = Some(LabelSettings {
        binding: LabelBinding::Field("name".to_string()),
        placement: LabelPlacement::OverPoint(Quadrant::Above),
        offset_x: 0.0,
        offset_y: 0.0,
        rotation_field: None,
        angle_offset: 0.0,
        scale_min: 0.0,
        scale_max: 0.0,
        font_family: "Open Sans".to_string(),
        font_named_style: "*".to_string(),
        font_pixel_size: 12,
        font_size_in_map_units: false,
        color: RgbaColor::rgb(0, 0, 0),
        limit_pixel_size: false,
        min_pixel_size: 3,
        max_pixel_size: 40,
        wrap_char: String::new(),
        priority: 1,
        display_all: false,
        buffer_size: 0.0,
        buffer_size_unit: SizeUnit::Millimeter,
        min_feature_size: 0.0,
    });

    let report = export(&cfg, &[layer], &DescriptorVisibility, &DefaultLabeling).unwrap();
    assert_eq!(report.font_aliases, vec!["OpenSans".to_string()]);

    let text = fs::read_to_string(&cfg.mapfile_path).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    // FONTSET lands right after the opening keyword
    assert_eq!(lines[0], "MAP");
    assert!(lines[1].starts_with("  FONTSET "));

    // font got aliased in place
    assert!(text.contains("FONT \"OpenSans\""));
    assert!(!text.contains("\"Open Sans\""));

    // label text binding reached the layer
    assert!(text.contains("LABELITEM \"name\""));

    let fonts = fs::read_to_string(dir.path().join("fonts.txt")).unwrap();
    assert_eq!(fonts, "OpenSans\n");
}

#[test]
fn categorized_renderer_emits_one_class_per_category_in_the_mapfile() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());

    let line = |r, g, b| {
        Symbol::new(vec![SymbolLayer::SimpleLine(SimpleLine {
            color: RgbaColor::rgb(r, g, b),
            pen_style: PenStyle::Solid,
            cap_style: PenCapStyle::Round,
            join_style: PenJoinStyle::Round,
            width: 0.4,
            width_unit: SizeUnit::Millimeter,
        })])
    };

    let layers = vec![vector_layer(
        "roads",
        GeometryKind::Line,
        Renderer::Categorized {
            attribute: "highway".to_string(),
            categories: vec![
                mapscribe::model::Category {
                    value: "primary".to_string(),
                    symbol: line(200, 0, 0),
                },
                mapscribe::model::Category {
                    value: "secondary".to_string(),
                    symbol: line(0, 200, 0),
                },
            ],
        },
    )];

    export(&cfg, &layers, &DescriptorVisibility, &DefaultLabeling).unwrap();
    let text = fs::read_to_string(&cfg.mapfile_path).unwrap();

    assert_eq!(count_blocks(&text, "CLASS"), 2);
    assert!(text.contains("NAME \"roads_0\""));
    assert!(text.contains("NAME \"roads_1\""));
    assert!(text.contains("EXPRESSION (\"[highway]\" = \"primary\")"));
    assert!(text.contains("EXPRESSION (\"[highway]\" = \"secondary\")"));
}

#[test]
fn unsupported_layers_are_skipped_with_a_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());

    let mut no_geometry = vector_layer(
        "delimited",
        GeometryKind::Point,
        Renderer::SingleSymbol {
            symbol: circle_marker_symbol(),
        },
    );
    no_geometry.geometry = None;

    let styled = vector_layer(
        "wells",
        GeometryKind::Point,
        Renderer::SingleSymbol {
            symbol: circle_marker_symbol(),
        },
    );

    let report = export(
        &cfg,
        &[no_geometry, styled],
        &DescriptorVisibility,
        &DefaultLabeling,
    )
    .unwrap();

    assert_eq!(report.diagnostics.len(), 1);
    assert!(report
        .diagnostics
        .iter()
        .any(|d| d.message.contains("delimited")));

    // the remaining layer still exported
    let text = fs::read_to_string(&cfg.mapfile_path).unwrap();
    assert_eq!(count_blocks(&text, "LAYER"), 1);
    assert!(text.contains("NAME \"wells\""));
}

#[test]
fn raster_layer_carries_opacity_and_no_classes() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());

    let mut raster = vector_layer(
        "ortho",
        GeometryKind::Raster,
        Renderer::SingleSymbol {
            symbol: circle_marker_symbol(),
        },
    );
    raster.geometry = Some(GeometryKind::Raster);
    raster.renderer = None;
    raster.opacity = Some(0.5);

    export(&cfg, &[raster], &DescriptorVisibility, &DefaultLabeling).unwrap();
    let text = fs::read_to_string(&cfg.mapfile_path).unwrap();

    assert!(text.contains("TYPE RASTER"));
    assert!(text.contains("OPACITY 50"));
    assert_eq!(count_blocks(&text, "CLASS"), 0);
}
