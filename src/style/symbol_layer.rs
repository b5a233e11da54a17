//! Symbol layer serialization.
//!
//! Translates one source symbol layer into one or more style entries on a
//! target class. Pattern fills recurse into their sub-symbol with hatch or
//! grid context threaded through.

use crate::common::unit::to_pixels;
use crate::common::Diagnostics;
use crate::mapfile::{SymbolSet, TargetClass, TargetLayer, TargetStyle};
use crate::model::{
    FontMarker, LinePatternFill, PointPatternFill, SimpleFill, SimpleLine, SimpleMarker,
    SvgMarker, Symbol, SymbolLayer,
};
use crate::style::{markers, pens, svg};

const DIAG_SOURCE: &str = "symbol-layer";

/// Hatch parameters a line symbol layer inherits from an enclosing line
/// pattern fill.
pub(crate) struct HatchContext {
    /// Hatch line spacing in pixels
    pub size: f64,
    pub angle: f64,
}

/// Grid parameters a marker symbol layer inherits from an enclosing point
/// pattern fill.
///
/// Displacements and distinct x/y distances are not currently supported by
/// the target format's GAP model; they are carried so the gap heuristic can
/// use them.
pub(crate) struct FillContext {
    pub distance_x: f64,
    pub distance_y: f64,
    #[allow(dead_code)]
    pub displacement_x: f64,
    #[allow(dead_code)]
    pub displacement_y: f64,
    pub angle: f64,
}

impl FillContext {
    /// The single GAP value the target format supports.
    fn gap(&self) -> f64 {
        (self.distance_x + self.distance_y) / 2.0
    }
}

/// Serialize every layer of a symbol onto `class`.
///
/// The class takes the layer's name; renderers that need distinct class
/// names append an ordinal suffix afterwards.
pub fn serialize_symbol(
    symbol: &Symbol,
    class: &mut TargetClass,
    layer: &mut TargetLayer,
    symbols: &mut SymbolSet,
    diag: &mut Diagnostics,
) {
    class.name = layer.name.clone();

    for symbol_layer in &symbol.layers {
        match symbol_layer {
            SymbolLayer::SimpleLine(sl) => serialize_simple_line(sl, None, class, layer, symbols),
            SymbolLayer::SimpleFill(sl) => serialize_simple_fill(sl, class, layer),
            SymbolLayer::SimpleMarker(sl) => serialize_simple_marker(sl, None, class, symbols),
            SymbolLayer::FontMarker(sl) => serialize_font_marker(sl, class, symbols),
            SymbolLayer::SvgMarker(sl) => serialize_svg_marker(sl, class, symbols, diag),
            SymbolLayer::LinePatternFill(sl) => {
                serialize_line_pattern_fill(sl, class, layer, symbols, diag)
            },
            SymbolLayer::PointPatternFill(sl) => {
                serialize_point_pattern_fill(sl, class, symbols, diag)
            },
        }
    }
}

/// Serialize a stroked line into one style.
///
/// With a [`HatchContext`] the line describes the strokes of a line pattern
/// fill: it references the document's singleton hatch symbol and emits the
/// pattern's spacing and angle instead of an outline color.
fn serialize_simple_line(
    sl: &SimpleLine,
    hatch: Option<&HatchContext>,
    class: &mut TargetClass,
    layer: &mut TargetLayer,
    symbols: &mut SymbolSet,
) {
    let mut style = TargetStyle::new();

    style.line_cap = Some(pens::cap_style(sl.cap_style));
    style.line_join = Some(pens::join_style(sl.join_style));

    match hatch {
        Some(ctx) => {
            style.symbol = Some(symbols.hatch_symbol_name());
            style.size = Some(ctx.size);
            style.angle = Some(ctx.angle);
            style.color = Some(sl.color);
        },
        None => {
            style.outline_color = Some(sl.color);
        },
    }

    // Emit a dash pattern only for a non-solid, drawn pen
    if sl.pen_style.is_patterned() {
        style.pattern = pens::dash_pattern(&sl.pen_style);
    }

    style.width = Some(if sl.pen_style.is_pen() {
        to_pixels(sl.width, sl.width_unit)
    } else {
        0.0
    });

    // Assume this is the layer's only outline; a map-unit width flips the
    // whole layer into map-unit sizes (see TargetLayer::maybe_use_map_units).
    if sl.width > 0.0 && hatch.is_none() {
        layer.maybe_use_map_units(sl.width_unit);
    }

    class.styles.push(style);
}

/// Serialize a filled polygon into a background style plus, when a border is
/// configured, an outline style.
fn serialize_simple_fill(sl: &SimpleFill, class: &mut TargetClass, layer: &mut TargetLayer) {
    let mut background = TargetStyle::new();
    background.angle = Some(sl.angle);
    background.color = Some(sl.fill_color);
    background.opacity = Some(sl.fill_color.opacity_percent());
    class.styles.push(background);

    // Only serialize an outline if there is one
    if !sl.border_style.is_pen() {
        return;
    }

    let mut outline = TargetStyle::new();
    outline.outline_color = Some(sl.border_color);

    // A zero-width border still draws about one pixel wide
    outline.width = Some(if sl.border_width > 0.0 {
        to_pixels(sl.border_width, sl.border_width_unit)
    } else {
        pens::DEFAULT_OUTLINE_WIDTH
    });

    if sl.border_width > 0.0 {
        layer.maybe_use_map_units(sl.border_width_unit);
    }

    if sl.border_style.is_patterned() {
        outline.pattern = pens::dash_pattern(&sl.border_style);
    }

    class.styles.push(outline);
}

/// Serialize a named marker into a fill style and/or an outline style, each
/// referencing a freshly generated vector symbol.
fn serialize_simple_marker(
    sl: &SimpleMarker,
    fill: Option<&FillContext>,
    class: &mut TargetClass,
    symbols: &mut SymbolSet,
) {
    // Emit a fill only when it is visible and the marker is polygonal
    if !sl.fill_color.is_transparent() && markers::is_polygonal(&sl.name) {
        let fill_symbol = markers::build_marker_symbol(&sl.name, true);
        let symbol_name = symbols.push(fill_symbol);

        let mut style = TargetStyle::new();
        style.symbol = Some(symbol_name);
        style.color = Some(sl.fill_color);
        style.size = Some(to_pixels(sl.size, sl.size_unit));
        if let Some(ctx) = fill {
            style.gap = Some(ctx.gap());
            style.angle = Some(ctx.angle);
        }
        class.styles.push(style);
    }

    // Emit an outline only when the marker has one
    if !sl.outline_style.is_pen() {
        return;
    }

    let outline_symbol = markers::build_marker_symbol(&sl.name, false);
    let symbol_name = symbols.push(outline_symbol);

    let mut style = TargetStyle::new();
    style.symbol = Some(symbol_name);
    style.color = Some(sl.outline_color);
    style.width = Some(if sl.outline_width > 0.0 {
        to_pixels(sl.outline_width, sl.outline_width_unit)
    } else {
        pens::DEFAULT_OUTLINE_WIDTH
    });
    style.size = Some(to_pixels(sl.size, sl.size_unit));
    if let Some(ctx) = fill {
        style.gap = Some(ctx.gap());
        style.angle = Some(ctx.angle);
    }
    if sl.outline_style.is_patterned() {
        style.pattern = pens::dash_pattern(&sl.outline_style);
    }
    class.styles.push(style);
}

/// Serialize a font glyph marker into one style referencing a generated
/// truetype symbol.
fn serialize_font_marker(sl: &FontMarker, class: &mut TargetClass, symbols: &mut SymbolSet) {
    use crate::common::id::symbol_name;
    use crate::mapfile::{SymbolKind, TargetSymbol};

    let mut symbol = TargetSymbol::new(symbol_name("truetype"), SymbolKind::Truetype);
    symbol.filled = true;
    symbol.font = Some(sl.font_family.clone());
    symbol.character = Some(sl.character);
    let name = symbols.push(symbol);

    let mut style = TargetStyle::new();
    style.symbol = Some(name);
    style.color = Some(sl.color);
    style.size = Some(to_pixels(sl.size, sl.size_unit));
    class.styles.push(style);
}

/// Serialize an SVG marker. Resolution failures skip this symbol layer only.
fn serialize_svg_marker(
    sl: &SvgMarker,
    class: &mut TargetClass,
    symbols: &mut SymbolSet,
    diag: &mut Diagnostics,
) {
    let symbol = match svg::resolve_svg_symbol(&sl.path) {
        Ok(symbol) => symbol,
        Err(e) => {
            diag.warn(
                DIAG_SOURCE,
                format!("cannot serialize SVG symbol '{}': {e}", sl.path.display()),
            );
            return;
        },
    };

    let name = symbols.push(symbol);

    let mut style = TargetStyle::new();
    style.symbol = Some(name);
    style.size = Some(to_pixels(sl.size, sl.size_unit));
    class.styles.push(style);
}

/// Serialize the line layers of a line pattern fill's sub-symbol as hatch
/// styles. Sub-layers of any other kind have no hatch equivalent.
fn serialize_line_pattern_fill(
    sl: &LinePatternFill,
    class: &mut TargetClass,
    layer: &mut TargetLayer,
    symbols: &mut SymbolSet,
    diag: &mut Diagnostics,
) {
    let ctx = HatchContext {
        size: to_pixels(sl.distance, sl.distance_unit),
        angle: sl.line_angle,
    };

    for sub in &sl.sub_symbol.layers {
        match sub {
            SymbolLayer::SimpleLine(line) => {
                serialize_simple_line(line, Some(&ctx), class, layer, symbols)
            },
            other => diag.warn(
                DIAG_SOURCE,
                format!(
                    "skipping {} sub-layer inside a line pattern fill",
                    other.kind_name()
                ),
            ),
        }
    }
}

/// Serialize the marker layers of a point pattern fill's sub-symbol as
/// gapped marker styles. Sub-layers of any other kind are skipped.
fn serialize_point_pattern_fill(
    sl: &PointPatternFill,
    class: &mut TargetClass,
    symbols: &mut SymbolSet,
    diag: &mut Diagnostics,
) {
    for sub in &sl.sub_symbol.layers {
        match sub {
            SymbolLayer::SimpleMarker(marker) => {
                let ctx = FillContext {
                    distance_x: to_pixels(sl.distance_x, sl.distance_x_unit),
                    distance_y: to_pixels(sl.distance_y, sl.distance_y_unit),
                    displacement_x: to_pixels(sl.displacement_x, sl.displacement_x_unit),
                    displacement_y: to_pixels(sl.displacement_y, sl.displacement_y_unit),
                    angle: marker.angle,
                };
                serialize_simple_marker(marker, Some(&ctx), class, symbols);
            },
            other => diag.warn(
                DIAG_SOURCE,
                format!(
                    "skipping {} sub-layer inside a point pattern fill",
                    other.kind_name()
                ),
            ),
        }
    }
}
