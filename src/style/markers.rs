//! Well-known vector marker geometries.
//!
//! These are the same shapes the SLD standard knows, keyed by the names the
//! source styling model uses. Coordinates are normalized to the unit square.

use phf::{phf_map, phf_set};

use crate::common::id::symbol_name;
use crate::mapfile::{SymbolKind, TargetSymbol};

/// Pen-up sentinel separating the strokes of multi-stroke markers.
///
/// MapServer vector symbols interpret a `-99 99` point as "lift the pen",
/// which is how the two strokes of a cross stay disconnected. A target
/// without multi-stroke vector symbols would have to split these into two
/// line-type symbols instead.
pub const PEN_UP: (f64, f64) = (-99.0, 99.0);

static WELL_KNOWN_MARKERS: phf::Map<&'static str, &'static [(f64, f64)]> = phf_map! {
    "rectangle" => &[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0), (0.0, 0.0)],
    "triangle" => &[(0.0, 1.0), (0.5, 0.0), (1.0, 1.0), (0.0, 1.0)],
    "regular_star" => &[
        (0.0, 0.375), (0.35, 0.375), (0.5, 0.0), (0.65, 0.375), (1.0, 0.375),
        (0.75, 0.625), (0.875, 1.0), (0.5, 0.75), (0.125, 1.0), (0.25, 0.625),
        (0.0, 0.375),
    ],
    "cross" => &[(0.5, 0.0), (0.5, 1.0), (-99.0, 99.0), (0.0, 0.5), (1.0, 0.5)],
    "cross2" => &[(0.0, 0.0), (1.0, 1.0), (-99.0, 99.0), (0.0, 1.0), (1.0, 0.0)],
};

/// Markers without closed areas; these can never take a fill.
static LINEAL_MARKERS: phf::Set<&'static str> = phf_set! { "cross", "cross2" };

/// Whether a well-known marker is polygonal, i.e. may have a fill.
pub fn is_polygonal(name: &str) -> bool {
    !LINEAL_MARKERS.contains(name)
}

/// Geometry of a well-known marker.
pub fn geometry(name: &str) -> Option<&'static [(f64, f64)]> {
    WELL_KNOWN_MARKERS.get(name).copied()
}

/// Build an inline symbol for a named marker.
///
/// Unknown names fall back to a single-point ellipse, which renders as a
/// circle and always supports fill. `filled` only takes effect on markers
/// that are polygonal.
pub fn build_marker_symbol(name: &str, filled: bool) -> TargetSymbol {
    let mut symbol = TargetSymbol::new(symbol_name(name), SymbolKind::Vector);

    let may_have_fill = match geometry(name) {
        Some(points) => {
            symbol.points = points.to_vec();
            is_polygonal(name)
        },
        None => {
            symbol.kind = Some(SymbolKind::Ellipse);
            symbol.points = vec![(1.0, 1.0)];
            true
        },
    };

    symbol.filled = may_have_fill && filled;
    symbol
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_markers_carry_one_pen_up_sentinel() {
        for name in ["cross", "cross2"] {
            let points = geometry(name).unwrap();
            let sentinels = points.iter().filter(|p| **p == PEN_UP).count();
            assert_eq!(sentinels, 1, "{name}");
            // the sentinel separates the two strokes, never terminates them
            assert_ne!(*points.first().unwrap(), PEN_UP);
            assert_ne!(*points.last().unwrap(), PEN_UP);
        }
    }

    #[test]
    fn polygonal_classification() {
        assert!(is_polygonal("rectangle"));
        assert!(is_polygonal("triangle"));
        assert!(is_polygonal("regular_star"));
        assert!(!is_polygonal("cross"));
        assert!(!is_polygonal("cross2"));
    }

    #[test]
    fn unknown_marker_falls_back_to_ellipse() {
        let symbol = build_marker_symbol("circle", true);
        assert_eq!(symbol.kind, Some(SymbolKind::Ellipse));
        assert_eq!(symbol.points, vec![(1.0, 1.0)]);
        assert!(symbol.filled);
    }

    #[test]
    fn lineal_marker_never_fills() {
        let symbol = build_marker_symbol("cross", true);
        assert_eq!(symbol.kind, Some(SymbolKind::Vector));
        assert!(!symbol.filled);
    }

    #[test]
    fn well_known_marker_unfilled_outline() {
        let symbol = build_marker_symbol("rectangle", false);
        assert_eq!(symbol.kind, Some(SymbolKind::Vector));
        assert!(!symbol.filled);
        assert_eq!(symbol.points.len(), 5);
    }
}
