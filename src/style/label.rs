//! Label serialization.
//!
//! Translates a layer's label settings into one label definition attached to
//! the layer's first class. The caller decides whether labeling is active at
//! all (the labeling engine collaborator) and whether font names may be
//! emitted (a fontset must be configured for them to resolve).

use crate::common::unit::to_pixels;
use crate::common::{Diagnostics, SizeUnit};
use crate::mapfile::{LabelAngle, LabelPosition, TargetClass, TargetLabel, TargetLayer};
use crate::model::{LabelBinding, LabelPlacement, LabelSettings, Quadrant};

const DIAG_SOURCE: &str = "label";

/// Map a placement onto the target position constant.
///
/// "Around point" lets the renderer choose, as does any quadrant without a
/// directional equivalent.
fn label_position(placement: LabelPlacement) -> LabelPosition {
    match placement {
        LabelPlacement::AroundPoint => LabelPosition::Auto,
        LabelPlacement::OverPoint(quadrant) => match quadrant {
            Quadrant::AboveLeft => LabelPosition::UpperLeft,
            Quadrant::Above => LabelPosition::UpperCenter,
            Quadrant::AboveRight => LabelPosition::UpperRight,
            Quadrant::Left => LabelPosition::CenterLeft,
            Quadrant::Over => LabelPosition::CenterCenter,
            Quadrant::Right => LabelPosition::CenterRight,
            Quadrant::BelowLeft => LabelPosition::LowerLeft,
            Quadrant::Below => LabelPosition::LowerCenter,
            Quadrant::BelowRight => LabelPosition::LowerRight,
        },
    }
}

/// Build the fontset font name: family with spaces stripped, suffixed with
/// the named style unless that is the `*` wildcard.
fn font_definition(family: &str, named_style: &str) -> String {
    let family = family.replace(' ', "");
    let style = named_style.replace(' ', "");

    if style == "*" {
        family
    } else {
        format!("{family}-{style}")
    }
}

/// Serialize label settings onto `layer`.
///
/// The label attaches to the layer's first class, creating one if the layer
/// has none yet; a layer carries at most one label definition.
pub fn serialize_label(
    settings: &LabelSettings,
    partials: bool,
    emit_font: bool,
    layer: &mut TargetLayer,
    diag: &mut Diagnostics,
) {
    match &settings.binding {
        LabelBinding::Field(field) => {
            layer.label_item = Some(field.clone());
        },
        LabelBinding::Expression(_) => {
            // No expression engine on the target side
            diag.warn(
                DIAG_SOURCE,
                format!(
                    "expression-based label text is not supported, layer '{}' labels keep no text binding",
                    layer.name
                ),
            );
        },
    }

    // Data defined rotation is the only data defined property carried over
    let angle = match &settings.rotation_field {
        Some(field) => LabelAngle::Binding(field.clone()),
        None => LabelAngle::Fixed(settings.angle_offset),
    };

    if settings.scale_min > 0.0 {
        layer.label_min_scale_denom = Some(settings.scale_min);
    }
    if settings.scale_max > 0.0 {
        layer.label_max_scale_denom = Some(settings.scale_max);
    }

    // Without a fontset the font name could never resolve, so only the
    // resolved pixel size is emitted and the renderer's default font is used
    let font_def = font_definition(&settings.font_family, &settings.font_named_style);
    let font = emit_font.then_some(font_def);

    if settings.font_size_in_map_units {
        layer.maybe_use_map_units(SizeUnit::MapUnit);
    }

    let wrap = match settings.wrap_char.chars().count() {
        0 => None,
        1 => settings.wrap_char.chars().next(),
        _ => {
            diag.warn(
                DIAG_SOURCE,
                format!(
                    "skipping ambiguous wrap character (\"{}\") for labels",
                    settings.wrap_char
                ),
            );
            None
        },
    };

    let label = TargetLabel {
        font,
        size: settings.font_pixel_size,
        color: settings.color,
        position: label_position(settings.placement),
        offset: (settings.offset_x as i32, settings.offset_y as i32),
        angle,
        min_size: settings.limit_pixel_size.then_some(settings.min_pixel_size),
        max_size: settings.limit_pixel_size.then_some(settings.max_pixel_size),
        wrap,
        priority: settings.priority,
        force: settings.display_all,
        partials,
        buffer: to_pixels(settings.buffer_size, settings.buffer_size_unit) as i32,
        min_feature_size: (settings.min_feature_size > 0.0)
            .then(|| to_pixels(settings.min_feature_size, SizeUnit::Millimeter)),
    };

    // Attach to the first class, or to a fresh class when none exists
    if layer.classes.is_empty() {
        layer.classes.push(TargetClass::new());
    }
    layer.classes[0].label = Some(label);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::RgbaColor;
    use crate::mapfile::LayerType;

    fn settings() -> LabelSettings {
        LabelSettings {
            binding: LabelBinding::Field("name".to_string()),
            placement: LabelPlacement::OverPoint(Quadrant::AboveRight),
            offset_x: 2.0,
            offset_y: -3.0,
            rotation_field: None,
            angle_offset: 30.0,
            scale_min: 0.0,
            scale_max: 0.0,
            font_family: "Open Sans".to_string(),
            font_named_style: "Bold Italic".to_string(),
            font_pixel_size: 13,
            font_size_in_map_units: false,
            color: RgbaColor::rgb(20, 20, 20),
            limit_pixel_size: false,
            min_pixel_size: 3,
            max_pixel_size: 40,
            wrap_char: String::new(),
            priority: 5,
            display_all: false,
            buffer_size: 1.0,
            buffer_size_unit: SizeUnit::Millimeter,
            min_feature_size: 0.0,
        }
    }

    fn layer() -> TargetLayer {
        TargetLayer::new("places", LayerType::Point)
    }

    #[test]
    fn field_binding_sets_label_item() {
        let mut layer = layer();
        let mut diag = Diagnostics::new();

        serialize_label(&settings(), true, true, &mut layer, &mut diag);

        assert_eq!(layer.label_item.as_deref(), Some("name"));
        let label = layer.classes[0].label.as_ref().unwrap();
        assert_eq!(label.position, LabelPosition::UpperRight);
        assert_eq!(label.offset, (2, -3));
        assert_eq!(label.angle, LabelAngle::Fixed(30.0));
        assert_eq!(label.font.as_deref(), Some("OpenSans-BoldItalic"));
        assert_eq!(label.size, 13);
        assert_eq!(label.buffer, (1.0 * 3.779527559) as i32);
        assert!(diag.is_empty());
    }

    #[test]
    fn expression_binding_is_skipped_with_diagnostic() {
        let mut layer = layer();
        let mut diag = Diagnostics::new();
        let mut s = settings();
        s.binding = LabelBinding::Expression("upper(name)".to_string());

        serialize_label(&s, false, false, &mut layer, &mut diag);

        assert!(layer.label_item.is_none());
        assert_eq!(diag.len(), 1);
        // the label itself still attaches
        assert!(layer.classes[0].label.is_some());
    }

    #[test]
    fn wildcard_style_drops_suffix() {
        assert_eq!(font_definition("Open Sans", "*"), "OpenSans");
        assert_eq!(font_definition("DejaVu Sans", "Book"), "DejaVuSans-Book");
    }

    #[test]
    fn no_fontset_means_no_font_name() {
        let mut layer = layer();
        let mut diag = Diagnostics::new();

        serialize_label(&settings(), false, false, &mut layer, &mut diag);

        let label = layer.classes[0].label.as_ref().unwrap();
        assert!(label.font.is_none());
        assert_eq!(label.size, 13);
    }

    #[test]
    fn data_defined_rotation_binds_angle() {
        let mut layer = layer();
        let mut diag = Diagnostics::new();
        let mut s = settings();
        s.rotation_field = Some("heading".to_string());

        serialize_label(&s, false, false, &mut layer, &mut diag);

        let label = layer.classes[0].label.as_ref().unwrap();
        assert_eq!(label.angle, LabelAngle::Binding("heading".to_string()));
    }

    #[test]
    fn multi_char_wrap_is_skipped() {
        let mut layer = layer();
        let mut diag = Diagnostics::new();
        let mut s = settings();
        s.wrap_char = "ab".to_string();

        serialize_label(&s, false, false, &mut layer, &mut diag);

        assert!(layer.classes[0].label.as_ref().unwrap().wrap.is_none());
        assert_eq!(diag.len(), 1);

        s.wrap_char = ",".to_string();
        let mut layer2 = self::layer();
        serialize_label(&s, false, false, &mut layer2, &mut diag);
        assert_eq!(layer2.classes[0].label.as_ref().unwrap().wrap, Some(','));
    }

    #[test]
    fn around_point_and_quadrants_map_to_positions() {
        assert_eq!(label_position(LabelPlacement::AroundPoint), LabelPosition::Auto);
        assert_eq!(
            label_position(LabelPlacement::OverPoint(Quadrant::BelowLeft)),
            LabelPosition::LowerLeft
        );
        assert_eq!(
            label_position(LabelPlacement::OverPoint(Quadrant::Over)),
            LabelPosition::CenterCenter
        );
    }

    #[test]
    fn scale_range_and_pixel_clamp() {
        let mut layer = layer();
        let mut diag = Diagnostics::new();
        let mut s = settings();
        s.scale_min = 1000.0;
        s.scale_max = 50000.0;
        s.limit_pixel_size = true;

        serialize_label(&s, false, false, &mut layer, &mut diag);

        assert_eq!(layer.label_min_scale_denom, Some(1000.0));
        assert_eq!(layer.label_max_scale_denom, Some(50000.0));
        let label = layer.classes[0].label.as_ref().unwrap();
        assert_eq!(label.min_size, Some(3));
        assert_eq!(label.max_size, Some(40));
    }

    #[test]
    fn label_attaches_to_existing_first_class() {
        let mut layer = layer();
        layer.classes.push(TargetClass::new());
        layer.classes.push(TargetClass::new());
        let mut diag = Diagnostics::new();

        serialize_label(&settings(), false, false, &mut layer, &mut diag);

        assert_eq!(layer.classes.len(), 2);
        assert!(layer.classes[0].label.is_some());
        assert!(layer.classes[1].label.is_none());
    }
}
