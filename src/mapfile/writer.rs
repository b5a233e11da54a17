//! Mapfile text emitter.
//!
//! Renders a [`TargetMap`] into MapServer's keyword-block grammar. Numbers
//! go through `itoa`/`ryu` with trailing-zero trimming so the output stays
//! close to what mapscript's own writer produced.

use std::fs;
use std::path::Path;

use super::{LabelAngle, TargetClass, TargetLabel, TargetLayer, TargetMap, TargetStyle, TargetSymbol};
use crate::common::{Error, Result, RgbaColor};
use crate::model::Extent;

const INDENT: &str = "  ";

/// Write a number with the shortest faithful representation: integers via
/// itoa, everything else via ryu with a trailing `.0` trimmed.
pub(crate) fn write_num(buf: &mut String, n: f64) {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        let mut itoa_buf = itoa::Buffer::new();
        buf.push_str(itoa_buf.format(n as i64));
    } else {
        let mut ryu_buf = ryu::Buffer::new();
        buf.push_str(ryu_buf.format(n));
    }
}

/// Raster driver backing an image type. OUTPUTFORMAT declarations without a
/// DRIVER keyword fail the whole map load.
fn output_driver(image_type: &str) -> &'static str {
    match image_type.to_ascii_lowercase().as_str() {
        "jpeg" | "jpg" => "AGG/JPEG",
        _ => "AGG/PNG",
    }
}

/// Serialize a map to mapfile text.
pub fn render(map: &TargetMap) -> String {
    let mut w = MapfileWriter::new();
    w.write_map(map);
    w.finish()
}

/// Serialize a map and write it to `path`.
///
/// A failed write is fatal for the export; the partially written file is
/// removed before the error is returned so callers never observe a truncated
/// mapfile.
pub fn save(map: &TargetMap, path: &Path) -> Result<()> {
    let text = render(map);
    if let Err(source) = fs::write(path, text) {
        let _ = fs::remove_file(path);
        return Err(Error::SaveFailed {
            path: path.display().to_string(),
            source,
        });
    }
    Ok(())
}

struct MapfileWriter {
    buf: String,
    depth: usize,
}

impl MapfileWriter {
    fn new() -> Self {
        Self {
            buf: String::with_capacity(4096),
            depth: 0,
        }
    }

    fn finish(self) -> String {
        self.buf
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.buf.push_str(INDENT);
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    fn open(&mut self, keyword: &str) {
        self.line(keyword);
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth -= 1;
        self.line("END");
    }

    fn key_str(&mut self, key: &str, value: &str) {
        let mut text = String::with_capacity(key.len() + value.len() + 3);
        text.push_str(key);
        text.push_str(" \"");
        text.push_str(value);
        text.push('"');
        self.line(&text);
    }

    fn key_word(&mut self, key: &str, value: &str) {
        let mut text = String::with_capacity(key.len() + value.len() + 1);
        text.push_str(key);
        text.push(' ');
        text.push_str(value);
        self.line(&text);
    }

    fn key_num(&mut self, key: &str, value: f64) {
        let mut text = String::with_capacity(key.len() + 24);
        text.push_str(key);
        text.push(' ');
        write_num(&mut text, value);
        self.line(&text);
    }

    fn key_nums(&mut self, key: &str, values: &[f64]) {
        let mut text = String::with_capacity(key.len() + values.len() * 12);
        text.push_str(key);
        for v in values {
            text.push(' ');
            write_num(&mut text, *v);
        }
        self.line(&text);
    }

    fn key_color(&mut self, key: &str, color: RgbaColor) {
        let (r, g, b) = color.triple();
        self.key_nums(key, &[r as f64, g as f64, b as f64]);
    }

    fn key_extent(&mut self, key: &str, extent: Extent) {
        self.key_nums(key, &[extent.min_x, extent.min_y, extent.max_x, extent.max_y]);
    }

    fn projection(&mut self, proj4: &str) {
        if proj4.is_empty() {
            return;
        }
        self.open("PROJECTION");
        // One quoted proj4 term per line, as mapscript emits it
        for term in proj4.split_whitespace() {
            let term = term.trim_start_matches('+');
            self.line(&format!("\"{term}\""));
        }
        self.close();
    }

    fn metadata(&mut self, entries: &[(String, String)]) {
        if entries.is_empty() {
            return;
        }
        self.open("METADATA");
        for (key, value) in entries {
            self.key_str(&format!("\"{key}\""), value);
        }
        self.close();
    }

    fn write_map(&mut self, map: &TargetMap) {
        self.open("MAP");
        self.key_str("NAME", &map.name);
        self.key_word("STATUS", map.status.keyword());
        if let Some((width, height)) = map.size {
            self.key_nums("SIZE", &[width as f64, height as f64]);
        }
        self.key_word("UNITS", map.units.keyword());
        self.key_extent("EXTENT", map.extent);
        self.key_color("IMAGECOLOR", map.image_color);
        self.key_str("IMAGETYPE", &map.image_type);
        if let Some(shape_path) = &map.shape_path {
            self.key_str("SHAPEPATH", shape_path);
        }
        self.projection(&map.projection);

        self.open("OUTPUTFORMAT");
        self.key_str("DRIVER", output_driver(&map.image_type));
        self.key_str("NAME", &map.image_type);
        self.key_word(
            "TRANSPARENT",
            if map.output_transparent { "ON" } else { "OFF" },
        );
        self.close();

        self.write_web(map);

        for symbol in map.symbols.iter() {
            self.write_symbol(symbol);
        }
        for layer in &map.layers {
            self.write_layer(layer);
        }
        self.close();
    }

    fn write_web(&mut self, map: &TargetMap) {
        self.open("WEB");
        if !map.web.image_path.is_empty() {
            self.key_str("IMAGEPATH", &map.web.image_path);
        }
        if !map.web.image_url.is_empty() {
            self.key_str("IMAGEURL", &map.web.image_url);
        }
        if !map.web.temp_path.is_empty() {
            self.key_str("TEMPPATH", &map.web.temp_path);
        }
        if !map.web.template.is_empty() {
            self.key_str("TEMPLATE", &map.web.template);
        }
        if !map.web.header.is_empty() {
            self.key_str("HEADER", &map.web.header);
        }
        if !map.web.footer.is_empty() {
            self.key_str("FOOTER", &map.web.footer);
        }
        if !map.web.validation.is_empty() {
            self.open("VALIDATION");
            for (key, pattern) in &map.web.validation {
                self.key_str(&format!("\"{key}\""), pattern);
            }
            self.close();
        }
        self.metadata(&map.metadata);
        self.close();
    }

    fn write_symbol(&mut self, symbol: &TargetSymbol) {
        self.open("SYMBOL");
        self.key_str("NAME", &symbol.name);
        if let Some(kind) = symbol.kind {
            self.key_word("TYPE", kind.keyword());
        }
        if symbol.filled {
            self.key_word("FILLED", "TRUE");
        }
        if let Some(font) = &symbol.font {
            self.key_str("FONT", font);
        }
        if let Some(character) = symbol.character {
            self.key_str("CHARACTER", &character.to_string());
        }
        if let Some(image) = &symbol.image {
            self.key_str("IMAGE", image);
        }
        if let Some((ax, ay)) = symbol.anchor_point {
            self.key_nums("ANCHORPOINT", &[ax, ay]);
        }
        if !symbol.points.is_empty() {
            self.open("POINTS");
            for (x, y) in &symbol.points {
                let mut text = String::with_capacity(24);
                write_num(&mut text, *x);
                text.push(' ');
                write_num(&mut text, *y);
                self.line(&text);
            }
            self.close();
        }
        self.close();
    }

    fn write_layer(&mut self, layer: &TargetLayer) {
        self.open("LAYER");
        self.key_str("NAME", &layer.name);
        self.key_word("TYPE", layer.layer_type.keyword());
        self.key_word("STATUS", layer.status.keyword());
        if let Some(extent) = layer.extent {
            self.key_extent("EXTENT", extent);
        }
        if let Some(denom) = layer.min_scale_denom {
            self.key_num("MINSCALEDENOM", denom);
        }
        if let Some(denom) = layer.max_scale_denom {
            self.key_num("MAXSCALEDENOM", denom);
        }
        self.key_word("SIZEUNITS", layer.size_units.keyword());
        if let Some(opacity) = layer.opacity {
            self.key_num("OPACITY", opacity as f64);
        }
        if let Some(conn_type) = layer.connection_type {
            self.key_word("CONNECTIONTYPE", conn_type.keyword());
        }
        if let Some(connection) = &layer.connection {
            self.key_str("CONNECTION", connection);
        }
        if let Some(data) = &layer.data {
            self.key_str("DATA", data);
        }
        if let Some(label_item) = &layer.label_item {
            self.key_str("LABELITEM", label_item);
        }
        if let Some(denom) = layer.label_min_scale_denom {
            self.key_num("LABELMINSCALEDENOM", denom);
        }
        if let Some(denom) = layer.label_max_scale_denom {
            self.key_num("LABELMAXSCALEDENOM", denom);
        }
        if let Some(projection) = &layer.projection {
            self.projection(projection);
        }
        self.metadata(&layer.metadata);
        for class in &layer.classes {
            self.write_class(class);
        }
        self.close();
    }

    fn write_class(&mut self, class: &TargetClass) {
        self.open("CLASS");
        if !class.name.is_empty() {
            self.key_str("NAME", &class.name);
        }
        if let Some(expression) = &class.expression {
            // Already in mapfile expression syntax, emitted verbatim
            self.line(&format!("EXPRESSION {expression}"));
        }
        for style in &class.styles {
            self.write_style(style);
        }
        if let Some(label) = &class.label {
            self.write_label(label);
        }
        self.close();
    }

    fn write_style(&mut self, style: &TargetStyle) {
        self.open("STYLE");
        if let Some(symbol) = &style.symbol {
            self.key_str("SYMBOL", symbol);
        }
        if let Some(color) = style.color {
            self.key_color("COLOR", color);
        }
        if let Some(color) = style.outline_color {
            self.key_color("OUTLINECOLOR", color);
        }
        if let Some(opacity) = style.opacity {
            self.key_num("OPACITY", opacity as f64);
        }
        if let Some(width) = style.width {
            self.key_num("WIDTH", width);
        }
        if let Some(size) = style.size {
            self.key_num("SIZE", size);
        }
        if let Some(angle) = style.angle {
            self.key_num("ANGLE", angle);
        }
        if let Some(gap) = style.gap {
            self.key_num("GAP", gap);
        }
        if let Some(cap) = style.line_cap {
            self.key_word("LINECAP", cap.keyword());
        }
        if let Some(join) = style.line_join {
            self.key_word("LINEJOIN", join.keyword());
        }
        if let Some(pattern) = &style.pattern {
            let mut text = String::from("PATTERN");
            for length in pattern {
                text.push(' ');
                write_num(&mut text, *length);
            }
            text.push_str(" END");
            self.line(&text);
        }
        self.close();
    }

    fn write_label(&mut self, label: &TargetLabel) {
        self.open("LABEL");
        self.key_word("TYPE", "TRUETYPE");
        self.key_str("ENCODING", "utf-8");
        if let Some(font) = &label.font {
            self.key_str("FONT", font);
        }
        self.key_num("SIZE", label.size as f64);
        self.key_color("COLOR", label.color);
        self.key_word("POSITION", label.position.keyword());
        self.key_nums("OFFSET", &[label.offset.0 as f64, label.offset.1 as f64]);
        match &label.angle {
            LabelAngle::Fixed(angle) => self.key_num("ANGLE", *angle),
            LabelAngle::Binding(field) => self.key_word("ANGLE", &format!("[{field}]")),
        }
        if let Some(min_size) = label.min_size {
            self.key_num("MINSIZE", min_size as f64);
        }
        if let Some(max_size) = label.max_size {
            self.key_num("MAXSIZE", max_size as f64);
        }
        if let Some(wrap) = label.wrap {
            self.key_str("WRAP", &wrap.to_string());
        }
        self.key_num("PRIORITY", label.priority as f64);
        self.key_word("FORCE", if label.force { "TRUE" } else { "FALSE" });
        self.key_word("PARTIALS", if label.partials { "TRUE" } else { "FALSE" });
        self.key_num("BUFFER", label.buffer as f64);
        if let Some(min_feature_size) = label.min_feature_size {
            self.key_num("MINFEATURESIZE", min_feature_size);
        }
        self.close();
    }
}
