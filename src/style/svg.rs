//! SVG symbol resolution.
//!
//! MapServer cannot render SVG files that carry an embedded `<image>`, so
//! those get their raster payload extracted into a sibling `svgrasters/`
//! directory and become pixmap symbols; pure-vector SVGs are referenced
//! unchanged as SVG symbols.
//!
//! Only the first embedded image in a file is considered.

use std::fs;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use quick_xml::events::Event;

use crate::common::id::symbol_name;
use crate::common::{Error, Result};
use crate::mapfile::{SymbolKind, TargetSymbol};

/// Directory created beside a source SVG for extracted raster images.
pub const SVG_IMAGE_DIR: &str = "svgrasters";

/// Resolve an SVG file into an inline symbol.
///
/// Fails with [`Error::InvalidEmbeddedImage`] when an embedded image
/// reference is neither a base64 data URI nor a safe relative `file://` URI
/// (absolute paths and paths containing `..` are rejected), and with
/// [`Error::DecodeError`] when a base64 payload does not decode; in the
/// latter case no file is written.
pub fn resolve_svg_symbol(svg_path: &Path) -> Result<TargetSymbol> {
    let contents = fs::read_to_string(svg_path)?;

    let symbol = match first_image_href(&contents)? {
        Some(href) => {
            let image_path = extract_embedded_image(svg_path, &href)?;
            let mut symbol = TargetSymbol::new(symbol_name("svg"), SymbolKind::Pixmap);
            symbol.image = Some(image_path);
            symbol.anchor_point = Some((0.5, 0.5));
            symbol
        },
        None => {
            // All vector, can be rendered directly
            let mut symbol = TargetSymbol::new(symbol_name("svg"), SymbolKind::Svg);
            symbol.image = Some(svg_path.display().to_string());
            symbol.anchor_point = Some((0.5, 0.5));
            symbol
        },
    };

    Ok(symbol)
}

/// Find the `href` of the first `<image>` element, if any.
fn first_image_href(contents: &str) -> Result<Option<String>> {
    let mut reader = quick_xml::Reader::from_str(contents);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if e.name().local_name().as_ref() == b"image" {
                    for attr in e.attributes().flatten() {
                        let key = attr.key.as_ref();
                        if key == b"xlink:href" || key == b"href" {
                            return Ok(Some(String::from_utf8_lossy(&attr.value).into_owned()));
                        }
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(e.to_string())),
            _ => {},
        }
        buf.clear();
    }

    Ok(None)
}

/// Materialize an embedded image reference as a file path.
fn extract_embedded_image(svg_path: &Path, href: &str) -> Result<String> {
    let svg_dir = svg_path.parent().unwrap_or_else(|| Path::new("."));

    if href.starts_with("data:image") {
        let (ext, payload) = parse_data_uri(href)?;

        let data = BASE64
            .decode(strip_whitespace(payload))
            .map_err(|e| Error::DecodeError(format!("base64 payload of embedded image: {e}")))?;

        let image_dir = svg_dir.join(SVG_IMAGE_DIR);
        if !image_dir.exists() {
            fs::create_dir_all(&image_dir)?;
        }

        let image_path = image_dir.join(format!("{}.{ext}", symbol_name("svgraster")));
        fs::write(&image_path, data)?;
        Ok(image_path.display().to_string())
    } else if let Some(relative) = href.strip_prefix("file://") {
        // Only relative URIs below the SVG's own directory are acceptable
        if relative.contains("..") || relative.starts_with('/') {
            return Err(Error::InvalidEmbeddedImage(format!(
                "unsafe image path '{relative}'"
            )));
        }
        Ok(svg_dir.join(relative).display().to_string())
    } else {
        Err(Error::InvalidEmbeddedImage(format!(
            "unrecognized image reference '{}'",
            truncate(href, 64)
        )))
    }
}

/// Split a `data:image/<ext>;base64,<payload>` URI.
fn parse_data_uri(uri: &str) -> Result<(&str, &str)> {
    let rest = uri
        .strip_prefix("data:image/")
        .ok_or_else(|| Error::InvalidEmbeddedImage("malformed data URI".to_string()))?;
    let (ext, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| Error::InvalidEmbeddedImage("data URI is not base64".to_string()))?;

    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(Error::InvalidEmbeddedImage(format!(
            "unsupported image type '{ext}' in data URI"
        )));
    }
    Ok((ext, payload))
}

/// SVG serializers are free to wrap base64 payloads; the decoder is not.
fn strip_whitespace(payload: &str) -> Vec<u8> {
    payload
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect()
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
