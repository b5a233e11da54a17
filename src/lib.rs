//! mapscribe - serialize a GIS layer/style model into MapServer mapfiles
//!
//! This library translates an in-memory map description (layers, renderers,
//! symbol layers, label placement) into MapServer's declarative mapfile
//! format, including inline symbol definitions, font aliasing and SVG
//! raster extraction.
//!
//! # Features
//!
//! - **Renderer translation**: single-symbol, categorized and graduated
//!   renderers become CLASS blocks with filter expressions
//! - **Symbol layer translation**: lines, fills, markers, font glyphs, SVG
//!   markers and pattern fills become STYLE blocks and inline SYMBOLs
//! - **Label translation**: quadrant placement, data-bound rotation, wrap
//!   and buffer handling
//! - **Mapfile post-processing**: font aliasing, `fonts.txt` emission and
//!   FONTSET injection over the saved text
//!
//! # Example
//!
//! ```no_run
//! use mapscribe::export::{export, DefaultLabeling, DescriptorVisibility, ExportConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExportConfig {
//!     name: "demo".to_string(),
//!     mapfile_path: "demo.map".into(),
//!     ..ExportConfig::default()
//! };
//! let layers = Vec::new();
//!
//! let report = export(&config, &layers, &DescriptorVisibility, &DefaultLabeling)?;
//! for diagnostic in report.diagnostics.iter() {
//!     eprintln!("{}: {}", diagnostic.source, diagnostic.message);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Failures local to one layer, class or style never abort an export; they
//! are collected as diagnostics on the returned report. Only a failed
//! document save is fatal.

pub mod common;
pub mod export;
pub mod mapfile;
pub mod model;
pub mod style;

pub use common::{Diagnostic, Diagnostics, Error, Result};
pub use export::{export, ExportConfig, ExportReport};
