//! Style serialization: renderers, symbol layers, markers, SVG symbols and
//! labels.

pub mod label;
pub mod markers;
pub mod pens;
pub mod renderer;
pub mod svg;
pub mod symbol_layer;

pub use label::serialize_label;
pub use renderer::serialize_renderer;
pub use svg::resolve_svg_symbol;
pub use symbol_layer::serialize_symbol;
