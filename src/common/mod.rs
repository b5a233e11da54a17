//! Shared infrastructure: errors, diagnostics, units, colors, identifiers.

pub mod color;
pub mod diag;
pub mod error;
pub mod id;
pub mod unit;

pub use color::RgbaColor;
pub use diag::{Diagnostic, Diagnostics};
pub use error::{Error, Result};
pub use unit::SizeUnit;
