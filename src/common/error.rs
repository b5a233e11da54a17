//! Unified error types for mapscribe.
//!
//! Only failures that abort an export (or a single symbol resolution) are
//! expressed as errors; everything that can be skipped at the layer, class or
//! style granularity goes through [`crate::common::Diagnostics`] instead.
use thiserror::Error;

/// Main error type for mapscribe operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parsing error
    #[error("XML error: {0}")]
    XmlError(String),

    /// An SVG references an embedded image that is neither a base64 data URI
    /// nor a safe relative file URI
    #[error("Invalid embedded image in SVG: {0}")]
    InvalidEmbeddedImage(String),

    /// Base64 payload of an embedded image could not be decoded
    #[error("Cannot decode embedded image data: {0}")]
    DecodeError(String),

    /// The mapfile could not be written to disk
    #[error("Cannot save mapfile to '{path}': {source}")]
    SaveFailed {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for mapscribe operations.
pub type Result<T> = std::result::Result<T, Error>;
