//! Accumulating diagnostics for recoverable export failures.
//!
//! Unsupported renderer or symbol-layer kinds, undecodable SVG symbols,
//! ambiguous wrap characters and similar conditions never abort an export.
//! Each one is recorded here, mirrored to the `log` facade, and returned to
//! the caller alongside the export result.

use serde::Serialize;

/// A single recoverable failure recorded during an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Component that produced the message (e.g. `"renderer"`, `"label"`)
    pub source: &'static str,
    /// Human-readable description of what was skipped and why
    pub message: String,
}

/// Ordered collection of diagnostics produced by one export run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collector.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a recoverable failure and mirror it to the logging facade.
    pub fn warn(&mut self, source: &'static str, message: impl Into<String>) {
        let message = message.into();
        log::warn!(target: "mapscribe", "{source}: {message}");
        self.entries.push(Diagnostic { source, message });
    }

    /// Whether any diagnostic has been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of recorded diagnostics.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over recorded diagnostics in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Consume the collector and return the recorded diagnostics.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
