//! Renderer serialization.
//!
//! Translates a source layer's renderer into target classes: one class for a
//! single-symbol renderer, one per category or range otherwise, each with a
//! filter expression selecting its features.

use crate::common::Diagnostics;
use crate::mapfile::{SymbolSet, TargetClass, TargetLayer};
use crate::model::{Renderer, Symbol};
use crate::style::symbol_layer::serialize_symbol;

/// Serialize a renderer into classes on `layer`.
pub fn serialize_renderer(
    renderer: &Renderer,
    layer: &mut TargetLayer,
    symbols: &mut SymbolSet,
    diag: &mut Diagnostics,
) {
    match renderer {
        Renderer::SingleSymbol { symbol } => {
            push_class(symbol, None, None, layer, symbols, diag);
        },
        Renderer::Categorized {
            attribute,
            categories,
        } => {
            for (index, category) in categories.iter().enumerate() {
                let expression = format!("(\"[{attribute}]\" = \"{}\")", category.value);
                push_class(
                    &category.symbol,
                    Some(expression),
                    Some(index),
                    layer,
                    symbols,
                    diag,
                );
            }
        },
        Renderer::Graduated { attribute, ranges } => {
            for (index, range) in ranges.iter().enumerate() {
                // '>=' on the first range only, so the lowest value is
                // included exactly once across the contiguous ranges
                let lower_cmp = if index == 0 { ">=" } else { ">" };
                let expression = format!(
                    "(([{attribute}] {lower_cmp} {:.6}) And ([{attribute}] <= {:.6}))",
                    range.lower, range.upper
                );
                push_class(
                    &range.symbol,
                    Some(expression),
                    Some(index),
                    layer,
                    symbols,
                    diag,
                );
            }
        },
    }
}

fn push_class(
    symbol: &Symbol,
    expression: Option<String>,
    ordinal: Option<usize>,
    layer: &mut TargetLayer,
    symbols: &mut SymbolSet,
    diag: &mut Diagnostics,
) {
    let mut class = TargetClass::new();
    class.expression = expression;
    serialize_symbol(symbol, &mut class, layer, symbols, diag);
    if let Some(index) = ordinal {
        // ordinal suffix keeps class names unique within the layer
        class.name = format!("{}_{index}", class.name);
    }
    layer.classes.push(class);
}
