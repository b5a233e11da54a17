//! Textual post-processing of the saved mapfile.
//!
//! Runs after the document is on disk: collects every FONT reference,
//! rewrites font names to space-free aliases, optionally writes the alias
//! list to a sibling `fonts.txt`, and injects the FONTSET directive right
//! after the opening `MAP` keyword. Working on text rather than the model
//! keeps this pass independent of whether the referenced fontset paths exist
//! on the exporting machine.

use std::fs;
use std::path::Path;

use crate::common::{Diagnostics, Result};

const DIAG_SOURCE: &str = "postprocess";

/// Extract the quoted font name from a `FONT "..."` line.
///
/// `FONTSET` lines do not match: the keyword must be followed by
/// whitespace.
fn font_name(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix("FONT")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start().strip_prefix('"')?;
    rest.split_once('"').map(|(name, _)| name)
}

/// Post-process the mapfile at `path` in place.
///
/// Returns the font aliases in order of first appearance. The file is only
/// rewritten when at least one line actually changed.
pub fn postprocess_mapfile(
    path: &Path,
    create_font_file: bool,
    fontset_path: Option<&Path>,
    diag: &mut Diagnostics,
) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    let mut lines: Vec<String> = contents.lines().map(str::to_string).collect();
    let mut changed = false;

    // Collect referenced fonts in order of first appearance. A font whose
    // alias is already taken keeps its original name; first owner wins.
    let mut aliases: Vec<String> = Vec::new();
    let mut renames: Vec<(String, String)> = Vec::new();
    for line in &lines {
        if let Some(name) = font_name(line) {
            let alias = name.replace(' ', "");
            if !aliases.contains(&alias) {
                aliases.push(alias.clone());
                if alias != name {
                    renames.push((name.to_string(), alias));
                }
            }
        }
    }

    // Rewrite every line referencing a renamed font, by exact quoted match.
    // Fonts can reach the mapfile with embedded spaces (SLD styles refer to
    // fonts by display name), which a fontset alias cannot carry.
    for (name, alias) in &renames {
        let needle = format!("\"{name}\"");
        let replacement = format!("\"{alias}\"");
        for line in &mut lines {
            if font_name(line) == Some(name.as_str()) {
                *line = line.replacen(&needle, &replacement, 1);
                changed = true;
            }
        }
    }

    if create_font_file {
        let fonts_path = match path.parent() {
            Some(dir) => dir.join("fonts.txt"),
            None => Path::new("fonts.txt").to_path_buf(),
        };
        let mut body = aliases.join("\n");
        if !body.is_empty() {
            body.push('\n');
        }
        fs::write(fonts_path, body)?;
    }

    if let Some(fontset) = fontset_path {
        let already_present = lines
            .iter()
            .any(|line| line.trim_start().starts_with("FONTSET"));
        if !already_present {
            // Anchor on the document's opening keyword, exactly `MAP`
            match lines.iter().position(|line| line.trim_end() == "MAP") {
                Some(pos) => {
                    lines.insert(pos + 1, format!("  FONTSET \"{}\"", fontset.display()));
                    changed = true;
                },
                None => diag.warn(
                    DIAG_SOURCE,
                    "FONTSET keyword not added to the mapfile: unable to locate the MAP keyword",
                ),
            }
        }
    }

    if changed {
        let mut body = lines.join("\n");
        body.push('\n');
        fs::write(path, body)?;
    }

    Ok(aliases)
}
