pub mod imports;

use std::path::Path;

use anyhow::{Context, Result};

use imports::ImportRules;

/// Read a source file and extract its import specifiers in order of appearance.
///
/// # Errors
/// Returns an error if the file cannot be read or is not valid UTF-8.
pub fn parse_file(path: &Path, rules: &ImportRules) -> Result<Vec<String>> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let source = String::from_utf8(bytes)
        .with_context(|| format!("{} is not valid UTF-8", path.display()))?;
    Ok(rules.extract_specifiers(&source))
}

/// Like [`parse_file`], but unreadable files are logged and yield `None`.
///
/// A skipped file stays in the graph as a node without outgoing edges.
pub fn parse_file_or_warn(path: &Path, rules: &ImportRules) -> Option<Vec<String>> {
    match parse_file(path, rules) {
        Ok(specifiers) => Some(specifiers),
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "skipping unreadable file");
            None
        }
    }
}
