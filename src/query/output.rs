use std::fmt::Write;
use std::path::Path;

use serde::Serialize;

use crate::analysis::Analysis;
use crate::cli::OutputFormat;
use crate::export::dot::render_dot;
use crate::graph::node::SourceFile;
use crate::output::ScanStats;
use crate::query::circular::Cycle;

/// Maps canonical file paths back to the form the user wrote: the root as
/// given on the command line joined with the path relative to the scan root.
pub struct DisplayNames<'a> {
    canonical_root: &'a Path,
    display_root: &'a Path,
}

impl<'a> DisplayNames<'a> {
    pub fn new(canonical_root: &'a Path, display_root: &'a Path) -> Self {
        Self {
            canonical_root,
            display_root,
        }
    }

    /// Display name for `file`; files outside the root fall back to their full path.
    pub fn name(&self, file: &SourceFile) -> String {
        match file.path().strip_prefix(self.canonical_root) {
            Ok(rel) => self.display_root.join(rel).to_string_lossy().into_owned(),
            Err(_) => file.path().to_string_lossy().into_owned(),
        }
    }

    /// The root as written by the user, with a trailing separator.
    pub fn root_label(&self) -> String {
        let root = self.display_root.to_string_lossy();
        let trimmed = root.trim_end_matches(['/', '\\']);
        if trimmed.is_empty() {
            root.into_owned()
        } else {
            format!("{trimmed}/")
        }
    }
}

/// Render the report for `analysis` in the requested format.
pub fn format_report(
    analysis: &Analysis,
    names: &DisplayNames<'_>,
    format: &OutputFormat,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Compact => Ok(format_circular_compact(&analysis.cycles, names)),
        OutputFormat::Json => format_circular_json(&analysis.cycles, &analysis.stats, names),
        OutputFormat::Dot => Ok(render_dot(&analysis.graph, &analysis.cycles, names)),
    }
}

/// The line-oriented report consumed by other tools.
///
/// ```text
/// Found 1 circular dependencies:
/// src/a.js -> src/b.js -> src/a.js
/// ```
///
/// With no cycles: `No circular dependencies found in src/`.
pub fn format_circular_compact(cycles: &[Cycle], names: &DisplayNames<'_>) -> String {
    let mut out = String::new();

    if cycles.is_empty() {
        writeln!(out, "No circular dependencies found in {}", names.root_label()).unwrap();
        return out;
    }

    writeln!(out, "Found {} circular dependencies:", cycles.len()).unwrap();
    for cycle in cycles {
        let parts: Vec<String> = cycle.files.iter().map(|f| names.name(f)).collect();
        writeln!(out, "{}", parts.join(" -> ")).unwrap();
    }
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    root: String,
    cycle_count: usize,
    cycles: Vec<Vec<String>>,
    stats: &'a ScanStats,
}

/// Pretty-printed JSON object with the cycles as arrays of display names.
pub fn format_circular_json(
    cycles: &[Cycle],
    stats: &ScanStats,
    names: &DisplayNames<'_>,
) -> serde_json::Result<String> {
    let report = JsonReport {
        root: names.root_label(),
        cycle_count: cycles.len(),
        cycles: cycles
            .iter()
            .map(|c| c.files.iter().map(|f| names.name(f)).collect())
            .collect(),
        stats,
    };
    let mut json = serde_json::to_string_pretty(&report)?;
    json.push('\n');
    Ok(json)
}
