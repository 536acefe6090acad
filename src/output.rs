use serde::Serialize;

/// Aggregate statistics produced by a scan.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ScanStats {
    pub file_count: usize,
    /// Files skipped due to read or decode errors.
    pub skipped: usize,
    /// Import specifiers extracted across all files.
    pub specifiers: usize,
    /// Specifiers resolved to a file on disk.
    pub resolved: usize,
    /// Non-relative specifiers with no alias (packages, built-ins).
    pub external: usize,
    /// Relative or aliased specifiers that matched no file.
    pub unresolved: usize,
    /// Resolved specifiers whose target was not among the scanned files.
    pub dropped: usize,
    /// Resolved imports that repeated an edge already recorded for the same file.
    pub duplicates: usize,
    /// Distinct file-to-file edges in the graph.
    pub edges: usize,
    pub cycles: usize,
    /// Wall-clock time for the run in seconds. Not serialized, so JSON output stays reproducible.
    #[serde(skip)]
    pub elapsed_secs: f64,
}

/// Print a cargo-style summary of the scan to **stderr**, keeping stdout
/// clean for the report.
pub fn print_summary(stats: &ScanStats) {
    eprintln!(
        "Scanned {} files in {:.2}s",
        stats.file_count, stats.elapsed_secs
    );
    eprintln!(
        "  {} imports: {} resolved, {} external, {} unresolved",
        stats.specifiers, stats.resolved, stats.external, stats.unresolved,
    );
    eprintln!(
        "  {} edges ({} duplicate imports collapsed, {} imports outside the scanned tree dropped)",
        stats.edges, stats.duplicates, stats.dropped,
    );
    eprintln!("  {} cycles", stats.cycles);

    if stats.skipped > 0 {
        eprintln!("  {} files skipped (unreadable)", stats.skipped);
    }
}
