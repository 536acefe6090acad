use std::path::PathBuf;
use std::time::Instant;

use rayon::prelude::*;

use crate::config::ScanConfig;
use crate::error::ConfigError;
use crate::graph::node::SourceFile;
use crate::graph::{ImportGraph, build_graph};
use crate::output::ScanStats;
use crate::parser::imports::ImportRules;
use crate::parser::parse_file_or_warn;
use crate::query::circular::{Cycle, find_circular};
use crate::resolver::{AliasMap, PathResolver, Resolution};
use crate::walker::{canonical_root, walk_project};

/// Everything one run produces.
pub struct Analysis {
    /// Canonical absolute scan root.
    pub root: PathBuf,
    pub graph: ImportGraph,
    /// Cycles in discovery order.
    pub cycles: Vec<Cycle>,
    pub stats: ScanStats,
}

/// Per-file result of the extract + resolve phase.
struct FileImports {
    skipped: bool,
    resolutions: Vec<Resolution>,
}

/// Run the full pipeline: scan, extract, resolve, build the graph, find cycles.
///
/// Extraction and resolution run in parallel across files; results are
/// collected back in scan order before the graph is built, so the output
/// does not depend on scheduling.
///
/// # Errors
/// Only configuration problems are errors: a missing root, an invalid
/// exclude pattern, an empty extension list. Unreadable files are skipped
/// with a warning.
#[tracing::instrument(skip_all, fields(root = %config.root.display()))]
pub fn analyze(config: &ScanConfig) -> Result<Analysis, ConfigError> {
    config.validate()?;
    let start = Instant::now();

    let root = canonical_root(&config.root)?;
    let files = walk_project(&root, config)?;
    tracing::debug!(files = files.len(), "scan complete");

    let rules = ImportRules::new(&config.import_syntax);
    let resolver = PathResolver::new(&config.extensions, canonical_aliases(config));

    let per_file: Vec<FileImports> = files
        .par_iter()
        .map(|file| extract_and_resolve(file, &rules, &resolver))
        .collect();

    let mut stats = ScanStats::default();
    let mut targets: Vec<Vec<SourceFile>> = Vec::with_capacity(files.len());
    for imports in per_file {
        if imports.skipped {
            stats.skipped += 1;
        }
        stats.specifiers += imports.resolutions.len();

        let mut file_targets = Vec::new();
        for resolution in imports.resolutions {
            match resolution {
                Resolution::Resolved(target) => {
                    stats.resolved += 1;
                    file_targets.push(target);
                }
                Resolution::External => stats.external += 1,
                Resolution::Unresolved => stats.unresolved += 1,
            }
        }
        targets.push(file_targets);
    }

    let (graph, build_stats) = build_graph(&files, &targets);
    stats.file_count = graph.file_count();
    stats.dropped = build_stats.dropped;
    stats.duplicates = build_stats.duplicates;
    stats.edges = graph.edge_count();

    let cycles = find_circular(&graph);
    stats.cycles = cycles.len();
    stats.elapsed_secs = start.elapsed().as_secs_f64();

    tracing::info!(
        files = stats.file_count,
        edges = stats.edges,
        cycles = stats.cycles,
        skipped = stats.skipped,
        "analysis complete"
    );

    Ok(Analysis {
        root,
        graph,
        cycles,
        stats,
    })
}

/// Alias directories in the same canonical form as scanned paths, so aliased
/// targets compare equal to scanned files. Missing directories are kept as-is
/// and simply never match.
fn canonical_aliases(config: &ScanConfig) -> AliasMap {
    let entries: Vec<(String, PathBuf)> = config
        .alias_map
        .iter()
        .map(|(prefix, dir)| {
            let dir = dir.canonicalize().unwrap_or_else(|_| {
                tracing::warn!(prefix = %prefix, dir = %dir.display(), "alias directory does not exist");
                dir.clone()
            });
            (prefix.clone(), dir)
        })
        .collect();
    AliasMap::new(&entries)
}

fn extract_and_resolve(
    file: &SourceFile,
    rules: &ImportRules,
    resolver: &PathResolver,
) -> FileImports {
    let Some(specifiers) = parse_file_or_warn(file.path(), rules) else {
        return FileImports {
            skipped: true,
            resolutions: Vec::new(),
        };
    };

    let resolutions = specifiers
        .iter()
        .map(|specifier| resolver.resolve(file, specifier))
        .collect();

    FileImports {
        skipped: false,
        resolutions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn config_for(dir: &TempDir) -> ScanConfig {
        ScanConfig {
            root: dir.path().join("src"),
            ..ScanConfig::default()
        }
    }

    fn cycle_names(analysis: &Analysis) -> Vec<Vec<String>> {
        analysis
            .cycles
            .iter()
            .map(|c| {
                c.files
                    .iter()
                    .map(|f| {
                        f.path()
                            .strip_prefix(&analysis.root)
                            .unwrap()
                            .to_string_lossy()
                            .replace('\\', "/")
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_detects_cycle_across_directories() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "src/apps/admin/api.js", "import { csrfToken } from './state.js';\n");
        write(root, "src/apps/admin/state.js", "import { t } from '../../shared/i18n';\n");
        write(root, "src/shared/i18n.js", "import { request } from '../apps/admin/api.js';\n");
        write(root, "src/shared/router.js", "import './i18n.js';\n");

        let analysis = analyze(&config_for(&dir)).unwrap();

        assert_eq!(analysis.stats.file_count, 4);
        assert_eq!(analysis.stats.edges, 4);
        assert_eq!(
            cycle_names(&analysis),
            vec![vec![
                "apps/admin/api.js",
                "apps/admin/state.js",
                "shared/i18n.js",
                "apps/admin/api.js",
            ]]
        );
    }

    #[test]
    fn test_edges_outside_root_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "src/a.js", "import x from '../lib/helper.js';\n");
        write(root, "lib/helper.js", "import a from '../src/a.js';\n");

        let analysis = analyze(&config_for(&dir)).unwrap();

        assert_eq!(analysis.stats.resolved, 1);
        assert_eq!(analysis.stats.dropped, 1);
        assert_eq!(analysis.graph.edge_count(), 0);
        assert!(analysis.cycles.is_empty());
    }

    #[test]
    fn test_non_relative_specifiers_never_produce_edges() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        // A file that happens to be named like the package must not be picked up.
        write(root, "src/react.js", "import app from 'app';\n");
        write(root, "src/app.js", "import React from 'react';\n");

        let analysis = analyze(&config_for(&dir)).unwrap();

        assert_eq!(analysis.stats.external, 2);
        assert_eq!(analysis.graph.edge_count(), 0);
        assert!(analysis.cycles.is_empty());
    }

    #[test]
    fn test_alias_map_enables_non_relative_edges() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "src/a.js", "import b from '@/b';\n");
        write(root, "src/b.js", "import a from '@/a';\n");

        let mut config = config_for(&dir);
        config.add_alias("@/".to_string(), &root.join("src"), root);
        let analysis = analyze(&config).unwrap();

        assert_eq!(cycle_names(&analysis), vec![vec!["a.js", "b.js", "a.js"]]);
    }

    #[test]
    fn test_unreadable_file_stays_a_node() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "src/a.js", "import b from './b.js';\n");
        fs::write(root.join("src/b.js"), b"import a from './a.js'; // \xff\n").unwrap();

        let analysis = analyze(&config_for(&dir)).unwrap();

        assert_eq!(analysis.stats.skipped, 1);
        assert_eq!(analysis.graph.file_count(), 2);
        assert_eq!(analysis.graph.edge_count(), 1);
        assert!(analysis.cycles.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_cycle_through_symlinked_module() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "src/a.js", "import x from './link';\n");
        write(root, "src/real.js", "import a from './a.js';\n");
        std::os::unix::fs::symlink(root.join("src/real.js"), root.join("src/link.js")).unwrap();

        let analysis = analyze(&config_for(&dir)).unwrap();

        assert_eq!(analysis.stats.file_count, 3);
        assert_eq!(analysis.stats.dropped, 0);
        assert_eq!(cycle_names(&analysis), vec![vec!["a.js", "link.js", "a.js"]]);
    }

    #[test]
    fn test_duplicate_imports_are_counted() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "src/a.js",
            "import { x } from './b';\nimport { y } from './b.js';\n",
        );
        write(dir.path(), "src/b.js", "export const x = 1;\n");

        let analysis = analyze(&config_for(&dir)).unwrap();

        assert_eq!(analysis.stats.resolved, 2);
        assert_eq!(analysis.stats.duplicates, 1);
        assert_eq!(analysis.stats.edges, 1);
    }

    #[test]
    fn test_unresolved_relative_specifier_is_counted() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/a.js", "import x from './missing';\n");

        let analysis = analyze(&config_for(&dir)).unwrap();

        assert_eq!(analysis.stats.specifiers, 1);
        assert_eq!(analysis.stats.unresolved, 1);
        assert_eq!(analysis.graph.edge_count(), 0);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = analyze(&config_for(&dir)).err().expect("missing root must fail");
        assert!(matches!(err, ConfigError::RootNotFound(_)));
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for i in 0..20 {
            let next = (i + 1) % 20;
            let back = (i + 7) % 20;
            write(
                root,
                &format!("src/m{i:02}.js"),
                &format!("import a from './m{next:02}';\nimport b from './m{back:02}.js';\n"),
            );
        }

        let first = analyze(&config_for(&dir)).unwrap();
        let second = analyze(&config_for(&dir)).unwrap();
        assert!(!first.cycles.is_empty());
        assert_eq!(first.cycles, second.cycles);
    }
}
