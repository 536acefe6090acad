use std::path::{Path, PathBuf};

use crate::config::ScanConfig;
use crate::error::ConfigError;
use crate::graph::node::SourceFile;
use crate::resolver::probe::has_suffix;

/// Resolve the configured root to its canonical absolute form.
///
/// A missing root is a configuration error, never an empty scan.
pub fn canonical_root(root: &Path) -> Result<PathBuf, ConfigError> {
    if !root.exists() {
        return Err(ConfigError::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ConfigError::RootNotDirectory(root.to_path_buf()));
    }
    root.canonicalize()
        .map_err(|_| ConfigError::RootNotFound(root.to_path_buf()))
}

/// Walk `root` and collect candidate source files, sorted by path.
///
/// Never descends into directories whose name matches one of
/// `config.exclude_dirs` (glob patterns). Hidden files are included;
/// `.gitignore` rules apply only with `config.respect_gitignore`.
/// Symlinked files are listed under their own path; symlinked directories are
/// not descended into. Unreadable directories and entries are skipped with a
/// warning.
pub fn walk_project(root: &Path, config: &ScanConfig) -> Result<Vec<SourceFile>, ConfigError> {
    let excludes = compile_excludes(&config.exclude_dirs)?;

    let mut builder = ignore::WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .follow_links(false)
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            // Depth 0 is the root itself, which is never excluded.
            !(is_dir && entry.depth() > 0 && is_excluded_dir(entry.file_name(), &excludes))
        });
    if config.respect_gitignore {
        builder
            .git_ignore(true)
            .git_exclude(true)
            .ignore(true)
            // Read .gitignore files even when the directory is not inside a git repository.
            .require_git(false);
    }

    let mut files = Vec::new();
    for result in builder.build() {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };

        if !is_source_candidate(&entry) {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            tracing::warn!(path = %entry.path().display(), "skipping non UTF-8 file name");
            continue;
        };
        if !config.extensions.iter().any(|ext| has_suffix(name, ext)) {
            continue;
        }

        tracing::trace!(path = %entry.path().display(), "discovered");
        files.push(SourceFile::new(entry.into_path()));
    }

    files.sort();
    Ok(files)
}

/// Regular files, and symlinks that point at one. The resolver follows links,
/// so a link must be a node for imports through it to become edges.
fn is_source_candidate(entry: &ignore::DirEntry) -> bool {
    match entry.file_type() {
        Some(ft) if ft.is_file() => true,
        Some(ft) if ft.is_symlink() => entry.path().is_file(),
        _ => false,
    }
}

fn compile_excludes(patterns: &[String]) -> Result<Vec<glob::Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            glob::Pattern::new(pattern).map_err(|source| ConfigError::ExcludePattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

/// Returns true if the directory name matches any exclusion pattern.
fn is_excluded_dir(name: &std::ffi::OsStr, excludes: &[glob::Pattern]) -> bool {
    let Some(name) = name.to_str() else {
        return false;
    };
    excludes.iter().any(|pattern| pattern.matches(name))
}
