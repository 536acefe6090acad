use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use crate::config::{ScanConfig, normalize_extensions, parse_alias};
use crate::error::ConfigError;
use crate::parser::imports::ImportKind;

/// Detect circular module dependencies in a JavaScript source tree.
///
/// modcycles scans ROOT for source files, extracts their import statements,
/// resolves relative specifiers to files and reports every import cycle a
/// depth-first traversal of the resulting graph discovers.
#[derive(Parser, Debug)]
#[command(name = "modcycles", version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan [default: `root` from modcycles.toml, else `src`].
    pub root: Option<PathBuf>,

    /// Configuration file [default: ./modcycles.toml if present].
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Source extensions in resolution priority order; replaces the configured list (comma-separated).
    #[arg(long, value_delimiter = ',', value_name = "EXT")]
    pub ext: Vec<String>,

    /// Additional directory-name glob patterns to skip (comma-separated).
    #[arg(long, value_delimiter = ',', value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Map a non-relative specifier prefix to a directory (repeatable).
    #[arg(long, value_name = "PREFIX=DIR")]
    pub alias: Vec<String>,

    /// Import syntaxes to recognize; replaces the configured set (comma-separated).
    #[arg(long, value_enum, value_delimiter = ',', value_name = "KIND")]
    pub syntax: Vec<ImportKind>,

    /// Honour .gitignore and .ignore files while scanning.
    #[arg(long)]
    pub gitignore: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Compact)]
    pub format: OutputFormat,

    /// Exit with status 2 when at least one cycle is found.
    #[arg(long)]
    pub strict: bool,

    /// Print a run summary to stderr.
    #[arg(long)]
    pub stats: bool,

    /// Enable debug logging on stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format for the report.
#[derive(Clone, Debug, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `Found N circular dependencies:` followed by one `a -> b -> a` line per cycle (default).
    #[default]
    Compact,
    /// Pretty-printed JSON object with cycles and run statistics.
    Json,
    /// Graphviz digraph of the whole import graph with cycle edges highlighted.
    Dot,
}

impl Cli {
    /// Apply command-line overrides on top of `config`.
    ///
    /// Relative `--alias` directories are resolved against `cwd`.
    pub fn apply(&self, config: &mut ScanConfig, cwd: &Path) -> Result<(), ConfigError> {
        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if !self.ext.is_empty() {
            config.extensions = normalize_extensions(&self.ext);
        }
        for pattern in &self.exclude {
            if !config.exclude_dirs.contains(pattern) {
                config.exclude_dirs.push(pattern.clone());
            }
        }
        for raw in &self.alias {
            let (prefix, dir) = parse_alias(raw)?;
            config.add_alias(prefix, &dir, cwd);
        }
        if !self.syntax.is_empty() {
            config.import_syntax = self.syntax.clone();
        }
        if self.gitignore {
            config.respect_gitignore = true;
        }
        if self.strict {
            config.strict = true;
        }
        Ok(())
    }
}
