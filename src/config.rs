use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::parser::imports::ImportKind;
use crate::resolver::normalize_path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "modcycles.toml";

/// Directory scanned when neither the command line nor the config names one.
pub const DEFAULT_ROOT: &str = "src";

/// Source suffixes recognized by default, in resolution priority order.
pub const DEFAULT_EXTENSIONS: &[&str] = &["js", "mjs"];

/// Directory names never descended into: dependency caches, VCS metadata, vendored code.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    "node_modules",
    "bower_components",
    "vendor",
    ".git",
    ".hg",
    ".svn",
];

/// Configuration as written in `modcycles.toml`. Every key is optional.
///
/// Keys are snake_case; the camelCase spellings (`excludeDirs`, `aliasMap`, ...)
/// are accepted as aliases.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ModcyclesConfig {
    /// Directory to scan.
    pub root: Option<PathBuf>,
    /// Ordered source suffixes, with or without the leading dot.
    pub extensions: Option<Vec<String>>,
    /// Glob patterns matched against directory names.
    #[serde(alias = "excludeDirs")]
    pub exclude_dirs: Option<Vec<String>>,
    /// Honour `.gitignore` / `.ignore` files while scanning.
    #[serde(alias = "respectGitignore")]
    pub respect_gitignore: Option<bool>,
    /// Import syntaxes recognized by the extractor.
    #[serde(alias = "importSyntax")]
    pub import_syntax: Option<Vec<ImportKind>>,
    /// Non-relative specifier prefix -> directory.
    #[serde(alias = "aliasMap")]
    pub alias_map: Option<BTreeMap<String, PathBuf>>,
    /// Exit non-zero when cycles are found.
    pub strict: Option<bool>,
}

impl ModcyclesConfig {
    /// Load `modcycles.toml` from `dir` if it exists.
    ///
    /// Returns a default (empty) configuration if the file does not exist or cannot be parsed.
    pub fn load(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Self::default();
        }

        match Self::load_file(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    path = %config_path.display(),
                    error = %err,
                    "ignoring unusable config file, using defaults"
                );
                Self::default()
            }
        }
    }

    /// Load an explicitly named configuration file. Any failure is fatal.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str::<Self>(&contents).map_err(|source| ConfigError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Effective settings for one run, after merging defaults, the config file
/// and command-line overrides.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Root directory as given by the user; also the display prefix in reports.
    pub root: PathBuf,
    /// Extensions without the leading dot, in probe priority order.
    pub extensions: Vec<String>,
    pub exclude_dirs: Vec<String>,
    pub respect_gitignore: bool,
    pub import_syntax: Vec<ImportKind>,
    /// `(prefix, absolute directory)` pairs.
    pub alias_map: Vec<(String, PathBuf)>,
    pub strict: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_owned()).collect(),
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|d| (*d).to_owned()).collect(),
            respect_gitignore: false,
            import_syntax: ImportKind::DEFAULTS.to_vec(),
            alias_map: Vec::new(),
            strict: false,
        }
    }
}

impl ScanConfig {
    /// Layer a config file over the defaults.
    ///
    /// `base_dir` is the directory relative alias targets are resolved against
    /// (the directory holding the config file).
    pub fn from_file(file: ModcyclesConfig, base_dir: &Path) -> Self {
        let mut config = Self::default();

        if let Some(root) = file.root {
            config.root = root;
        }
        if let Some(extensions) = file.extensions {
            config.extensions = normalize_extensions(&extensions);
        }
        if let Some(exclude_dirs) = file.exclude_dirs {
            config.exclude_dirs = exclude_dirs;
        }
        if let Some(respect) = file.respect_gitignore {
            config.respect_gitignore = respect;
        }
        if let Some(syntax) = file.import_syntax {
            config.import_syntax = syntax;
        }
        if let Some(aliases) = file.alias_map {
            for (prefix, dir) in aliases {
                config.add_alias(prefix, &dir, base_dir);
            }
        }
        if let Some(strict) = file.strict {
            config.strict = strict;
        }

        config
    }

    /// Add an alias entry; a later entry with the same prefix replaces the earlier one.
    pub fn add_alias(&mut self, prefix: String, dir: &Path, base_dir: &Path) {
        let dir = if dir.is_absolute() {
            normalize_path(dir)
        } else {
            normalize_path(&base_dir.join(dir))
        };
        self.alias_map.retain(|(p, _)| *p != prefix);
        self.alias_map.push((prefix, dir));
    }

    /// Check invariants that would otherwise produce a silently empty graph.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extensions.is_empty() {
            return Err(ConfigError::NoExtensions);
        }
        Ok(())
    }
}

/// Strip leading dots, drop blanks and duplicates, keep first-seen order.
pub fn normalize_extensions(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for ext in raw {
        let ext = ext.trim().trim_start_matches('.');
        if ext.is_empty() || out.iter().any(|e| e == ext) {
            continue;
        }
        out.push(ext.to_owned());
    }
    out
}

/// Parse a `PREFIX=DIR` alias argument.
pub fn parse_alias(raw: &str) -> Result<(String, PathBuf), ConfigError> {
    match raw.split_once('=') {
        Some((prefix, dir)) if !prefix.is_empty() && !dir.is_empty() => {
            Ok((prefix.to_owned(), PathBuf::from(dir)))
        }
        _ => Err(ConfigError::InvalidAlias(raw.to_owned())),
    }
}
