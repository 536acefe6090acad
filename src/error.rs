use std::path::PathBuf;

use thiserror::Error;

/// Fatal problems with the run's configuration.
///
/// Everything else (unreadable files, unresolvable specifiers) is recovered
/// locally and never surfaces as an error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("root directory does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("root is not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("failed to read config file {}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}", path.display())]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid exclude pattern `{pattern}`")]
    ExcludePattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("invalid alias `{0}`: expected PREFIX=DIR")]
    InvalidAlias(String),

    #[error("no source extensions configured")]
    NoExtensions,
}

impl ConfigError {
    /// True for the "root directory missing" family of errors.
    pub fn is_missing_root(&self) -> bool {
        matches!(self, Self::RootNotFound(_) | Self::RootNotDirectory(_))
    }
}
