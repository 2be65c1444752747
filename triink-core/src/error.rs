/// Error types for loading meshes and configuration.
use std::path::PathBuf;
use thiserror::Error;

/// Result type for fallible TriInk operations.
pub type Result<T> = std::result::Result<T, TriinkError>;

/// Errors surfaced to the caller.
///
/// Malformed mesh lines are not errors; they are reported as parse
/// diagnostics and dropped.
#[derive(Debug, Error)]
pub enum TriinkError {
    /// The mesh source could not be read.
    #[error("failed to read mesh {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The mesh source is not UTF-8 text.
    #[error("mesh is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`crate::ViewerConfig`].
    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
