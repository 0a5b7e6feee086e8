//! Error types for setup operations.
//!
//! Library functions return [`SetupError`]; the prompt flow and the binary
//! wrap them in `anyhow` with context.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for devsetup operations.
#[derive(Debug, Error)]
pub enum SetupError {
    /// No `package.json` in the target directory.
    #[error("No package.json found in {}", dir.display())]
    ManifestNotFound { dir: PathBuf },

    /// `package.json` exists but is not a JSON object.
    #[error("Failed to parse {}: {message}", path.display())]
    ManifestParse { path: PathBuf, message: String },

    /// A static template asset is missing from the binary.
    #[error("Template asset '{name}' is missing; this build of devsetup is broken")]
    AssetNotFound { name: String },

    /// Writing a generated file failed.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for setup operations.
pub type Result<T> = std::result::Result<T, SetupError>;
