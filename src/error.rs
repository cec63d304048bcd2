//! Error types for clip loading and dataset building.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;

/// Errors that can occur while loading clips or building a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("malformed clip {path}: {reason}")]
    MalformedClip { path: PathBuf, reason: String },

    #[error("feature dimension mismatch: expected {expected}, found {found} in {path}")]
    DimensionMismatch {
        expected: usize,
        found: usize,
        path: PathBuf,
    },

    #[error("no usable clips found under any root")]
    NoClips,

    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("archive invalid: {0}")]
    InvalidArchive(String),

    #[error("artifact pair mismatch: dataset build {dataset} vs encoder build {encoder}")]
    ArtifactMismatch { dataset: String, encoder: String },

    #[error("frame dimension mismatch: window expects {expected}, got {found}")]
    WindowDimension { expected: usize, found: usize },
}

impl DatasetError {
    /// Create a malformed-clip error.
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedClip {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Wrap an io::Error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
