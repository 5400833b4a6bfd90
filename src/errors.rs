//! Error types for the fallible edges of fortimap.
//!
//! The scoring engine itself never fails: malformed inputs degrade to zero or
//! to a display sentinel and are reported through
//! [`Diagnostics`](crate::scoring::Diagnostics). Only loading snapshots and
//! configuration, and writing reports, can return a [`FortimapError`].
//!
//! # Example
//!
//! ```rust
//! use fortimap::errors::FortimapError;
//!
//! let err = FortimapError::config("variance threshold must be finite");
//! assert_eq!(
//!     err.to_string(),
//!     "Configuration error: variance threshold must be finite"
//! );
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fortimap operations
#[derive(Debug, Error)]
pub enum FortimapError {
    /// File system related errors
    #[error("File system error: {message}")]
    FileSystem {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Snapshot could not be decoded
    #[error("Snapshot parse error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// CSV encoding errors
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FortimapError {
    /// Create a file system error with path context
    pub fn file_system(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: Some(path.into()),
            source: Some(source),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Path involved in the failure, when known.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::FileSystem { path, .. } => path.as_ref(),
            _ => None,
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, FortimapError>;
