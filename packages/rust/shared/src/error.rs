//! Error types for the course catalog tools.
//!
//! Library crates use [`CatalogError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Configuration loading or validation error (including bad term input).
    #[error("config error: {message}")]
    Config { message: String },

    /// Transport failure before any HTTP status was received.
    #[error("network error: {0}")]
    Network(String),

    /// The catalog server answered with a non-success status.
    #[error("HTTP {status} while fetching {url}")]
    Http { status: u16, url: String },

    /// The listing page could not be interpreted.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// CSV export rejected its input before writing anything.
    #[error("export error: {0}")]
    Export(#[from] ExportViolation),

    /// CSV encoding failure.
    #[error("csv error: {0}")]
    Csv(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Reasons the CSV serializer refuses a batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportViolation {
    #[error("file name must not be empty")]
    EmptyFileName,

    #[error("record batch must not be empty")]
    EmptyBatch,

    #[error("header must not be empty")]
    EmptyHeader,

    #[error("header has {found} columns, expected {expected}")]
    HeaderWidth { expected: usize, found: usize },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// HTTP status code, when the failure came from the server.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
