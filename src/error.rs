// src/error.rs
//! Fatal error kinds for both pipeline stages.
//!
//! Acquisition failures are deliberately absent here: they never leave the
//! acquirer (see [`crate::generate::AcquisitionFailure`]).

use std::path::PathBuf;

use crate::schema::SchemaViolation;

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Missing or invalid configuration (env values, schema file, fallback pool).
    #[error("configuration error: {0}")]
    Config(String),

    /// The deterministic fallback record itself does not satisfy the schema.
    #[error("fallback article #{index} is invalid: {violation}")]
    InvalidFallback {
        index: usize,
        #[source]
        violation: SchemaViolation,
    },

    /// Persisted feed does not have the `rss > channel` shape, or cannot be parsed.
    #[error("malformed feed {path:?}: {message}")]
    MalformedFeed { path: PathBuf, message: String },

    /// Handoff record between the stages is missing or unusable.
    #[error("item record {path:?}: {message}")]
    InvalidItem { path: PathBuf, message: String },

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not render {what}: {message}")]
    Render { what: &'static str, message: String },
}

pub type Result<T> = std::result::Result<T, FeedError>;

impl FeedError {
    /// Build a configuration error. Alternate formatting keeps `anyhow` context chains.
    pub fn config(msg: impl std::fmt::Display) -> Self {
        Self::Config(format!("{msg:#}"))
    }

    pub fn malformed(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::MalformedFeed {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit status, distinct per fatal kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            FeedError::Io { .. } | FeedError::Render { .. } => 1,
            FeedError::Config(_) => 2,
            FeedError::InvalidFallback { .. } => 3,
            FeedError::MalformedFeed { .. } => 4,
            FeedError::InvalidItem { .. } => 5,
        }
    }
}
