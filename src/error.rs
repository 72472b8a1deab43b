//! Error types for the content pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning content files into posts
#[derive(Error, Debug)]
pub enum ContentError {
    /// The front-matter block is missing or cannot be parsed.
    /// The file is skipped; a batch load never fails because of it.
    #[error("Malformed content: {0}")]
    Malformed(String),

    /// The content directory cannot be listed
    #[error("Content directory {path:?} is unavailable: {source}")]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single content file cannot be read
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ContentError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        ContentError::Malformed(reason.into())
    }
}

impl From<serde_yaml::Error> for ContentError {
    fn from(e: serde_yaml::Error) -> Self {
        ContentError::Malformed(format!("invalid front-matter: {}", e))
    }
}
