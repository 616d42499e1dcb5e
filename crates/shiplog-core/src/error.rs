//! Error types for shiplog

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ShiplogError
pub type Result<T> = std::result::Result<T, ShiplogError>;

/// Main error type for shiplog operations
#[derive(Debug, Error)]
pub enum ShiplogError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Git-related errors
    #[error(transparent)]
    Git(#[from] GitError),

    /// Changelog-related errors
    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    /// Classification service errors
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// TOML parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Git-related errors
///
/// `NotARepository` and `OpenFailed` signal that no usable version control
/// is available; callers degrade to a tag-less, commit-less run rather
/// than aborting.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// No commits found
    #[error("No commits found in repository")]
    NoCommits,

    /// Unknown commit reference
    #[error("Unknown commit reference: {0}")]
    UnknownReference(String),

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

impl GitError {
    /// Whether the error means version control is unavailable entirely,
    /// as opposed to a query against a working repository failing.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::NotARepository(_) | Self::OpenFailed(_))
    }
}

/// Changelog-related errors
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// Existing changelog file does not parse as expected structure.
    /// Recovered by starting from an empty document.
    #[error("Malformed changelog document: {0}")]
    MalformedDocument(String),

    /// Final write failed. Fatal; the atomic write leaves no partial file.
    #[error("Failed to write changelog to {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Remote classification service errors
///
/// Always recovered by falling back to local classification; never
/// propagated out of the classifier.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// Service rejected the API key
    #[error("Classification service rejected the API key")]
    Unauthorized,

    /// Service returned an unexpected payload
    #[error("Invalid response from classification service: {0}")]
    InvalidResponse(String),

    /// Transport-level failure (timeout, connection refused, DNS)
    #[error("Classification service unreachable: {0}")]
    Http(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_error_unavailable() {
        assert!(GitError::NotARepository(PathBuf::from("/tmp/x")).is_unavailable());
        assert!(GitError::OpenFailed("boom".into()).is_unavailable());
        assert!(!GitError::NoCommits.is_unavailable());
    }

    #[test]
    fn test_error_conversion() {
        let err: ShiplogError = GitError::NoCommits.into();
        assert!(matches!(err, ShiplogError::Git(_)));
    }
}
