//! Error types shared across the crate

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for mshuf operations
#[derive(Error, Debug)]
pub enum MshufError {
    /// Profile could not be read, written, or parsed
    #[error("profile error: {0}")]
    Profile(String),

    /// A root reference did not resolve to a configured root
    #[error("unknown root: {0}")]
    UnknownRoot(String),

    /// An operation needed a root but none was given or remembered
    #[error("no root selected (add one with 'mshuf add <path>' or pass a root)")]
    NoRootSelected,

    /// Attempted to register a path that is already a configured root
    #[error("root already registered: {0}")]
    DuplicateRoot(String),

    /// A root reference matched more than one configured root
    #[error("ambiguous root reference '{reference}': matches {matches:?}")]
    AmbiguousRoot {
        reference: String,
        matches: Vec<String>,
    },

    /// Listing a directory failed
    #[error(transparent)]
    List(#[from] ListError),

    /// Launching the external viewer failed after all fallbacks
    #[error(transparent)]
    Launch(#[from] LaunchError),

    /// A setting value was rejected
    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Why a directory listing failed.
///
/// Callers branch on these: a missing root aborts the operation, while an
/// existing-but-empty directory is an ordinary `Ok(vec![])`.
#[derive(Error, Debug)]
pub enum ListError {
    #[error("directory not found: {0}")]
    NotFound(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Launch failures. The selection is already committed when these occur.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// Neither the configured app nor the platform default could open the file
    #[error("no handler could open the file (intended app: {app})")]
    NoHandler { app: String },
}

pub type Result<T> = std::result::Result<T, MshufError>;
