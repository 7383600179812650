//! Error types for permtx.
//!
//! All operations return `Result<T>` which aliases `Result<T, PermError>`.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from permission operations.
#[derive(Debug, Error)]
pub enum PermError {
    /// Path missing, or an entry disappeared between discovery and mutation.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// Insufficient rights to stat, chmod or chown a path.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// A syscall was interrupted by a signal. Surfaced, never retried.
    #[error("Interrupted while operating on {0}")]
    Interrupted(PathBuf),

    /// The root of a tree operation is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Invalid mode argument.
    #[error("Invalid mode '{0}': {1}")]
    InvalidMode(String, String),

    /// Invalid owner argument.
    #[error("Invalid owner '{0}': {1}")]
    InvalidOwner(String, String),

    /// Rollback after a failed commit could not restore every entry.
    #[error("Rollback failed: {0}")]
    RollbackFailed(String),

    /// User declined confirmation.
    ///
    /// Not a failure—used for control flow when user cancels.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// File system operation failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Unexpected error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PermError {
    /// Classifies an I/O error against the path it occurred on.
    ///
    /// `NotFound`, `PermissionDenied` and `Interrupted` become their typed
    /// variants so callers can match on them; everything else stays `Io`.
    pub fn classify(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => PermError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => PermError::PermissionDenied(path.to_path_buf()),
            io::ErrorKind::Interrupted => PermError::Interrupted(path.to_path_buf()),
            _ => PermError::Io(io::Error::new(
                err.kind(),
                format!("{}: {}", path.display(), err),
            )),
        }
    }
}

/// Result type alias for permtx operations.
pub type Result<T> = std::result::Result<T, PermError>;
