//! Error types for `duet-core`.
//!
//! All fallible operations in the core library return [`CoreResult<T>`],
//! which is an alias for `Result<T, CoreError>`. Batch operations wrap a
//! `CoreError` per failed entry in [`crate::batch::OpError`].

use std::path::{Path, PathBuf};

/// Unified error type for all core operations.
///
/// Each variant captures just enough context for the caller to display
/// a meaningful message or take corrective action.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The target path does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The process lacks permission to access the path.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// A directory was expected but the path points to something else.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The destination of a copy or move is already taken.
    #[error("already exists: {0}")]
    AlreadyExists(PathBuf),

    /// A file or directory name is invalid (empty, `.`/`..`, absolute, etc.).
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// A glob filter could not be compiled.
    #[error("invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// A directory cannot be copied or moved into its own subtree.
    #[error("cannot copy or move {0} into itself")]
    IntoItself(PathBuf),

    /// The request is not valid in the current application state.
    #[error("{0}")]
    InvalidOperation(String),

    /// The trash facility refused or failed to take the path.
    #[error("trash error: {0}")]
    Trash(String),

    /// Failed to parse a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Classifies an I/O error raised while touching `path`.
    ///
    /// `NotFound` and `PermissionDenied` keep the offending path so the
    /// message is useful without the original `io::Error`.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            std::io::ErrorKind::AlreadyExists => Self::AlreadyExists(path.to_path_buf()),
            _ => Self::Io(err),
        }
    }

    /// Returns `true` for the failures a directory listing can raise when
    /// the directory itself cannot be opened.
    pub fn is_access_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::PermissionDenied(_) | Self::NotADirectory(_)
        )
    }
}

/// Convenience alias used throughout `duet-core`.
pub type CoreResult<T> = Result<T, CoreError>;
