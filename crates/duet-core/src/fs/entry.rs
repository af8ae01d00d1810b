//! Directory entry representation.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use unicode_normalization::UnicodeNormalization;

use crate::error::{CoreError, CoreResult};

/// Name of the synthetic parent-navigation row.
pub const PARENT_NAME: &str = "..";

/// A single child of a listed directory.
///
/// `DirEntry` is an immutable snapshot taken at listing time. Directory
/// sizes are reported as `0`.
///
/// # Examples
///
/// ```no_run
/// use duet_core::DirEntry;
/// use std::path::Path;
///
/// let entry = DirEntry::from_path(Path::new("Cargo.toml")).unwrap();
/// assert_eq!(entry.name(), "Cargo.toml");
/// assert!(!entry.is_dir());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    path: PathBuf,
    name: String,
    size: u64,
    modified: Option<SystemTime>,
    is_dir: bool,
    is_link: bool,
    is_hidden: bool,
    is_executable: bool,
}

impl DirEntry {
    /// Reads the metadata of `path` and classifies it.
    ///
    /// `is_dir` follows symlinks; `is_link` describes the entry itself.
    /// A dangling symlink is reported as a non-directory link with the
    /// size of the link itself.
    ///
    /// # Errors
    ///
    /// Returns the classified I/O error when `path` cannot be `lstat`ed.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let link_meta = std::fs::symlink_metadata(path).map_err(|e| CoreError::from_io(path, e))?;
        let is_link = link_meta.file_type().is_symlink();
        let meta = if is_link {
            std::fs::metadata(path).unwrap_or(link_meta)
        } else {
            link_meta
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().nfc().collect::<String>())
            .unwrap_or_default();
        let is_dir = meta.is_dir();

        Ok(Self {
            path: path.to_path_buf(),
            is_hidden: name.starts_with('.'),
            name,
            size: if is_dir { 0 } else { meta.len() },
            modified: meta.modified().ok(),
            is_dir,
            is_link,
            is_executable: is_executable(&meta),
        })
    }

    /// Creates the synthetic `..` row for a listing of `dir`.
    ///
    /// The row points at the parent directory and has no meaningful size;
    /// its timestamp is the parent's when it can be read.
    pub fn parent_link(dir: &Path) -> Self {
        let parent = dir.parent().unwrap_or(dir);
        Self {
            path: dir.join(PARENT_NAME),
            name: PARENT_NAME.to_string(),
            size: 0,
            modified: std::fs::metadata(parent).and_then(|m| m.modified()).ok(),
            is_dir: true,
            is_link: false,
            is_hidden: false,
            is_executable: false,
        }
    }

    /// Builds an entry from already-known attributes.
    ///
    /// Used by tests and by callers that synthesise listings without
    /// touching the filesystem.
    pub fn from_parts(
        path: PathBuf,
        size: u64,
        modified: Option<SystemTime>,
        is_dir: bool,
        is_link: bool,
        is_executable: bool,
    ) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().nfc().collect::<String>())
            .unwrap_or_else(|| PARENT_NAME.to_string());
        Self {
            is_hidden: name.starts_with('.') && name != PARENT_NAME,
            name,
            path,
            size: if is_dir { 0 } else { size },
            modified,
            is_dir,
            is_link,
            is_executable,
        }
    }

    /// Returns the full path of this entry.
    ///
    /// For the `..` row this is `<dir>/..`, not the resolved parent.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the entry name (last component of the path).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the file size in bytes. Always `0` for directories.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the last-modified time, if available.
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// Returns `true` if the entry resolves to a directory.
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Returns `true` if the entry itself is a symbolic link.
    pub fn is_link(&self) -> bool {
        self.is_link
    }

    /// Returns `true` if the name starts with `.`.
    pub fn is_hidden(&self) -> bool {
        self.is_hidden
    }

    /// Returns `true` if any execute bit is set, directories included.
    /// Follows symlinks like [`DirEntry::is_dir`].
    pub fn is_executable(&self) -> bool {
        self.is_executable
    }

    /// Returns `true` for the synthetic `..` row.
    pub fn is_parent_link(&self) -> bool {
        self.name == PARENT_NAME
    }
}

#[cfg(unix)]
fn is_executable(meta: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &std::fs::Metadata) -> bool {
    false
}
