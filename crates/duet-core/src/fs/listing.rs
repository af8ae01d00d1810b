//! Directory reading: one level of children plus size/count aggregates.

use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};
use crate::fs::entry::DirEntry;
use crate::nav::glob::GlobPattern;

/// Size and counts of a listing, `..` excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirTotals {
    /// Sum of file sizes (directories count as `0`).
    pub total_size: u64,
    /// Number of non-directory entries.
    pub file_count: usize,
    pub dir_count: usize,
}

impl DirTotals {
    /// Human-readable summary line: `"4.0 KB in 3 files | 2 dirs"`.
    pub fn summary(&self) -> String {
        format!(
            "{} in {} files | {} dirs",
            format_size(self.total_size),
            self.file_count,
            self.dir_count
        )
    }
}

/// The result of reading one directory.
///
/// Entry order is unspecified; apply [`crate::nav::sort::sort_entries`]
/// before display. Unless the directory is a filesystem root, the
/// synthetic `..` row is present exactly once and is excluded from the
/// aggregates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirList {
    path: PathBuf,
    entries: Vec<DirEntry>,
    totals: DirTotals,
}

impl DirList {
    /// The directory that was read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All rows, including `..` when present.
    pub fn entries(&self) -> &[DirEntry] {
        &self.entries
    }

    /// Consumes the listing, returning its rows.
    pub fn into_entries(self) -> Vec<DirEntry> {
        self.entries
    }

    /// Aggregates over the listed rows.
    pub fn totals(&self) -> DirTotals {
        self.totals
    }

    /// Sum of file sizes (directories count as `0`).
    pub fn total_size(&self) -> u64 {
        self.totals.total_size
    }

    /// Number of non-directory entries.
    pub fn file_count(&self) -> usize {
        self.totals.file_count
    }

    /// Number of directory entries, `..` excluded.
    pub fn dir_count(&self) -> usize {
        self.totals.dir_count
    }

    /// Returns `true` if the listing has a `..` row.
    pub fn has_parent_link(&self) -> bool {
        self.entries.iter().any(DirEntry::is_parent_link)
    }

    /// See [`DirTotals::summary`].
    pub fn summary(&self) -> String {
        self.totals.summary()
    }
}

/// Lists the immediate children of `path`.
///
/// Hidden entries are skipped unless `include_hidden` is set. When `glob`
/// is given, only matching names are listed and counted; the `..` row is
/// kept regardless. Children whose metadata vanishes between `readdir` and
/// `lstat` are skipped.
///
/// # Errors
///
/// - [`CoreError::NotFound`]: the path does not exist.
/// - [`CoreError::NotADirectory`]: the path is not a directory.
/// - [`CoreError::PermissionDenied`]: read access is denied.
/// - [`CoreError::Io`]: any other I/O error opening the directory.
///
/// # Examples
///
/// ```no_run
/// use duet_core::list_dir;
/// use std::path::Path;
///
/// let listing = list_dir(Path::new("/tmp"), false, None).unwrap();
/// println!("{}", listing.summary());
/// ```
pub fn list_dir(
    path: &Path,
    include_hidden: bool,
    glob: Option<&GlobPattern>,
) -> CoreResult<DirList> {
    let meta = std::fs::metadata(path).map_err(|e| CoreError::from_io(path, e))?;
    if !meta.is_dir() {
        return Err(CoreError::NotADirectory(path.to_path_buf()));
    }

    let read_dir = std::fs::read_dir(path).map_err(|e| CoreError::from_io(path, e))?;

    let mut entries = Vec::new();
    if path.parent().is_some() {
        entries.push(DirEntry::parent_link(path));
    }

    let mut totals = DirTotals::default();

    for dir_entry in read_dir {
        let dir_entry = match dir_entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        let entry = match DirEntry::from_path(&dir_entry.path()) {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!("skipping {}: {e}", dir_entry.path().display());
                continue;
            }
        };

        if !include_hidden && entry.is_hidden() {
            continue;
        }
        if let Some(glob) = glob {
            if !glob.matches(entry.name()) {
                continue;
            }
        }

        if entry.is_dir() {
            totals.dir_count += 1;
        } else {
            totals.file_count += 1;
            totals.total_size += entry.size();
        }
        entries.push(entry);
    }

    tracing::debug!(
        path = %path.display(),
        entries = entries.len(),
        "directory listed"
    );

    Ok(DirList {
        path: path.to_path_buf(),
        entries,
        totals,
    })
}

/// Formats a byte count with 1024-based units.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
