//! Single-entry file operations: copy, move, delete, mkdir.
//!
//! Each function acts on exactly one source and either completes or
//! returns an error; batching and outcome collection live in
//! [`crate::batch`].

use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};

/// Where `src` lands when copied or moved to `dest`.
///
/// An existing directory `dest` receives `src` under its own name;
/// anything else is taken as the full target path, which lets a single
/// entry be copied or moved under a new name.
pub fn resolve_target(src: &Path, dest: &Path) -> CoreResult<PathBuf> {
    if dest.is_dir() {
        let name = src
            .file_name()
            .ok_or_else(|| CoreError::InvalidName(src.display().to_string()))?;
        Ok(dest.join(name))
    } else {
        Ok(dest.to_path_buf())
    }
}

/// Copies `src` to `dest` (see [`resolve_target`]) and returns the path
/// of the new copy.
///
/// Directories are copied recursively without following symlinks;
/// symlinks are recreated as symlinks. File permissions and modification
/// times are carried over. A copy that fails partway is removed again, so
/// the target either holds the whole entry or does not exist.
///
/// # Errors
///
/// - [`CoreError::NotFound`] if `src` does not exist.
/// - [`CoreError::AlreadyExists`] if the target is taken.
/// - [`CoreError::IntoItself`] if a directory would be copied into its own subtree.
/// - [`CoreError::InvalidOperation`] for sockets, FIFOs and device files,
///   at the top level or anywhere inside a directory.
/// - [`CoreError::Io`] and friends for failures while copying.
pub fn copy_entry(src: &Path, dest: &Path) -> CoreResult<PathBuf> {
    let meta = std::fs::symlink_metadata(src).map_err(|e| CoreError::from_io(src, e))?;
    let target = resolve_target(src, dest)?;
    check_target(src, &target, meta.is_dir())?;
    copy_whole(src, &target, meta.file_type())?;
    Ok(target)
}

/// Moves `src` to `dest` (see [`resolve_target`]) and returns the new path.
///
/// Tries an atomic rename first and falls back to copy-then-delete, which
/// is what crossing a filesystem boundary requires. A failed fallback copy
/// leaves no target behind. If removing the source fails afterwards, a
/// file source stays in place and its copy is removed; a directory source
/// may already be partly gone, so its complete copy is kept.
///
/// # Errors
///
/// Same as [`copy_entry`], plus any failure removing the source after a
/// fallback copy.
pub fn move_entry(src: &Path, dest: &Path) -> CoreResult<PathBuf> {
    let meta = std::fs::symlink_metadata(src).map_err(|e| CoreError::from_io(src, e))?;
    let target = resolve_target(src, dest)?;
    check_target(src, &target, meta.is_dir())?;

    match std::fs::rename(src, &target) {
        Ok(()) => Ok(target),
        Err(e) => {
            tracing::debug!(src = %src.display(), error = %e, "rename failed, copying instead");
            copy_whole(src, &target, meta.file_type())?;
            if let Err(e) = delete_path(src) {
                if meta.is_dir() {
                    tracing::warn!(src = %src.display(), error = %e, "source left after move");
                } else {
                    remove_partial(&target);
                }
                return Err(e);
            }
            Ok(target)
        }
    }
}

/// Permanently removes `path`; directories are removed recursively.
///
/// Symlinks are removed themselves, never their targets.
pub fn delete_path(path: &Path) -> CoreResult<()> {
    let meta = std::fs::symlink_metadata(path).map_err(|e| CoreError::from_io(path, e))?;

    if meta.is_dir() {
        std::fs::remove_dir_all(path).map_err(|e| CoreError::from_io(path, e))?;
    } else {
        std::fs::remove_file(path).map_err(|e| CoreError::from_io(path, e))?;
    }

    Ok(())
}

/// Creates `parent/name`, including missing intermediate directories.
///
/// An existing directory at that path counts as success. `name` may hold
/// several relative components (`"a/b/c"`).
///
/// # Errors
///
/// - [`CoreError::InvalidName`] for an empty or absolute name, or one that
///   climbs out of `parent` with `..`.
/// - [`CoreError::AlreadyExists`] if a non-directory occupies the path.
pub fn make_dir(parent: &Path, name: &str) -> CoreResult<PathBuf> {
    let trimmed = name.trim();
    if !is_valid_dir_name(trimmed) {
        return Err(CoreError::InvalidName(name.to_string()));
    }

    let target = parent.join(trimmed);
    match std::fs::symlink_metadata(&target) {
        Ok(meta) if meta.is_dir() => return Ok(target),
        Ok(_) => return Err(CoreError::AlreadyExists(target)),
        Err(_) => {}
    }

    std::fs::create_dir_all(&target).map_err(|e| CoreError::from_io(&target, e))?;
    Ok(target)
}

fn is_valid_dir_name(name: &str) -> bool {
    if name.is_empty() || name.contains('\0') {
        return false;
    }
    Path::new(name).components().all(|c| matches!(c, std::path::Component::Normal(_)))
}

/// Rejects taken targets and copies of a directory into itself.
fn check_target(src: &Path, target: &Path, src_is_dir: bool) -> CoreResult<()> {
    if std::fs::symlink_metadata(target).is_ok() {
        return Err(CoreError::AlreadyExists(target.to_path_buf()));
    }

    if src_is_dir {
        let src_real = std::fs::canonicalize(src).map_err(|e| CoreError::from_io(src, e))?;
        let target_parent = target.parent().unwrap_or(target);
        let parent_real = std::fs::canonicalize(target_parent)
            .map_err(|e| CoreError::from_io(target_parent, e))?;
        if parent_real.starts_with(&src_real) {
            return Err(CoreError::IntoItself(src.to_path_buf()));
        }
    }

    Ok(())
}

/// Copies one entry of any kind, removing whatever was created if the copy
/// does not complete.
fn copy_whole(src: &Path, target: &Path, file_type: std::fs::FileType) -> CoreResult<()> {
    let result = copy_node(src, target, file_type);
    if result.is_err() {
        remove_partial(target);
    }
    result
}

fn copy_node(src: &Path, target: &Path, file_type: std::fs::FileType) -> CoreResult<()> {
    if file_type.is_symlink() {
        copy_symlink(src, target)
    } else if file_type.is_dir() {
        copy_dir_recursive(src, target)
    } else if file_type.is_file() {
        copy_file(src, target)
    } else {
        Err(CoreError::InvalidOperation(format!(
            "cannot copy special file {}",
            src.display()
        )))
    }
}

/// Best effort cleanup of a half-made copy.
fn remove_partial(target: &Path) {
    let Ok(meta) = std::fs::symlink_metadata(target) else {
        return;
    };
    let removed = if meta.is_dir() {
        std::fs::remove_dir_all(target)
    } else {
        std::fs::remove_file(target)
    };
    if let Err(e) = removed {
        tracing::warn!(path = %target.display(), error = %e, "could not remove partial copy");
    }
}

fn copy_file(src: &Path, dest: &Path) -> CoreResult<()> {
    std::fs::copy(src, dest).map_err(|e| CoreError::from_io(src, e))?;
    preserve_attributes(src, dest);
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dest: &Path) -> CoreResult<()> {
    let link_target = std::fs::read_link(src).map_err(|e| CoreError::from_io(src, e))?;
    std::os::unix::fs::symlink(&link_target, dest).map_err(|e| CoreError::from_io(dest, e))?;
    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dest: &Path) -> CoreResult<()> {
    copy_file(src, dest)
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> CoreResult<()> {
    std::fs::create_dir(dest).map_err(|e| CoreError::from_io(dest, e))?;

    for entry in std::fs::read_dir(src).map_err(|e| CoreError::from_io(src, e))? {
        let entry = entry?;
        let entry_path = entry.path();
        let target = dest.join(entry.file_name());

        // file_type() does not follow symlinks
        copy_node(&entry_path, &target, entry.file_type()?)?;
    }

    // Last, so creating children does not bump the copied mtime.
    preserve_attributes(src, dest);
    Ok(())
}

/// Best effort: the data is already in place when this runs.
fn preserve_attributes(src: &Path, dest: &Path) {
    let Ok(meta) = std::fs::metadata(src) else {
        return;
    };
    if let Ok(mtime) = meta.modified() {
        if let Err(e) = filetime::set_file_mtime(dest, filetime::FileTime::from_system_time(mtime)) {
            tracing::debug!(path = %dest.display(), error = %e, "could not keep mtime");
        }
    }
    #[cfg(unix)]
    if let Err(e) = std::fs::set_permissions(dest, meta.permissions()) {
        tracing::debug!(path = %dest.display(), error = %e, "could not keep permissions");
    }
}
