//! Reversible delete.
//!
//! [`TrashBin`] is the seam the batch orchestrator calls when deletes
//! should be recoverable. [`SystemTrash`] hands the path to the platform
//! trash through the `trash` crate, which picks the right trash directory
//! for the volume the path lives on.

use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// Something that can take a path and keep it recoverable.
pub trait TrashBin {
    fn send_to_trash(&self, path: &Path) -> CoreResult<()>;
}

/// The desktop's own trash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemTrash;

impl TrashBin for SystemTrash {
    fn send_to_trash(&self, path: &Path) -> CoreResult<()> {
        std::fs::symlink_metadata(path).map_err(|e| CoreError::from_io(path, e))?;
        trash::delete(path).map_err(|e| CoreError::Trash(format!("{}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "trashed");
        Ok(())
    }
}
