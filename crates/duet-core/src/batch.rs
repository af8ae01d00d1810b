//! Batch file operations over a pane's resolved paths.
//!
//! Every entry of a batch is attempted on its own; a failure is recorded
//! and the batch moves on. Effects of entries that already completed are
//! never rolled back.

use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::fs::ops::{copy_entry, delete_path, make_dir, move_entry};
use crate::fs::trash::TrashBin;

/// Failure of one entry of a batch.
#[derive(Debug, thiserror::Error)]
pub enum OpError {
    #[error("cannot copy {path}: {cause}")]
    Copy {
        path: PathBuf,
        #[source]
        cause: CoreError,
    },
    #[error("cannot move {path}: {cause}")]
    Move {
        path: PathBuf,
        #[source]
        cause: CoreError,
    },
    #[error("cannot delete {path}: {cause}")]
    Delete {
        path: PathBuf,
        #[source]
        cause: CoreError,
    },
    #[error("cannot create {path}: {cause}")]
    Mkdir {
        path: PathBuf,
        #[source]
        cause: CoreError,
    },
}

impl OpError {
    fn new(kind: OpKind, path: &Path, cause: CoreError) -> Self {
        let path = path.to_path_buf();
        match kind {
            OpKind::Copy => Self::Copy { path, cause },
            OpKind::Move => Self::Move { path, cause },
            OpKind::Delete => Self::Delete { path, cause },
            OpKind::Mkdir => Self::Mkdir { path, cause },
        }
    }

    /// The entry the operation failed on.
    pub fn path(&self) -> &Path {
        match self {
            Self::Copy { path, .. }
            | Self::Move { path, .. }
            | Self::Delete { path, .. }
            | Self::Mkdir { path, .. } => path,
        }
    }

    /// The underlying error.
    pub fn cause(&self) -> &CoreError {
        match self {
            Self::Copy { cause, .. }
            | Self::Move { cause, .. }
            | Self::Delete { cause, .. }
            | Self::Mkdir { cause, .. } => cause,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Copy,
    Move,
    Delete,
    Mkdir,
}

impl OpKind {
    /// Past-tense verb for status messages.
    pub fn done_label(self) -> &'static str {
        match self {
            Self::Copy => "Copied",
            Self::Move => "Moved",
            Self::Delete => "Deleted",
            Self::Mkdir => "Created",
        }
    }
}

/// Result for one source path.
///
/// On success the value is the path the entry ended up at (the source
/// itself for deletes).
#[derive(Debug)]
pub struct OpOutcome {
    pub source: PathBuf,
    pub result: Result<PathBuf, OpError>,
}

impl OpOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Every outcome of one batch, in source order.
#[derive(Debug)]
pub struct BatchReport {
    kind: OpKind,
    outcomes: Vec<OpOutcome>,
}

impl BatchReport {
    pub fn kind(&self) -> OpKind {
        self.kind
    }

    pub fn outcomes(&self) -> &[OpOutcome] {
        &self.outcomes
    }

    /// Paths produced by the successful entries.
    pub fn succeeded(&self) -> impl Iterator<Item = &Path> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(PathBuf::as_path))
    }

    pub fn failed(&self) -> impl Iterator<Item = &OpError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    pub fn any_succeeded(&self) -> bool {
        self.outcomes.iter().any(OpOutcome::is_ok)
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(OpOutcome::is_ok)
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// One-line summary, e.g. `"Copied 2 of 3 entries"`.
    pub fn summary(&self) -> String {
        let ok = self.outcomes.iter().filter(|o| o.is_ok()).count();
        if ok == self.outcomes.len() {
            format!("{} {} entries", self.kind.done_label(), ok)
        } else {
            format!(
                "{} {} of {} entries",
                self.kind.done_label(),
                ok,
                self.outcomes.len()
            )
        }
    }
}

/// Runs copy, move, delete and mkdir batches.
pub struct BatchOrchestrator<'a> {
    trash: &'a dyn TrashBin,
}

impl<'a> BatchOrchestrator<'a> {
    /// `trash` receives reversible deletes.
    pub fn new(trash: &'a dyn TrashBin) -> Self {
        Self { trash }
    }

    /// Copies every source into `dest`.
    ///
    /// With a single source, `dest` may also name the copy itself.
    pub fn copy(&self, sources: &[PathBuf], dest: &Path) -> BatchReport {
        self.transfer(OpKind::Copy, sources, dest, copy_entry)
    }

    /// Moves every source into `dest`.
    ///
    /// With a single source, `dest` may also name the new location itself.
    pub fn move_to(&self, sources: &[PathBuf], dest: &Path) -> BatchReport {
        self.transfer(OpKind::Move, sources, dest, move_entry)
    }

    /// Deletes every source, through the trash when `reversible`.
    pub fn delete(&self, sources: &[PathBuf], reversible: bool) -> BatchReport {
        let outcomes = sources
            .iter()
            .map(|src| {
                let result = if reversible {
                    self.trash.send_to_trash(src)
                } else {
                    delete_path(src)
                };
                outcome(OpKind::Delete, src, result.map(|()| src.clone()))
            })
            .collect();
        finish(OpKind::Delete, outcomes)
    }

    /// Creates `parent/name`. An existing directory is a success.
    pub fn mkdir(&self, parent: &Path, name: &str) -> BatchReport {
        let requested = parent.join(name.trim());
        let result = make_dir(parent, name);
        finish(OpKind::Mkdir, vec![outcome(OpKind::Mkdir, &requested, result)])
    }

    fn transfer(
        &self,
        kind: OpKind,
        sources: &[PathBuf],
        dest: &Path,
        op: fn(&Path, &Path) -> crate::CoreResult<PathBuf>,
    ) -> BatchReport {
        let many_into_non_dir = sources.len() > 1 && !dest.is_dir();
        let outcomes = sources
            .iter()
            .map(|src| {
                let result = if many_into_non_dir {
                    Err(CoreError::NotADirectory(dest.to_path_buf()))
                } else {
                    op(src, dest)
                };
                outcome(kind, src, result)
            })
            .collect();
        finish(kind, outcomes)
    }
}

fn outcome(kind: OpKind, src: &Path, result: crate::CoreResult<PathBuf>) -> OpOutcome {
    let result = result.map_err(|cause| {
        let err = OpError::new(kind, src, cause);
        tracing::warn!("{err}");
        err
    });
    OpOutcome {
        source: src.to_path_buf(),
        result,
    }
}

fn finish(kind: OpKind, outcomes: Vec<OpOutcome>) -> BatchReport {
    let report = BatchReport { kind, outcomes };
    tracing::info!(
        op = ?kind,
        total = report.len(),
        failed = report.failed().count(),
        "batch finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    /// Records trashed paths and removes them, failing on request.
    #[derive(Default)]
    struct RecordingTrash {
        trashed: RefCell<Vec<PathBuf>>,
        refuse: Option<PathBuf>,
    }

    impl TrashBin for RecordingTrash {
        fn send_to_trash(&self, path: &Path) -> crate::CoreResult<()> {
            if self.refuse.as_deref() == Some(path) {
                return Err(CoreError::Trash("refused".to_string()));
            }
            delete_path(path)?;
            self.trashed.borrow_mut().push(path.to_path_buf());
            Ok(())
        }
    }

    #[test]
    fn copy_continues_after_failure() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.txt");
        fs::write(&a, "a").unwrap();
        let missing = tmp.path().join("missing.txt");
        let c = tmp.path().join("c.txt");
        fs::write(&c, "c").unwrap();
        let dest = tmp.path().join("dest");
        fs::create_dir(&dest).unwrap();
        let trash = RecordingTrash::default();

        let report = BatchOrchestrator::new(&trash).copy(&[a, missing.clone(), c], &dest);

        assert_eq!(report.len(), 3);
        assert!(report.any_succeeded());
        assert!(!report.all_succeeded());
        let failed: Vec<_> = report.failed().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].path(), missing);
        assert!(matches!(failed[0], OpError::Copy { .. }));
        assert!(matches!(failed[0].cause(), CoreError::NotFound(_)));
        assert!(dest.join("a.txt").exists());
        assert!(dest.join("c.txt").exists());
        assert_eq!(report.summary(), "Copied 2 of 3 entries");
    }

    #[test]
    fn move_reports_new_locations() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a");
        fs::write(&a, "").unwrap();
        let dest = tmp.path().join("dest");
        fs::create_dir(&dest).unwrap();
        let trash = RecordingTrash::default();

        let report = BatchOrchestrator::new(&trash).move_to(&[a.clone()], &dest);

        assert!(report.all_succeeded());
        assert_eq!(report.succeeded().collect::<Vec<_>>(), vec![dest.join("a").as_path()]);
        assert!(!a.exists());
        assert_eq!(report.summary(), "Moved 1 entries");
    }

    #[cfg(unix)]
    #[test]
    fn failed_directory_copy_leaves_no_partial_target() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("dirB");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("nested/kept.txt"), "data").unwrap();
        let _socket = std::os::unix::net::UnixListener::bind(dir.join("nested/sock")).unwrap();
        let file = tmp.path().join("fileA");
        fs::write(&file, "payload").unwrap();
        let dest = tmp.path().join("dest");
        fs::create_dir(&dest).unwrap();
        let trash = RecordingTrash::default();

        let report = BatchOrchestrator::new(&trash).copy(&[file, dir.clone()], &dest);

        assert_eq!(report.succeeded().count(), 1);
        let failed: Vec<_> = report.failed().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].path(), dir);
        assert!(matches!(failed[0].cause(), CoreError::InvalidOperation(_)));
        assert!(dest.join("fileA").exists());
        assert!(!dest.join("dirB").exists());
    }

    #[test]
    fn deep_directory_tree_is_copied_whole() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("deep");
        let leaf = (0..100).fold(root.clone(), |p, i| p.join(format!("d{i}")));
        fs::create_dir_all(&leaf).unwrap();
        fs::write(leaf.join("bottom.txt"), "end").unwrap();
        let dest = tmp.path().join("dest");
        fs::create_dir(&dest).unwrap();
        let trash = RecordingTrash::default();

        let report = BatchOrchestrator::new(&trash).copy(&[root.clone()], &dest);

        assert!(report.all_succeeded());
        let copied_leaf = dest.join(leaf.strip_prefix(tmp.path()).unwrap());
        assert_eq!(fs::read_to_string(copied_leaf.join("bottom.txt")).unwrap(), "end");
    }

    #[test]
    fn many_sources_need_a_directory_destination() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        fs::write(&a, "").unwrap();
        fs::write(&b, "").unwrap();
        let trash = RecordingTrash::default();

        let report = BatchOrchestrator::new(&trash).copy(&[a, b], &tmp.path().join("nowhere"));

        assert_eq!(report.failed().count(), 2);
        assert!(report
            .failed()
            .all(|e| matches!(e.cause(), CoreError::NotADirectory(_))));
    }

    #[test]
    fn reversible_delete_uses_trash() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        fs::write(&a, "").unwrap();
        fs::write(&b, "").unwrap();
        let trash = RecordingTrash {
            refuse: Some(b.clone()),
            ..RecordingTrash::default()
        };

        let report = BatchOrchestrator::new(&trash).delete(&[a.clone(), b.clone()], true);

        assert_eq!(*trash.trashed.borrow(), vec![a.clone()]);
        assert!(!a.exists());
        assert!(b.exists());
        let failed: Vec<_> = report.failed().collect();
        assert!(matches!(failed[0], OpError::Delete { .. }));
        assert!(matches!(failed[0].cause(), CoreError::Trash(_)));
    }

    #[test]
    fn permanent_delete_bypasses_trash() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("dir");
        fs::create_dir_all(dir.join("sub")).unwrap();
        let trash = RecordingTrash::default();

        let report = BatchOrchestrator::new(&trash).delete(&[dir.clone()], false);

        assert!(report.all_succeeded());
        assert!(!dir.exists());
        assert!(trash.trashed.borrow().is_empty());
    }

    #[test]
    fn mkdir_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let trash = RecordingTrash::default();
        let orchestrator = BatchOrchestrator::new(&trash);

        let first = orchestrator.mkdir(tmp.path(), "new");
        let second = orchestrator.mkdir(tmp.path(), "new");

        assert!(first.all_succeeded());
        assert!(second.all_succeeded());
        let count = fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(count, 1);
    }

    #[test]
    fn mkdir_failure_is_reported() {
        let tmp = TempDir::new().unwrap();
        let trash = RecordingTrash::default();

        let report = BatchOrchestrator::new(&trash).mkdir(tmp.path(), "");

        assert!(!report.any_succeeded());
        assert!(matches!(
            report.failed().next(),
            Some(OpError::Mkdir { cause: CoreError::InvalidName(_), .. })
        ));
    }

    #[test]
    fn op_error_display_names_path_and_cause() {
        let err = OpError::new(
            OpKind::Move,
            Path::new("/x/y"),
            CoreError::AlreadyExists(PathBuf::from("/z/y")),
        );
        assert_eq!(err.to_string(), "cannot move /x/y: already exists: /z/y");
    }

    #[test]
    fn empty_batch_is_trivially_successful() {
        let trash = RecordingTrash::default();
        let report = BatchOrchestrator::new(&trash).copy(&[], Path::new("/"));
        assert!(report.is_empty());
        assert!(report.all_succeeded());
        assert!(!report.any_succeeded());
    }
}
