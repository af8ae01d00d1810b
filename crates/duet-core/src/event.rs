//! Messages between the UI and the [`Commander`](crate::commander::Commander).
//!
//! The UI translates user input into [`Command`]s; the commander applies
//! them and answers with [`Event`]s describing what changed.

use std::path::PathBuf;

use crate::batch::BatchReport;
use crate::commander::PaneSide;
use crate::nav::pane::PaneKind;
use crate::nav::sort::SortKey;

/// A user intent. Commands without a side act on the active pane.
///
/// Commands flow **UI → Core**. The core never creates commands itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the directory at the given path.
    NavigateTo(PathBuf),
    /// Move to the parent directory.
    GoUp,
    /// Open the highlighted row (`..` goes up).
    Enter,
    /// Re-read both panes.
    Refresh,

    CursorUp,
    CursorDown,
    CursorTop,
    CursorBottom,
    /// Page up by the given number of rows.
    PageUp(usize),
    /// Page down by the given number of rows.
    PageDown(usize),

    /// Sort by key, ascending unless the flag is set. Repeating the
    /// current request flips the direction.
    SetSort(SortKey, bool),
    /// Flip hidden-file visibility for both panes.
    ToggleHidden,
    /// Set the glob filter; `None`, blank and `*` clear it.
    SetGlob(Option<String>),

    ToggleSelection(String),
    /// Toggle the highlighted row and move down.
    ToggleCursorSelection,
    SelectAll,
    InvertSelection,
    ClearSelection,

    /// Copy the resolved paths of the active pane to the destination.
    Copy { dest: PathBuf },
    /// Move the resolved paths of the active pane to the destination.
    Move { dest: PathBuf },
    /// Delete the resolved paths of the active pane, honouring the
    /// reversible-delete policy.
    Delete,
    /// Create a directory under the active pane's path.
    Mkdir(String),

    /// Point preview panes at a path explicitly.
    RequestPreview(PathBuf),
    /// Line budget for directory previews, normally the pane height.
    SetPreviewLines(usize),

    /// Give focus to the other pane, if it lists files.
    FocusOther,
    FocusSide(PaneSide),
    /// Change what a pane slot shows.
    SetPaneKind(PaneSide, PaneKind),
    /// Switch a pane slot between files and preview.
    TogglePaneKind(PaneSide),
}

/// A notification the core sends back to the UI.
///
/// Events flow **Core → UI**.
#[derive(Debug)]
pub enum Event {
    /// A files pane now shows `path`.
    DirectoryLoaded { side: PaneSide, path: PathBuf },
    /// The highlighted row of a files pane changed.
    CursorMoved { side: PaneSide, path: Option<PathBuf> },
    /// The selection of a files pane changed size.
    SelectionChanged { side: PaneSide, count: usize },
    /// A preview pane regenerated its content.
    PreviewUpdated { side: PaneSide, target: Option<PathBuf> },
    /// A pane could not be re-read and still shows its previous listing.
    RefreshFailed { side: PaneSide, error: String },
    /// A batch operation ran; the report lists every entry's outcome.
    OperationFinished(BatchReport),
    FocusChanged(PaneSide),
    PaneKindChanged { side: PaneSide, kind: PaneKind },
}
