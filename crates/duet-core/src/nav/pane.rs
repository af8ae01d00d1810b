//! Pane navigation state.
//!
//! A [`PaneState`] owns one directory view: its path, sort preference,
//! visibility flags, glob filter, selection and cursor. Every transition
//! returns a new state; a transition that has to re-read the directory
//! returns `CoreResult<Self>` and leaves the original untouched on failure,
//! so a failed refresh never produces a half-updated pane.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::fs::entry::DirEntry;
use crate::fs::listing::{list_dir, DirList, DirTotals};
use crate::nav::glob::GlobPattern;
use crate::nav::selection::Selection;
use crate::nav::sort::{sort_entries, SortKey, SortSpec};

/// The body a pane slot can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaneKind {
    /// A navigable directory listing.
    #[default]
    Files,
    /// A read-only preview of the other pane's cursor path.
    Preview,
}

impl PaneKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Files => "Files",
            Self::Preview => "Preview",
        }
    }
}

/// Capabilities shared by every pane body.
///
/// Like the rest of the navigation layer, refreshing consumes nothing and
/// produces a new value.
pub trait Pane: Sized {
    /// Which body this is.
    fn kind(&self) -> PaneKind;
    /// Text for the pane's top border.
    fn title(&self) -> String;
    /// Text for the pane's bottom border.
    fn subtitle(&self) -> String;
    /// Re-reads whatever the pane displays.
    fn refresh(&self) -> CoreResult<Self>;
}

/// Display class of a row, a pure function of the entry and the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    Executable,
    Hidden,
    Symlink,
    Regular,
}

/// Row style: class plus the selection highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryStyle {
    pub kind: EntryKind,
    pub selected: bool,
}

/// Where to put the cursor after a listing has been (re)loaded.
enum CursorTarget<'a> {
    /// On the entry with this name, else on the given row (clamped).
    Name(&'a str, usize),
    /// On the first row.
    First,
}

/// One pane's navigation state.
#[derive(Debug, Clone)]
pub struct PaneState {
    path: PathBuf,
    entries: Vec<DirEntry>,
    totals: DirTotals,
    sort: SortSpec,
    show_hidden: bool,
    glob: Option<GlobPattern>,
    selection: Selection,
    cursor: usize,
    active: bool,
}

impl PaneState {
    /// Opens a pane on `path`.
    ///
    /// # Errors
    ///
    /// Returns the access error of [`list_dir`] when `path` cannot be read.
    pub fn open(path: &Path, show_hidden: bool, sort: SortSpec) -> CoreResult<Self> {
        let path = std::fs::canonicalize(path).map_err(|e| CoreError::from_io(path, e))?;
        let listing = list_dir(&path, show_hidden, None)?;
        let state = Self {
            path,
            entries: Vec::new(),
            totals: DirTotals::default(),
            sort,
            show_hidden,
            glob: None,
            selection: Selection::new(),
            cursor: 0,
            active: false,
        };
        Ok(state.with_listing(listing, CursorTarget::First))
    }

    // --- Queries ---

    /// The directory being shown.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows in display order.
    pub fn entries(&self) -> &[DirEntry] {
        &self.entries
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    pub fn glob(&self) -> Option<&GlobPattern> {
        self.glob.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Index of the highlighted row.
    pub fn cursor_index(&self) -> usize {
        self.cursor
    }

    /// The highlighted row, if the listing is not empty.
    pub fn cursor_entry(&self) -> Option<&DirEntry> {
        self.entries.get(self.cursor)
    }

    /// Absolute path of the highlighted row.
    ///
    /// For the `..` row this is the parent directory itself.
    pub fn cursor_path(&self) -> Option<PathBuf> {
        let entry = self.cursor_entry()?;
        if entry.is_parent_link() {
            self.path.parent().map(Path::to_path_buf)
        } else {
            Some(entry.path().to_path_buf())
        }
    }

    /// Paths an operation issued from this pane should act on.
    pub fn resolved_paths(&self) -> Vec<PathBuf> {
        self.selection
            .resolve(&self.path, self.cursor_entry().map(DirEntry::name))
    }

    /// Directory summary, prefixed with the glob when one is active.
    pub fn summary(&self) -> String {
        let base = self.totals.summary();
        match &self.glob {
            Some(glob) => format!("{glob} | {base}"),
            None => base,
        }
    }

    pub fn totals(&self) -> DirTotals {
        self.totals
    }

    /// Classifies `entry` for rendering.
    ///
    /// Directory wins over executable, which wins over hidden, which wins
    /// over symlink.
    pub fn entry_style(&self, entry: &DirEntry) -> EntryStyle {
        let kind = if entry.is_dir() {
            EntryKind::Directory
        } else if entry.is_executable() {
            EntryKind::Executable
        } else if entry.is_hidden() {
            EntryKind::Hidden
        } else if entry.is_link() {
            EntryKind::Symlink
        } else {
            EntryKind::Regular
        };
        EntryStyle {
            kind,
            selected: self.selection.is_selected(entry.name()),
        }
    }

    // --- Directory transitions ---

    /// Moves the pane to `new_path`.
    ///
    /// Clears the selection. When `new_path` is the parent of the current
    /// directory, the cursor lands on the directory just left; otherwise
    /// (or when that entry is gone) it lands on the first row.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotADirectory`] if `new_path` is not a directory.
    /// - Any access error from reading the new directory.
    pub fn navigate(&self, new_path: &Path) -> CoreResult<Self> {
        let target = std::fs::canonicalize(new_path).map_err(|e| CoreError::from_io(new_path, e))?;
        if !target.is_dir() {
            return Err(CoreError::NotADirectory(new_path.to_path_buf()));
        }

        let listing = list_dir(&target, self.show_hidden, self.glob.as_ref())?;
        let came_from = if self.path.parent() == Some(target.as_path()) {
            self.path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        } else {
            None
        };

        tracing::debug!(from = %self.path.display(), to = %target.display(), "navigate");

        let next = Self {
            path: target,
            selection: Selection::new(),
            ..self.clone()
        };
        let cursor = match came_from.as_deref() {
            Some(name) => CursorTarget::Name(name, 0),
            None => CursorTarget::First,
        };
        Ok(next.with_listing(listing, cursor))
    }

    /// Navigates to the parent directory. A no-op at a filesystem root.
    pub fn go_up(&self) -> CoreResult<Self> {
        match self.path.parent() {
            Some(parent) => {
                let parent = parent.to_path_buf();
                self.navigate(&parent)
            }
            None => Ok(self.clone()),
        }
    }

    /// Opens the highlighted row: `..` goes up, a directory is entered.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotADirectory`] when the cursor is on anything else, so
    /// the caller can hand the file to an opener instead.
    pub fn enter_cursor(&self) -> CoreResult<Self> {
        let Some(entry) = self.cursor_entry() else {
            return Ok(self.clone());
        };
        if entry.is_parent_link() {
            return self.go_up();
        }
        if entry.is_dir() {
            return self.navigate(entry.path());
        }
        Err(CoreError::NotADirectory(entry.path().to_path_buf()))
    }

    /// Re-reads the current directory with the current filters and sort.
    ///
    /// The cursor stays on the same entry name; if that entry vanished it
    /// stays on the same row, clamped to the new length. Selected names
    /// that no longer exist are dropped.
    pub fn refresh(&self) -> CoreResult<Self> {
        let listing = list_dir(&self.path, self.show_hidden, self.glob.as_ref())?;
        let name = self.cursor_entry().map(|e| e.name().to_string());
        let cursor = match name.as_deref() {
            Some(name) => CursorTarget::Name(name, self.cursor),
            None => CursorTarget::First,
        };
        let mut next = self.clone().with_listing(listing, cursor);
        let entries = &next.entries;
        next.selection
            .retain(|name| entries.iter().any(|e| e.name() == name));
        Ok(next)
    }

    /// Shows or hides dotfiles.
    ///
    /// Turning hidden files off clears the whole selection first.
    pub fn with_show_hidden(&self, show_hidden: bool) -> CoreResult<Self> {
        self.clone().with_hidden_flag(show_hidden).refresh()
    }

    /// Records the hidden-files flag without re-reading. The current rows
    /// stay until the next successful refresh applies it.
    ///
    /// Turning hidden files off still clears the selection.
    pub fn with_hidden_flag(self, show_hidden: bool) -> Self {
        let mut next = Self {
            show_hidden,
            ..self
        };
        if !show_hidden {
            next.selection.clear();
        }
        next
    }

    /// Sets or clears the glob filter. Always clears the selection.
    pub fn with_glob(&self, glob: Option<GlobPattern>) -> CoreResult<Self> {
        let next = Self {
            glob,
            selection: Selection::new(),
            ..self.clone()
        };
        next.refresh()
    }

    /// Applies `sort` and refreshes. Selection and cursor entry are kept.
    pub fn with_sort(&self, sort: SortSpec) -> CoreResult<Self> {
        tracing::debug!(key = ?sort.key, reverse = sort.reverse, "sort changed");
        let next = Self {
            sort,
            ..self.clone()
        };
        next.refresh()
    }

    /// Handles a "sort by `key`" request with the repeat-flips-direction
    /// rule of [`SortSpec::request`].
    pub fn with_sort_request(&self, key: SortKey, reverse: bool) -> CoreResult<Self> {
        self.with_sort(self.sort.request(key, reverse))
    }

    // --- Cursor ---

    /// Moves the cursor to `index`, clamped to the listing.
    pub fn with_cursor(self, index: usize) -> Self {
        let cursor = clamp_index(index, self.entries.len());
        Self { cursor, ..self }
    }

    /// Moves the cursor onto the row called `name`; no-op if absent.
    pub fn with_cursor_on(self, name: &str) -> Self {
        match self.entries.iter().position(|e| e.name() == name) {
            Some(index) => self.with_cursor(index),
            None => self,
        }
    }

    pub fn move_up(self) -> Self {
        let index = self.cursor.saturating_sub(1);
        self.with_cursor(index)
    }

    pub fn move_down(self) -> Self {
        let index = self.cursor.saturating_add(1);
        self.with_cursor(index)
    }

    pub fn go_to_first(self) -> Self {
        self.with_cursor(0)
    }

    pub fn go_to_last(self) -> Self {
        self.with_cursor(usize::MAX)
    }

    pub fn page_up(self, rows: usize) -> Self {
        let index = self.cursor.saturating_sub(rows.max(1));
        self.with_cursor(index)
    }

    pub fn page_down(self, rows: usize) -> Self {
        let index = self.cursor.saturating_add(rows.max(1));
        self.with_cursor(index)
    }

    // --- Selection ---

    /// Toggles `name` if it is a visible row.
    pub fn toggle_selection(self, name: &str) -> Self {
        if !self.entries.iter().any(|e| e.name() == name) {
            return self;
        }
        let mut next = self;
        next.selection.toggle(name);
        next
    }

    /// Toggles the highlighted row and moves the cursor down one row.
    pub fn toggle_cursor_and_advance(self) -> Self {
        let name = match self.cursor_entry() {
            Some(entry) => entry.name().to_string(),
            None => return self,
        };
        self.toggle_selection(&name).move_down()
    }

    /// Selects every visible row except `..`.
    pub fn select_all(self) -> Self {
        let mut next = self;
        for entry in &next.entries {
            next.selection.add(entry.name());
        }
        next
    }

    /// Inverts the selection over the visible rows.
    pub fn invert_selection(self) -> Self {
        let mut next = self;
        for entry in &next.entries {
            next.selection.toggle(entry.name());
        }
        next
    }

    pub fn clear_selection(self) -> Self {
        let mut next = self;
        next.selection.clear();
        next
    }

    /// Sets the focus flag.
    pub fn with_active(self, active: bool) -> Self {
        Self { active, ..self }
    }

    /// Installs a fresh listing, sorted by the pane's spec.
    fn with_listing(self, listing: DirList, cursor: CursorTarget<'_>) -> Self {
        let totals = listing.totals();
        let entries = sort_entries(listing.entries(), self.sort);

        let cursor = match cursor {
            CursorTarget::Name(name, fallback) => entries
                .iter()
                .position(|e| e.name() == name)
                .unwrap_or_else(|| clamp_index(fallback, entries.len())),
            CursorTarget::First => 0,
        };

        Self {
            entries,
            totals,
            cursor,
            ..self
        }
    }
}

impl Pane for PaneState {
    fn kind(&self) -> PaneKind {
        PaneKind::Files
    }

    fn title(&self) -> String {
        self.path.display().to_string()
    }

    fn subtitle(&self) -> String {
        self.summary()
    }

    fn refresh(&self) -> CoreResult<Self> {
        PaneState::refresh(self)
    }
}

fn clamp_index(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        index.min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup(files: &[&str], dirs: &[&str]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for name in files {
            fs::write(tmp.path().join(name), name.as_bytes()).unwrap();
        }
        for name in dirs {
            fs::create_dir(tmp.path().join(name)).unwrap();
        }
        tmp
    }

    fn open(tmp: &TempDir) -> PaneState {
        PaneState::open(tmp.path(), false, SortSpec::default()).unwrap()
    }

    fn names(pane: &PaneState) -> Vec<&str> {
        pane.entries().iter().map(|e| e.name()).collect()
    }

    #[test]
    fn open_sorts_and_starts_on_first_row() {
        let tmp = setup(&["b.txt", "a.txt"], &["dir"]);
        let pane = open(&tmp);

        assert_eq!(names(&pane), vec!["..", "a.txt", "b.txt", "dir"]);
        assert_eq!(pane.cursor_index(), 0);
        assert!(pane.selection().is_empty());
        assert!(!pane.is_active());
    }

    #[test]
    fn open_missing_dir_is_access_error() {
        let tmp = TempDir::new().unwrap();
        let err = PaneState::open(&tmp.path().join("nope"), false, SortSpec::default())
            .unwrap_err();
        assert!(err.is_access_error());
    }

    #[test]
    fn navigate_into_child_puts_cursor_on_first_row() {
        let tmp = setup(&[], &["child"]);
        fs::write(tmp.path().join("child/x.txt"), "x").unwrap();
        let pane = open(&tmp).with_cursor_on("child");

        let pane = pane.navigate(&tmp.path().join("child")).unwrap();

        assert!(pane.path().ends_with("child"));
        assert_eq!(pane.cursor_index(), 0);
    }

    #[test]
    fn navigate_to_parent_highlights_previous_dir() {
        let tmp = setup(&["a.txt", "c.txt"], &["b"]);
        let child = PaneState::open(&tmp.path().join("b"), false, SortSpec::default()).unwrap();

        let parent = child.navigate(tmp.path()).unwrap();

        assert_eq!(parent.cursor_entry().unwrap().name(), "b");
    }

    #[test]
    fn go_up_highlights_previous_dir() {
        let tmp = setup(&["a.txt"], &["zeta"]);
        let child = PaneState::open(&tmp.path().join("zeta"), false, SortSpec::default()).unwrap();

        let parent = child.go_up().unwrap();

        assert_eq!(parent.path(), fs::canonicalize(tmp.path()).unwrap());
        assert_eq!(parent.cursor_entry().unwrap().name(), "zeta");
    }

    #[test]
    fn navigate_to_parent_with_vanished_dir_falls_back_to_first_row() {
        let tmp = setup(&["a.txt"], &["b"]);
        let child = PaneState::open(&tmp.path().join("b"), false, SortSpec::default()).unwrap();
        fs::remove_dir(tmp.path().join("b")).unwrap();

        let parent = child.navigate(tmp.path()).unwrap();

        assert_eq!(parent.cursor_index(), 0);
    }

    #[test]
    fn navigate_clears_selection_but_keeps_sort() {
        let tmp = setup(&["a.txt"], &["sub"]);
        let sort = SortSpec::new(SortKey::Size, true);
        let pane = PaneState::open(tmp.path(), false, sort)
            .unwrap()
            .toggle_selection("a.txt");
        assert_eq!(pane.selection().len(), 1);

        let pane = pane.navigate(&tmp.path().join("sub")).unwrap();

        assert!(pane.selection().is_empty());
        assert_eq!(pane.sort(), sort);
    }

    #[test]
    fn navigate_to_file_is_rejected_and_state_unchanged() {
        let tmp = setup(&["a.txt"], &[]);
        let pane = open(&tmp);

        let err = pane.navigate(&tmp.path().join("a.txt")).unwrap_err();

        assert!(matches!(err, CoreError::NotADirectory(_)));
        assert_eq!(pane.path(), fs::canonicalize(tmp.path()).unwrap());
    }

    #[test]
    fn enter_cursor_on_parent_row_goes_up() {
        let tmp = setup(&[], &["inner"]);
        let child = PaneState::open(&tmp.path().join("inner"), false, SortSpec::default()).unwrap();
        assert!(child.cursor_entry().unwrap().is_parent_link());

        let parent = child.enter_cursor().unwrap();

        assert_eq!(parent.cursor_entry().unwrap().name(), "inner");
    }

    #[test]
    fn enter_cursor_on_file_reports_not_a_directory() {
        let tmp = setup(&["a.txt"], &[]);
        let pane = open(&tmp).with_cursor_on("a.txt");

        let err = pane.enter_cursor().unwrap_err();

        assert!(matches!(err, CoreError::NotADirectory(_)));
    }

    #[test]
    fn hiding_dotfiles_clears_whole_selection() {
        let tmp = setup(&[".secret", "visible.txt"], &[]);
        let pane = PaneState::open(tmp.path(), true, SortSpec::default())
            .unwrap()
            .toggle_selection(".secret")
            .toggle_selection("visible.txt");
        assert_eq!(pane.selection().len(), 2);

        let pane = pane.with_show_hidden(false).unwrap();

        assert!(pane.selection().is_empty());
        assert!(!names(&pane).contains(&".secret"));
    }

    #[test]
    fn showing_dotfiles_keeps_selection() {
        let tmp = setup(&[".secret", "visible.txt"], &[]);
        let pane = open(&tmp).toggle_selection("visible.txt");

        let pane = pane.with_show_hidden(true).unwrap();

        assert!(pane.selection().is_selected("visible.txt"));
        assert!(names(&pane).contains(&".secret"));
    }

    #[test]
    fn glob_change_clears_selection_and_filters() {
        let tmp = setup(&["a.rs", "b.md"], &[]);
        let pane = open(&tmp).toggle_selection("b.md");

        let glob = GlobPattern::new("*.rs").unwrap();
        let pane = pane.with_glob(Some(glob)).unwrap();

        assert!(pane.selection().is_empty());
        assert_eq!(names(&pane), vec!["..", "a.rs"]);
        assert!(pane.summary().starts_with("*.rs | "));

        let pane = pane.with_glob(None).unwrap();
        assert_eq!(names(&pane), vec!["..", "a.rs", "b.md"]);
        assert_eq!(pane.summary(), "8 B in 2 files | 0 dirs");
        let listing = list_dir(pane.path(), false, None).unwrap();
        assert_eq!(pane.totals(), listing.totals());
        assert_eq!(pane.summary(), listing.summary());
    }

    #[test]
    fn sort_change_keeps_selection_and_cursor_entry() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("big"), vec![0u8; 300]).unwrap();
        fs::write(tmp.path().join("small"), vec![0u8; 10]).unwrap();
        fs::write(tmp.path().join("medium"), vec![0u8; 100]).unwrap();
        let pane = open(&tmp).toggle_selection("small").with_cursor_on("big");

        let pane = pane.with_sort(SortSpec::new(SortKey::Size, false)).unwrap();

        assert_eq!(names(&pane), vec!["..", "small", "medium", "big"]);
        assert_eq!(pane.cursor_entry().unwrap().name(), "big");
        assert!(pane.selection().is_selected("small"));
    }

    #[test]
    fn sort_request_twice_flips_direction() {
        let tmp = setup(&["a", "b"], &[]);
        let pane = open(&tmp);

        let pane = pane.with_sort_request(SortKey::Name, false).unwrap();
        assert_eq!(pane.sort(), SortSpec::new(SortKey::Name, true));
        assert_eq!(names(&pane), vec!["..", "b", "a"]);

        let pane = pane.with_sort_request(SortKey::Name, true).unwrap();
        assert_eq!(pane.sort(), SortSpec::new(SortKey::Name, false));
    }

    #[test]
    fn refresh_keeps_cursor_name_and_sees_new_files() {
        let tmp = setup(&["b.txt", "c.txt"], &[]);
        let pane = open(&tmp).with_cursor_on("c.txt");
        fs::write(tmp.path().join("a.txt"), "").unwrap();

        let pane = pane.refresh().unwrap();

        assert_eq!(names(&pane), vec!["..", "a.txt", "b.txt", "c.txt"]);
        assert_eq!(pane.cursor_entry().unwrap().name(), "c.txt");
    }

    #[test]
    fn refresh_after_cursor_entry_deleted_keeps_row_index() {
        let tmp = setup(&["a.txt", "b.txt", "c.txt"], &[]);
        let pane = open(&tmp).with_cursor_on("c.txt");
        fs::remove_file(tmp.path().join("c.txt")).unwrap();

        let pane = pane.refresh().unwrap();

        assert_eq!(pane.cursor_entry().unwrap().name(), "b.txt");
    }

    #[test]
    fn refresh_drops_vanished_selected_names() {
        let tmp = setup(&["a.txt", "b.txt"], &[]);
        let pane = open(&tmp).select_all();
        fs::remove_file(tmp.path().join("a.txt")).unwrap();

        let pane = pane.refresh().unwrap();

        assert_eq!(pane.selection().all_names().collect::<Vec<_>>(), vec!["b.txt"]);
    }

    #[test]
    fn refresh_failure_leaves_state_untouched() {
        let tmp = setup(&["a.txt"], &["gone"]);
        let pane = PaneState::open(&tmp.path().join("gone"), false, SortSpec::default()).unwrap();
        fs::remove_dir(tmp.path().join("gone")).unwrap();

        assert!(pane.refresh().unwrap_err().is_access_error());
        assert!(pane.path().ends_with("gone"));
        assert_eq!(pane.entries().len(), 1);
    }

    #[test]
    fn cursor_moves_are_clamped() {
        let tmp = setup(&["a", "b", "c"], &[]);
        let pane = open(&tmp);

        let pane = pane.move_up();
        assert_eq!(pane.cursor_index(), 0);
        let pane = pane.move_down().move_down();
        assert_eq!(pane.cursor_index(), 2);
        let pane = pane.go_to_last().move_down();
        assert_eq!(pane.cursor_index(), 3);
        let pane = pane.page_up(10);
        assert_eq!(pane.cursor_index(), 0);
        let pane = pane.page_down(2);
        assert_eq!(pane.cursor_index(), 2);
        let pane = pane.with_cursor(99);
        assert_eq!(pane.cursor_index(), 3);
        assert_eq!(pane.go_to_first().cursor_index(), 0);
    }

    #[test]
    fn toggle_cursor_and_advance_selects_and_moves() {
        let tmp = setup(&["a", "b"], &[]);
        let pane = open(&tmp).with_cursor_on("a");

        let pane = pane.toggle_cursor_and_advance();

        assert!(pane.selection().is_selected("a"));
        assert_eq!(pane.cursor_entry().unwrap().name(), "b");
    }

    #[test]
    fn toggle_on_parent_row_never_selects_it() {
        let tmp = setup(&["a"], &[]);
        let pane = open(&tmp);
        assert!(pane.cursor_entry().unwrap().is_parent_link());

        let pane = pane.toggle_cursor_and_advance();

        assert!(pane.selection().is_empty());
        assert_eq!(pane.cursor_index(), 1);
    }

    #[test]
    fn toggle_unknown_name_is_ignored() {
        let tmp = setup(&["a"], &[]);
        let pane = open(&tmp).toggle_selection("ghost");
        assert!(pane.selection().is_empty());
    }

    #[test]
    fn select_all_and_invert() {
        let tmp = setup(&["a", "b", "c"], &[]);
        let pane = open(&tmp).toggle_selection("b");

        let inverted = pane.clone().invert_selection();
        assert_eq!(inverted.selection().all_names().collect::<Vec<_>>(), vec!["a", "c"]);

        let all = pane.select_all();
        assert_eq!(all.selection().len(), 3);
        assert!(!all.selection().is_selected(".."));

        assert!(all.clear_selection().selection().is_empty());
    }

    #[test]
    fn resolved_paths_falls_back_to_cursor() {
        let tmp = setup(&["a.txt", "b.txt"], &[]);
        let pane = open(&tmp);
        assert!(pane.resolved_paths().is_empty());

        let pane = pane.with_cursor_on("b.txt");
        assert_eq!(pane.resolved_paths(), vec![pane.path().join("b.txt")]);

        let pane = pane.toggle_selection("a.txt");
        assert_eq!(pane.resolved_paths(), vec![pane.path().join("a.txt")]);
    }

    #[test]
    fn cursor_path_of_parent_row_is_parent_dir() {
        let tmp = setup(&[], &["inner"]);
        let pane = PaneState::open(&tmp.path().join("inner"), false, SortSpec::default()).unwrap();
        assert_eq!(pane.cursor_path().unwrap(), fs::canonicalize(tmp.path()).unwrap());
    }

    #[test]
    fn summary_reflects_listing() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a"), vec![0u8; 1024]).unwrap();
        fs::create_dir(tmp.path().join("d")).unwrap();
        let pane = open(&tmp);
        assert_eq!(pane.summary(), "1.0 KB in 1 files | 1 dirs");
        assert_eq!(pane.subtitle(), pane.summary());
        assert_eq!(pane.kind(), PaneKind::Files);
    }

    #[cfg(unix)]
    #[test]
    fn entry_style_priorities() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = setup(&["plain", ".dot", "run.sh"], &["dir"]);
        fs::set_permissions(tmp.path().join("run.sh"), fs::Permissions::from_mode(0o755)).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("plain"), tmp.path().join("link")).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("dir"), tmp.path().join("dirlink")).unwrap();
        let pane = PaneState::open(tmp.path(), true, SortSpec::default())
            .unwrap()
            .toggle_selection("plain");

        let style_of = |name: &str| {
            let entry = pane.entries().iter().find(|e| e.name() == name).unwrap();
            pane.entry_style(entry)
        };

        assert_eq!(style_of("dir").kind, EntryKind::Directory);
        assert_eq!(style_of("dirlink").kind, EntryKind::Directory);
        assert_eq!(style_of("run.sh").kind, EntryKind::Executable);
        assert_eq!(style_of(".dot").kind, EntryKind::Hidden);
        assert_eq!(style_of("link").kind, EntryKind::Symlink);
        assert_eq!(style_of("plain").kind, EntryKind::Regular);
        assert!(style_of("plain").selected);
        assert!(!style_of("link").selected);
    }

    #[test]
    fn with_active_sets_focus_flag() {
        let tmp = setup(&[], &[]);
        assert!(open(&tmp).with_active(true).is_active());
    }
}
