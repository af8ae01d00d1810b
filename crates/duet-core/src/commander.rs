//! Application-level coordinator of the two panes.
//!
//! The [`Commander`] owns both pane slots, knows which one has focus and
//! applies [`Command`]s. Cross-pane effects are explicit: a cursor change
//! in the active pane is forwarded to whichever slot shows a preview, and
//! a finished batch operation refreshes both panes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::batch::{BatchOrchestrator, BatchReport, OpKind};
use crate::error::{CoreError, CoreResult};
use crate::event::{Command, Event};
use crate::fs::preview::ContentSniffer;
use crate::fs::trash::TrashBin;
use crate::nav::glob::GlobPattern;
use crate::nav::pane::{Pane, PaneKind, PaneState};
use crate::nav::preview_pane::{PreviewPane, PreviewSettings};
use crate::nav::sort::SortSpec;

/// One of the two pane slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaneSide {
    Left,
    Right,
}

impl PaneSide {
    pub const BOTH: [PaneSide; 2] = [PaneSide::Left, PaneSide::Right];

    pub fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

/// The body a slot currently shows.
#[derive(Debug, Clone, Copy)]
pub enum PaneContent<'a> {
    Files(&'a PaneState),
    Preview(&'a PreviewPane),
}

impl PaneContent<'_> {
    pub fn kind(&self) -> PaneKind {
        match self {
            Self::Files(pane) => pane.kind(),
            Self::Preview(pane) => pane.kind(),
        }
    }

    pub fn title(&self) -> String {
        match self {
            Self::Files(pane) => pane.title(),
            Self::Preview(pane) => pane.title(),
        }
    }

    pub fn subtitle(&self) -> String {
        match self {
            Self::Files(pane) => pane.subtitle(),
            Self::Preview(pane) => pane.subtitle(),
        }
    }
}

/// A slot keeps its files state while it shows a preview, so switching
/// back returns to the same directory.
#[derive(Debug, Clone)]
struct PaneSlot {
    kind: PaneKind,
    files: PaneState,
    preview: PreviewPane,
}

/// Start-up options of a [`Commander`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommanderOptions {
    pub show_hidden: bool,
    /// Deletes go to the trash when set, otherwise they are permanent.
    pub delete_to_trash: bool,
    pub sort: SortSpec,
    pub preview: PreviewSettings,
}

impl Default for CommanderOptions {
    fn default() -> Self {
        Self {
            show_hidden: false,
            delete_to_trash: true,
            sort: SortSpec::default(),
            preview: PreviewSettings::default(),
        }
    }
}

/// Holds both panes and routes commands to them.
///
/// Invariants: at least one slot lists files, and focus always rests on a
/// slot that lists files.
pub struct Commander {
    slots: [PaneSlot; 2],
    active: PaneSide,
    show_hidden: bool,
    delete_to_trash: bool,
    preview_settings: PreviewSettings,
    trash: Box<dyn TrashBin>,
}

impl Commander {
    /// Opens both panes as file lists, focusing the left one.
    ///
    /// # Errors
    ///
    /// Returns the access error of whichever start directory cannot be read.
    pub fn open(
        left: &Path,
        right: &Path,
        options: CommanderOptions,
        trash: Box<dyn TrashBin>,
        sniffer: Arc<dyn ContentSniffer + Send + Sync>,
    ) -> CoreResult<Self> {
        let preview_settings = PreviewSettings {
            include_hidden: options.show_hidden,
            ..options.preview
        };
        let preview = PreviewPane::new(preview_settings, sniffer);
        let slot = |path: &Path, active: bool| -> CoreResult<PaneSlot> {
            Ok(PaneSlot {
                kind: PaneKind::Files,
                files: PaneState::open(path, options.show_hidden, options.sort)?.with_active(active),
                preview: preview.clone(),
            })
        };

        Ok(Self {
            slots: [slot(left, true)?, slot(right, false)?],
            active: PaneSide::Left,
            show_hidden: options.show_hidden,
            delete_to_trash: options.delete_to_trash,
            preview_settings,
            trash,
        })
    }

    // --- Queries ---

    pub fn active_side(&self) -> PaneSide {
        self.active
    }

    /// The focused files pane.
    pub fn active(&self) -> &PaneState {
        self.files(self.active)
    }

    /// The files state of a slot, kept even while the slot shows a preview.
    pub fn files(&self, side: PaneSide) -> &PaneState {
        &self.slot(side).files
    }

    pub fn preview(&self, side: PaneSide) -> &PreviewPane {
        &self.slot(side).preview
    }

    pub fn kind(&self, side: PaneSide) -> PaneKind {
        self.slot(side).kind
    }

    /// What a slot shows right now.
    pub fn content(&self, side: PaneSide) -> PaneContent<'_> {
        let slot = self.slot(side);
        match slot.kind {
            PaneKind::Files => PaneContent::Files(&slot.files),
            PaneKind::Preview => PaneContent::Preview(&slot.preview),
        }
    }

    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    pub fn delete_to_trash(&self) -> bool {
        self.delete_to_trash
    }

    /// Destination offered for copy and move: the other pane's directory
    /// when it lists files, else the active pane's own directory.
    pub fn default_destination(&self) -> PathBuf {
        let other = self.active.other();
        match self.kind(other) {
            PaneKind::Files => self.files(other).path().to_path_buf(),
            PaneKind::Preview => self.active().path().to_path_buf(),
        }
    }

    // --- Commands ---

    /// Applies one command.
    ///
    /// # Errors
    ///
    /// Navigation failures, invalid globs and invalid requests are returned
    /// and leave every pane as it was. Batch operations never fail as a
    /// whole; their per-entry outcomes arrive in
    /// [`Event::OperationFinished`].
    pub fn dispatch(&mut self, command: Command) -> CoreResult<Vec<Event>> {
        let mut events = Vec::new();
        let side = self.active;

        match command {
            Command::NavigateTo(path) => {
                let next = self.files(side).navigate(&path)?;
                self.replace_files(side, next, &mut events);
            }
            Command::GoUp => {
                let next = self.files(side).go_up()?;
                self.replace_files(side, next, &mut events);
            }
            Command::Enter => {
                let next = self.files(side).enter_cursor()?;
                self.replace_files(side, next, &mut events);
            }
            Command::Refresh => self.refresh_all(&mut events),

            Command::CursorUp => self.map_files(side, PaneState::move_up, &mut events),
            Command::CursorDown => self.map_files(side, PaneState::move_down, &mut events),
            Command::CursorTop => self.map_files(side, PaneState::go_to_first, &mut events),
            Command::CursorBottom => self.map_files(side, PaneState::go_to_last, &mut events),
            Command::PageUp(rows) => self.map_files(side, |p| p.page_up(rows), &mut events),
            Command::PageDown(rows) => self.map_files(side, |p| p.page_down(rows), &mut events),

            Command::SetSort(key, reverse) => {
                let next = self.files(side).with_sort_request(key, reverse)?;
                self.replace_files(side, next, &mut events);
            }
            Command::ToggleHidden => self.set_show_hidden(!self.show_hidden, &mut events),
            Command::SetGlob(input) => {
                let glob = match input {
                    Some(text) => GlobPattern::parse_filter(&text)?,
                    None => None,
                };
                let next = self.files(side).with_glob(glob)?;
                self.replace_files(side, next, &mut events);
            }

            Command::ToggleSelection(name) => {
                self.map_files(side, |p| p.toggle_selection(&name), &mut events)
            }
            Command::ToggleCursorSelection => {
                self.map_files(side, PaneState::toggle_cursor_and_advance, &mut events)
            }
            Command::SelectAll => self.map_files(side, PaneState::select_all, &mut events),
            Command::InvertSelection => {
                self.map_files(side, PaneState::invert_selection, &mut events)
            }
            Command::ClearSelection => self.map_files(side, PaneState::clear_selection, &mut events),

            Command::Copy { dest } => {
                let sources = self.sources()?;
                let report = BatchOrchestrator::new(self.trash.as_ref()).copy(&sources, &dest);
                self.finish_operation(report, &mut events);
            }
            Command::Move { dest } => {
                let sources = self.sources()?;
                let report = BatchOrchestrator::new(self.trash.as_ref()).move_to(&sources, &dest);
                self.finish_operation(report, &mut events);
            }
            Command::Delete => {
                let sources = self.sources()?;
                let report = BatchOrchestrator::new(self.trash.as_ref())
                    .delete(&sources, self.delete_to_trash);
                self.finish_operation(report, &mut events);
            }
            Command::Mkdir(name) => {
                let parent = self.files(side).path().to_path_buf();
                let report = BatchOrchestrator::new(self.trash.as_ref()).mkdir(&parent, &name);
                let created = report.all_succeeded();
                self.finish_operation(report, &mut events);
                if created {
                    if let Some(first) = Path::new(name.trim()).components().next() {
                        let first = first.as_os_str().to_string_lossy().into_owned();
                        self.map_files(side, |p| p.with_cursor_on(&first), &mut events);
                    }
                }
            }

            Command::RequestPreview(path) => self.show_previews(Some(&path), true, &mut events),
            Command::SetPreviewLines(lines) => {
                self.preview_settings.max_lines = lines;
                self.apply_preview_settings(&mut events);
            }

            Command::FocusOther => self.focus(side.other(), &mut events),
            Command::FocusSide(target) => self.focus(target, &mut events),
            Command::SetPaneKind(target, kind) => self.set_pane_kind(target, kind, &mut events)?,
            Command::TogglePaneKind(target) => {
                let kind = match self.kind(target) {
                    PaneKind::Files => PaneKind::Preview,
                    PaneKind::Preview => PaneKind::Files,
                };
                self.set_pane_kind(target, kind, &mut events)?;
            }
        }

        Ok(events)
    }

    // --- Internals ---

    fn slot(&self, side: PaneSide) -> &PaneSlot {
        &self.slots[side.index()]
    }

    fn slot_mut(&mut self, side: PaneSide) -> &mut PaneSlot {
        &mut self.slots[side.index()]
    }

    fn sources(&self) -> CoreResult<Vec<PathBuf>> {
        let sources = self.active().resolved_paths();
        if sources.is_empty() {
            return Err(CoreError::InvalidOperation("no entries selected".to_string()));
        }
        Ok(sources)
    }

    fn map_files(&mut self, side: PaneSide, f: impl FnOnce(PaneState) -> PaneState, events: &mut Vec<Event>) {
        let next = f(self.files(side).clone());
        self.replace_files(side, next, events);
    }

    /// Installs a new files state and reports what changed.
    fn replace_files(&mut self, side: PaneSide, next: PaneState, events: &mut Vec<Event>) {
        let prev = &self.slot(side).files;
        let path_changed = prev.path() != next.path();
        let cursor_changed = prev.cursor_path() != next.cursor_path();
        let selection_changed = prev.selection() != next.selection();

        if path_changed {
            events.push(Event::DirectoryLoaded {
                side,
                path: next.path().to_path_buf(),
            });
        }
        if cursor_changed {
            events.push(Event::CursorMoved {
                side,
                path: next.cursor_path(),
            });
        }
        if selection_changed {
            events.push(Event::SelectionChanged {
                side,
                count: next.selection().len(),
            });
        }

        self.slot_mut(side).files = next;

        if side == self.active && (path_changed || cursor_changed) {
            self.sync_previews(false, events);
        }
    }

    /// Points preview slots at the active pane's cursor.
    fn sync_previews(&mut self, force: bool, events: &mut Vec<Event>) {
        let target = self.active().cursor_path();
        self.show_previews(target.as_deref(), force, events);
    }

    fn show_previews(&mut self, target: Option<&Path>, force: bool, events: &mut Vec<Event>) {
        for side in PaneSide::BOTH {
            let slot = self.slot(side);
            if slot.kind != PaneKind::Preview {
                continue;
            }
            if !force && slot.preview.target() == target {
                continue;
            }
            let preview = slot.preview.show(target);
            self.slot_mut(side).preview = preview;
            events.push(Event::PreviewUpdated {
                side,
                target: target.map(Path::to_path_buf),
            });
        }
    }

    /// Re-reads one slot; a failure keeps the previous listing.
    fn refresh_side(&mut self, side: PaneSide, events: &mut Vec<Event>) {
        let slot = self.slot(side);
        if slot.kind == PaneKind::Preview {
            if let Ok(preview) = Pane::refresh(&slot.preview) {
                self.slot_mut(side).preview = preview;
            }
            return;
        }
        match Pane::refresh(&slot.files) {
            Ok(next) => self.replace_files(side, next, events),
            Err(e) => {
                tracing::warn!(
                    path = %slot.files.path().display(),
                    error = %e,
                    "refresh failed, keeping previous listing"
                );
                events.push(Event::RefreshFailed {
                    side,
                    error: e.to_string(),
                });
            }
        }
    }

    fn refresh_all(&mut self, events: &mut Vec<Event>) {
        for side in PaneSide::BOTH {
            if self.kind(side) == PaneKind::Files {
                self.refresh_side(side, events);
            }
        }
        self.sync_previews(true, events);
    }

    /// Pushes the current preview settings into every preview slot.
    fn apply_preview_settings(&mut self, events: &mut Vec<Event>) {
        for side in PaneSide::BOTH {
            let slot = self.slot(side);
            if slot.kind != PaneKind::Preview || slot.preview.settings() == self.preview_settings {
                continue;
            }
            let preview = slot.preview.with_settings(self.preview_settings);
            self.slot_mut(side).preview = preview;
            events.push(Event::PreviewUpdated {
                side,
                target: self.preview(side).target().map(Path::to_path_buf),
            });
        }
    }

    /// Applies the global hidden-files flag to both panes.
    ///
    /// The flag only flips when at least one pane could be re-read. A pane
    /// that could not keeps its rows but takes the flag, so the next
    /// successful refresh applies it.
    fn set_show_hidden(&mut self, show_hidden: bool, events: &mut Vec<Event>) {
        let results = PaneSide::BOTH
            .map(|side| (side, self.files(side).with_show_hidden(show_hidden)));
        let any_ok = results.iter().any(|(_, result)| result.is_ok());
        if any_ok {
            self.show_hidden = show_hidden;
            self.preview_settings.include_hidden = show_hidden;
        }

        for (side, result) in results {
            match result {
                Ok(next) => self.replace_files(side, next, events),
                Err(e) => {
                    tracing::warn!(error = %e, "hidden toggle could not re-read pane");
                    if any_ok {
                        self.map_files(side, |pane| pane.with_hidden_flag(show_hidden), events);
                    }
                    events.push(Event::RefreshFailed {
                        side,
                        error: e.to_string(),
                    });
                }
            }
        }
        if any_ok {
            self.apply_preview_settings(events);
            self.sync_previews(false, events);
        }
    }

    fn finish_operation(&mut self, report: BatchReport, events: &mut Vec<Event>) {
        if report.any_succeeded() && report.kind() != OpKind::Mkdir {
            let side = self.active;
            self.map_files(side, PaneState::clear_selection, events);
        }
        tracing::info!("{}", report.summary());
        self.refresh_all(events);
        events.push(Event::OperationFinished(report));
    }

    fn focus(&mut self, side: PaneSide, events: &mut Vec<Event>) {
        if side == self.active || self.kind(side) != PaneKind::Files {
            return;
        }
        for s in PaneSide::BOTH {
            let files = self.files(s).clone().with_active(s == side);
            self.slot_mut(s).files = files;
        }
        self.active = side;
        events.push(Event::FocusChanged(side));
        self.sync_previews(false, events);
    }

    fn set_pane_kind(&mut self, side: PaneSide, kind: PaneKind, events: &mut Vec<Event>) -> CoreResult<()> {
        if self.kind(side) == kind {
            return Ok(());
        }
        if kind == PaneKind::Preview && self.kind(side.other()) == PaneKind::Preview {
            return Err(CoreError::InvalidOperation(
                "one pane must keep listing files".to_string(),
            ));
        }

        self.slot_mut(side).kind = kind;
        events.push(Event::PaneKindChanged { side, kind });

        match kind {
            PaneKind::Preview => {
                if self.active == side {
                    self.focus(side.other(), events);
                }
                let preview = self.preview(side).with_settings(self.preview_settings);
                self.slot_mut(side).preview = preview;
                self.sync_previews(true, events);
            }
            PaneKind::Files => self.refresh_side(side, events),
        }
        Ok(())
    }
}
