use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use duet_core::config::settings::Config;
use duet_core::config::theme::Theme;
use duet_core::{BatchReport, Command, Commander, Event, PaneKind, PaneSide};

/// Application mode. It decides how input is routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    /// A one-line text prompt.
    Input {
        purpose: InputPurpose,
        title: String,
        value: String,
    },
    Confirm(ConfirmAction),
    /// A dismissable notice. `level` picks the colour.
    Message {
        title: String,
        lines: Vec<String>,
        level: MessageLevel,
    },
    /// Choosing what a pane slot shows. `selected` indexes [`PANE_CHOICES`].
    PaneSelect { side: PaneSide, selected: usize },
}

/// What the text typed into an [`AppMode::Input`] prompt is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPurpose {
    Copy,
    Move,
    Mkdir,
    Find,
}

/// What action is pending user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    Delete { prompt: String },
    Quit,
}

impl ConfirmAction {
    pub fn prompt(&self) -> &str {
        match self {
            Self::Delete { prompt } => prompt,
            Self::Quit => "Quit?",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

/// Choices offered by the pane selector, in display order.
pub const PANE_CHOICES: [PaneKind; 2] = [PaneKind::Files, PaneKind::Preview];

/// One-line status bar message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub is_error: bool,
}

/// What opening the highlighted row should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenTarget {
    Directory,
    File(PathBuf),
    Nothing,
}

/// Top-level UI state around the [`Commander`].
pub struct App {
    commander: Commander,
    config: Config,
    theme: Theme,
    /// The theme `A` swaps in.
    spare_theme: Theme,
    light: bool,
    mode: AppMode,
    status: Option<Status>,
    should_quit: bool,
    page_rows: usize,
}

impl App {
    pub fn new(commander: Commander, config: Config, theme: Theme) -> Self {
        Self {
            commander,
            config,
            theme,
            spare_theme: Theme::light(),
            light: false,
            mode: AppMode::Normal,
            status: None,
            should_quit: false,
            page_rows: 10,
        }
    }

    // --- Accessors ---

    pub fn commander(&self) -> &Commander {
        &self.commander
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn mode(&self) -> &AppMode {
        &self.mode
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn page_rows(&self) -> usize {
        self.page_rows
    }

    // --- Plain transitions ---

    pub fn with_mode(self, mode: AppMode) -> Self {
        Self { mode, ..self }
    }

    pub fn with_quit(self) -> Self {
        Self {
            should_quit: true,
            ..self
        }
    }

    pub fn with_status(self, text: impl Into<String>) -> Self {
        Self {
            status: Some(Status {
                text: text.into(),
                is_error: false,
            }),
            ..self
        }
    }

    pub fn with_error(self, text: impl Into<String>) -> Self {
        Self {
            status: Some(Status {
                text: text.into(),
                is_error: true,
            }),
            ..self
        }
    }

    pub fn with_clear_status(self) -> Self {
        Self {
            status: None,
            ..self
        }
    }

    /// Records the visible list height.
    ///
    /// Unless the config fixes a preview budget, the preview panes follow
    /// the pane height too.
    pub fn with_page_rows(self, rows: usize) -> Self {
        let rows = rows.max(1);
        if rows == self.page_rows {
            return self;
        }
        let app = Self {
            page_rows: rows,
            ..self
        };
        if app.config.preview.max_lines.is_none() {
            app.dispatch(Command::SetPreviewLines(rows))
        } else {
            app
        }
    }

    /// Sends a command to the commander and folds its events into the UI.
    pub fn dispatch(mut self, command: Command) -> Self {
        tracing::debug!(?command, "dispatch");
        match self.commander.dispatch(command) {
            Ok(events) => events.into_iter().fold(self, Self::absorb),
            Err(e) => {
                tracing::warn!(error = %e, "command failed");
                self.with_error(e.to_string())
            }
        }
    }

    fn absorb(self, event: Event) -> Self {
        match event {
            Event::OperationFinished(report) => self.report_operation(&report),
            Event::RefreshFailed { side, error } => {
                self.with_error(format!("{} pane: {error}", side_label(side)))
            }
            Event::DirectoryLoaded { .. } => self.with_clear_status(),
            Event::CursorMoved { .. }
            | Event::SelectionChanged { .. }
            | Event::PreviewUpdated { .. }
            | Event::FocusChanged(_)
            | Event::PaneKindChanged { .. } => self,
        }
    }

    fn report_operation(self, report: &BatchReport) -> Self {
        if report.all_succeeded() {
            return self.with_status(report.summary());
        }
        let lines = report
            .failed()
            .map(|e| e.to_string())
            .collect::<Vec<_>>();
        let title = report.summary();
        self.with_clear_status().with_mode(AppMode::Message {
            title,
            lines,
            level: MessageLevel::Error,
        })
    }

    // --- Dialog openers ---

    pub fn request_copy(self) -> Self {
        self.request_transfer(InputPurpose::Copy, "Copy")
    }

    pub fn request_move(self) -> Self {
        self.request_transfer(InputPurpose::Move, "Move")
    }

    fn request_transfer(self, purpose: InputPurpose, verb: &str) -> Self {
        let Some(subject) = self.subject() else {
            return self.with_error(format!("Nothing to {}", verb.to_lowercase()));
        };
        let title = format!("{verb} {subject} to");
        let value = self.commander.default_destination().display().to_string();
        self.with_mode(AppMode::Input {
            purpose,
            title,
            value,
        })
    }

    /// Opens the delete confirmation, or deletes at once when the config
    /// turns confirmation off.
    pub fn request_delete(self) -> Self {
        let Some(subject) = self.subject() else {
            return self.with_error("Nothing to delete");
        };
        if !self.config.general.confirm_delete {
            return self.dispatch(Command::Delete);
        }
        let prompt = if self.commander.delete_to_trash() {
            format!("This will move {subject} to Trash")
        } else {
            format!("This will permanently delete {subject}")
        };
        self.with_mode(AppMode::Confirm(ConfirmAction::Delete { prompt }))
    }

    pub fn request_mkdir(self) -> Self {
        self.with_mode(AppMode::Input {
            purpose: InputPurpose::Mkdir,
            title: "New directory".to_string(),
            value: String::new(),
        })
    }

    pub fn request_find(self) -> Self {
        let value = self
            .commander
            .active()
            .glob()
            .map(|g| g.as_str().to_string())
            .unwrap_or_else(|| "*".to_string());
        self.with_mode(AppMode::Input {
            purpose: InputPurpose::Find,
            title: "Find files, enter glob expression".to_string(),
            value,
        })
    }

    pub fn request_quit(self) -> Self {
        if self.config.general.confirm_quit {
            self.with_mode(AppMode::Confirm(ConfirmAction::Quit))
        } else {
            self.with_quit()
        }
    }

    pub fn show_about(self) -> Self {
        self.with_mode(AppMode::Message {
            title: "About".to_string(),
            lines: vec![
                format!("duet {}", env!("CARGO_PKG_VERSION")),
                "A dual-pane terminal file manager.".to_string(),
                format!("Licensed under the {} license.", env!("CARGO_PKG_LICENSE")),
            ],
            level: MessageLevel::Info,
        })
    }

    /// Swaps the configured colours for the built-in light ones and back.
    pub fn toggle_appearance(self) -> Self {
        let light = !self.light;
        let app = Self {
            theme: self.spare_theme,
            spare_theme: self.theme,
            light,
            ..self
        };
        app.with_status(if light { "Light appearance" } else { "Dark appearance" })
    }

    pub fn request_pane_select(self, side: PaneSide) -> Self {
        let current = self.commander.kind(side);
        let selected = PANE_CHOICES.iter().position(|k| *k == current).unwrap_or(0);
        self.with_mode(AppMode::PaneSelect { side, selected })
    }

    /// Describes what an operation would act on: the single entry's name,
    /// or a count of selected entries.
    fn subject(&self) -> Option<String> {
        let paths = self.commander.active().resolved_paths();
        match paths.as_slice() {
            [] => None,
            [one] => Some(
                one.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| one.display().to_string()),
            ),
            many => Some(format!("{} selected entries", many.len())),
        }
    }

    // --- Modal editing ---

    pub fn input_push(self, c: char) -> Self {
        self.edit_input(|value| value.push(c))
    }

    pub fn input_pop(self) -> Self {
        self.edit_input(|value| {
            value.pop();
        })
    }

    pub fn input_clear(self) -> Self {
        self.edit_input(String::clear)
    }

    fn edit_input(self, edit: impl FnOnce(&mut String)) -> Self {
        match self.mode.clone() {
            AppMode::Input {
                purpose,
                title,
                mut value,
            } => {
                edit(&mut value);
                self.with_mode(AppMode::Input {
                    purpose,
                    title,
                    value,
                })
            }
            _ => self,
        }
    }

    /// Applies the prompt's value. A blank value just closes the prompt.
    pub fn input_confirm(self) -> Self {
        let AppMode::Input { purpose, value, .. } = self.mode.clone() else {
            return self;
        };
        let app = self.with_mode(AppMode::Normal);
        let value = value.trim();
        if value.is_empty() && purpose != InputPurpose::Find {
            return app;
        }
        match purpose {
            InputPurpose::Copy => {
                let dest = app.resolve_input_path(value);
                app.dispatch(Command::Copy { dest })
            }
            InputPurpose::Move => {
                let dest = app.resolve_input_path(value);
                app.dispatch(Command::Move { dest })
            }
            InputPurpose::Mkdir => app.dispatch(Command::Mkdir(value.to_string())),
            InputPurpose::Find => app.dispatch(Command::SetGlob(Some(value.to_string()))),
        }
    }

    /// Relative destinations are taken from the active pane's directory.
    fn resolve_input_path(&self, value: &str) -> PathBuf {
        let path = expand_home(value);
        if path.is_absolute() {
            path
        } else {
            self.commander.active().path().join(path)
        }
    }

    pub fn confirm_accept(self) -> Self {
        match self.mode.clone() {
            AppMode::Confirm(ConfirmAction::Delete { .. }) => {
                self.with_mode(AppMode::Normal).dispatch(Command::Delete)
            }
            AppMode::Confirm(ConfirmAction::Quit) => self.with_mode(AppMode::Normal).with_quit(),
            _ => self,
        }
    }

    pub fn pane_select_move(self, delta: isize) -> Self {
        match self.mode {
            AppMode::PaneSelect { side, selected } => {
                let len = PANE_CHOICES.len() as isize;
                let next = (selected as isize + delta).rem_euclid(len) as usize;
                self.with_mode(AppMode::PaneSelect {
                    side,
                    selected: next,
                })
            }
            _ => self,
        }
    }

    pub fn pane_select_confirm(self) -> Self {
        match self.mode {
            AppMode::PaneSelect { side, selected } => {
                let kind = PANE_CHOICES.get(selected).copied().unwrap_or_default();
                self.with_mode(AppMode::Normal)
                    .dispatch(Command::SetPaneKind(side, kind))
            }
            _ => self,
        }
    }

    /// Closes any dialog.
    pub fn dismiss(self) -> Self {
        self.with_mode(AppMode::Normal)
    }

    // --- External programs ---

    /// Decides what Enter on the highlighted row does.
    pub fn open_target(&self) -> OpenTarget {
        match self.commander.active().cursor_entry() {
            Some(entry) if entry.is_dir() => OpenTarget::Directory,
            Some(entry) => OpenTarget::File(entry.path().to_path_buf()),
            None => OpenTarget::Nothing,
        }
    }

    /// Folds the result of a suspended program back into the UI. Panes are
    /// re-read afterwards when `refresh` is set.
    pub fn after_external(
        self,
        label: &str,
        outcome: anyhow::Result<ExitStatus>,
        refresh: bool,
    ) -> Self {
        let app = match outcome {
            Ok(status) if status.success() => self,
            Ok(status) => {
                let code = status
                    .code()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string());
                tracing::warn!(program = label, code = %code, "external program failed");
                self.with_mode(AppMode::Message {
                    title: "Warning".to_string(),
                    lines: vec![format!("{label} exited with an error ({code})")],
                    level: MessageLevel::Warning,
                })
            }
            Err(e) => {
                tracing::error!(program = label, error = %e, "external program did not run");
                self.with_mode(AppMode::Message {
                    title: "Error".to_string(),
                    lines: vec![e.to_string()],
                    level: MessageLevel::Error,
                })
            }
        };
        if refresh {
            app.dispatch(Command::Refresh)
        } else {
            app
        }
    }

    /// Shown when no program of the wanted kind exists.
    pub fn program_missing(self, label: &str) -> Self {
        self.with_mode(AppMode::Message {
            title: "Error".to_string(),
            lines: vec![format!("No {} found!", label.to_lowercase())],
            level: MessageLevel::Error,
        })
    }
}

pub fn side_label(side: PaneSide) -> &'static str {
    match side {
        PaneSide::Left => "Left",
        PaneSide::Right => "Right",
    }
}

fn expand_home(value: &str) -> PathBuf {
    match value.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => {
            match std::env::var_os("HOME") {
                Some(home) => Path::new(&home).join(rest.trim_start_matches('/')),
                None => PathBuf::from(value),
            }
        }
        _ => PathBuf::from(value),
    }
}
