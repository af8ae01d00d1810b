use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use duet_core::{Command, PaneSide, SortKey};

use crate::app::AppMode;

/// Actions that can result from a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum InputAction {
    /// Dispatch a core Command.
    Command(Command),
    /// Open the highlighted row: enter a directory, hand a file to the
    /// desktop opener.
    Open,
    RequestCopy,
    RequestMove,
    RequestDelete,
    RequestMkdir,
    RequestFind,
    /// Ask before quitting, if the config wants that.
    RequestQuit,
    /// Quit immediately.
    Quit,
    /// Open the pane type selector for a slot.
    SelectPane(PaneSide),
    View,
    Edit,
    Shell,
    About,
    /// Switch between the dark and light colours.
    ToggleAppearance,
    /// Append a character to the prompt.
    InputChar(char),
    InputBackspace,
    InputClear,
    InputConfirm,
    /// User confirmed the pending action.
    ConfirmApproved,
    SelectUp,
    SelectDown,
    SelectConfirm,
    /// Close the current dialog.
    Dismiss,
    None,
}

/// Maps a key press to an action for the current mode.
///
/// `page_rows` is the number of visible list rows, used for paging.
pub fn handle_key(key: KeyEvent, mode: &AppMode, page_rows: usize) -> InputAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return InputAction::Quit;
    }
    match mode {
        AppMode::Normal => handle_normal_key(key, page_rows),
        AppMode::Input { .. } => handle_input_key(key),
        AppMode::Confirm(_) => handle_confirm_key(key),
        AppMode::Message { .. } => handle_message_key(key),
        AppMode::PaneSelect { .. } => handle_pane_select_key(key),
    }
}

fn handle_normal_key(key: KeyEvent, page_rows: usize) -> InputAction {
    let rows = page_rows.max(1);
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('f') | KeyCode::Char('d') => {
                InputAction::Command(Command::PageDown(rows))
            }
            KeyCode::Char('b') | KeyCode::Char('u') => InputAction::Command(Command::PageUp(rows)),
            KeyCode::Char('n') => InputAction::RequestMkdir,
            KeyCode::Char('e') => InputAction::SelectPane(PaneSide::Left),
            KeyCode::Char('r') => InputAction::SelectPane(PaneSide::Right),
            _ => InputAction::None,
        };
    }

    let sort = |key: SortKey, reverse: bool| InputAction::Command(Command::SetSort(key, reverse));
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => InputAction::Command(Command::CursorDown),
        KeyCode::Char('k') | KeyCode::Up => InputAction::Command(Command::CursorUp),
        KeyCode::Char('g') | KeyCode::Home => InputAction::Command(Command::CursorTop),
        KeyCode::Char('G') | KeyCode::End => InputAction::Command(Command::CursorBottom),
        KeyCode::PageDown => InputAction::Command(Command::PageDown(rows)),
        KeyCode::PageUp => InputAction::Command(Command::PageUp(rows)),
        KeyCode::Char('b') | KeyCode::Backspace | KeyCode::Left => {
            InputAction::Command(Command::GoUp)
        }
        KeyCode::Enter | KeyCode::Right => InputAction::Open,
        KeyCode::Tab => InputAction::Command(Command::FocusOther),

        KeyCode::Char('n') => sort(SortKey::Name, false),
        KeyCode::Char('N') => sort(SortKey::Name, true),
        KeyCode::Char('s') => sort(SortKey::Size, false),
        KeyCode::Char('S') => sort(SortKey::Size, true),
        KeyCode::Char('t') => sort(SortKey::Mtime, false),
        KeyCode::Char('T') => sort(SortKey::Mtime, true),
        KeyCode::Char('h') => InputAction::Command(Command::ToggleHidden),
        KeyCode::Char('f') => InputAction::RequestFind,
        KeyCode::Char('R') => InputAction::Command(Command::Refresh),

        KeyCode::Char(' ') => InputAction::Command(Command::ToggleCursorSelection),
        KeyCode::Char('+') => InputAction::Command(Command::SelectAll),
        KeyCode::Char('*') => InputAction::Command(Command::InvertSelection),
        KeyCode::Char('-') => InputAction::Command(Command::ClearSelection),

        KeyCode::Char('v') | KeyCode::F(3) => InputAction::View,
        KeyCode::Char('e') | KeyCode::F(4) => InputAction::Edit,
        KeyCode::Char('x') => InputAction::Shell,
        KeyCode::Char('c') | KeyCode::F(5) => InputAction::RequestCopy,
        KeyCode::Char('m') | KeyCode::F(6) => InputAction::RequestMove,
        KeyCode::F(7) => InputAction::RequestMkdir,
        KeyCode::Char('d') | KeyCode::Delete | KeyCode::F(8) => InputAction::RequestDelete,
        KeyCode::Char('q') | KeyCode::F(10) => InputAction::RequestQuit,
        KeyCode::Char('?') => InputAction::About,
        KeyCode::Char('A') => InputAction::ToggleAppearance,
        _ => InputAction::None,
    }
}

fn handle_input_key(key: KeyEvent) -> InputAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('u') => InputAction::InputClear,
            _ => InputAction::None,
        };
    }
    match key.code {
        KeyCode::Esc => InputAction::Dismiss,
        KeyCode::Enter => InputAction::InputConfirm,
        KeyCode::Backspace => InputAction::InputBackspace,
        KeyCode::Char(c) => InputAction::InputChar(c),
        _ => InputAction::None,
    }
}

fn handle_confirm_key(key: KeyEvent) -> InputAction {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => InputAction::ConfirmApproved,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('q') | KeyCode::Esc => {
            InputAction::Dismiss
        }
        _ => InputAction::None,
    }
}

fn handle_message_key(key: KeyEvent) -> InputAction {
    match key.code {
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char(' ') => {
            InputAction::Dismiss
        }
        _ => InputAction::None,
    }
}

fn handle_pane_select_key(key: KeyEvent) -> InputAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => InputAction::SelectDown,
        KeyCode::Char('k') | KeyCode::Up => InputAction::SelectUp,
        KeyCode::Enter => InputAction::SelectConfirm,
        KeyCode::Esc | KeyCode::Char('q') => InputAction::Dismiss,
        _ => InputAction::None,
    }
}
