use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use duet_core::config::theme::{parse_color, Theme};
use duet_core::{PaneContent, PaneSide};

use crate::app::{App, AppMode, PANE_CHOICES};
use crate::ui::panel::render_file_list;
use crate::ui::popup::{render_confirm, render_input, render_message, render_select};
use crate::ui::preview::render_preview;
use crate::ui::statusbar::{render_statusbar, StatusBarProps};

/// Rows below the panes: status bar and key hints.
const BOTTOM_ROWS: u16 = 2;
/// Rows of a pane that are not list rows: two borders and the header.
const PANE_CHROME_ROWS: u16 = 3;

const KEY_HINTS: &[(&str, &str)] = &[
    ("v", "View"),
    ("e", "Edit"),
    ("c", "Copy"),
    ("m", "Move"),
    ("^N", "Mkdir"),
    ("d", "Delete"),
    ("f", "Find"),
    ("x", "Shell"),
    ("^E/^R", "Pane"),
    ("?", "About"),
    ("q", "Quit"),
];

/// List rows visible in a pane for a terminal `height` rows tall.
pub fn page_rows(height: u16) -> usize {
    height.saturating_sub(BOTTOM_ROWS + PANE_CHROME_ROWS).max(1) as usize
}

/// Main render function. Composes the full UI layout each frame.
pub fn render(f: &mut Frame, app: &App) {
    let theme = app.theme();
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(vertical[0]);
    render_pane(f, panes[0], app, PaneSide::Left);
    render_pane(f, panes[1], app, PaneSide::Right);

    let active = app.commander().active();
    let props = StatusBarProps {
        entry_count: active.entries().len(),
        cursor_index: active.cursor_index(),
        cursor_entry: active.cursor_entry(),
        selected_count: active.selection().len(),
        show_hidden: app.commander().show_hidden(),
        sort: active.sort(),
        status: app.status(),
    };
    render_statusbar(f, vertical[1], &props, theme);
    render_key_hints(f, vertical[2], theme);

    // Render modal overlays based on mode
    match app.mode() {
        AppMode::Input { title, value, .. } => render_input(f, title, value, theme),
        AppMode::Confirm(action) => render_confirm(f, action.prompt(), theme),
        AppMode::Message {
            title,
            lines,
            level,
        } => render_message(f, title, lines, *level, theme),
        AppMode::PaneSelect { side, selected } => {
            let options: Vec<&str> = PANE_CHOICES.iter().map(|k| k.label()).collect();
            let title = format!("{} pane", crate::app::side_label(*side));
            render_select(f, &title, &options, *selected, theme);
        }
        AppMode::Normal => {}
    }
}

fn render_pane(f: &mut Frame, area: Rect, app: &App, side: PaneSide) {
    match app.commander().content(side) {
        PaneContent::Files(pane) => {
            render_file_list(f, area, pane, app.theme(), &app.config().ui.date_format)
        }
        PaneContent::Preview(pane) => render_preview(f, area, pane, app.theme()),
    }
}

fn render_key_hints(f: &mut Frame, area: Rect, theme: &Theme) {
    let key_style = Style::default()
        .fg(parse_color(&theme.panel.header_fg))
        .add_modifier(Modifier::BOLD);
    let spans: Vec<Span> = KEY_HINTS
        .iter()
        .flat_map(|(key, label)| {
            [
                Span::styled(format!(" {key}"), key_style),
                Span::raw(format!(" {label} ")),
            ]
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_rows_subtracts_chrome() {
        assert_eq!(page_rows(40), 35);
    }

    #[test]
    fn page_rows_never_zero() {
        assert_eq!(page_rows(3), 1);
        assert_eq!(page_rows(0), 1);
    }
}
