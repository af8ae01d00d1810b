//! Status bar rendering.
//!
//! The status bar occupies a single row below the panes and shows the
//! cursor position, the selection count, the hidden-file indicator, the
//! active sort and the latest status message.

use duet_core::config::theme::{parse_color, Theme};
use duet_core::{format_size, DirEntry, SortSpec};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::Status;

/// Data needed to render the status bar.
pub struct StatusBarProps<'a> {
    pub entry_count: usize,
    pub cursor_index: usize,
    pub cursor_entry: Option<&'a DirEntry>,
    pub selected_count: usize,
    pub show_hidden: bool,
    pub sort: SortSpec,
    pub status: Option<&'a Status>,
}

/// Renders the bottom status bar.
pub fn render_statusbar(f: &mut Frame, area: Rect, props: &StatusBarProps<'_>, theme: &Theme) {
    let bg = parse_color(&theme.statusbar.bg);
    let fg = parse_color(&theme.statusbar.fg);

    let mut spans = vec![Span::styled(
        info_text(props),
        Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD),
    )];
    if let Some(status) = props.status {
        let colour = if status.is_error {
            &theme.statusbar.error_fg
        } else {
            &theme.statusbar.message_fg
        };
        spans.push(Span::styled(
            format!("  {}", status.text),
            Style::default()
                .fg(parse_color(colour))
                .bg(bg)
                .add_modifier(Modifier::ITALIC),
        ));
    }

    let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    f.render_widget(bar, area);
}

/// Position, cursor entry, selection, hidden flag and sort, space separated.
fn info_text(props: &StatusBarProps<'_>) -> String {
    let mut text = if props.entry_count > 0 {
        format!(" {}/{}", props.cursor_index + 1, props.entry_count)
    } else {
        " 0/0".to_string()
    };

    if let Some(entry) = props.cursor_entry.filter(|e| !e.is_parent_link()) {
        if entry.is_dir() {
            text.push_str(&format!("  [DIR] {}", entry.name()));
        } else {
            text.push_str(&format!("  {} ({})", entry.name(), format_size(entry.size())));
        }
    }
    if props.selected_count > 0 {
        text.push_str(&format!("  [{} selected]", props.selected_count));
    }
    if props.show_hidden {
        text.push_str("  [H]");
    }
    let direction = if props.sort.reverse { "desc" } else { "asc" };
    text.push_str(&format!("  {} {direction}", props.sort.key.label()));
    text
}
