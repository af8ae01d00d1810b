//! Modal dialogs drawn over the panes.

use duet_core::config::theme::{parse_color, Theme};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::MessageLevel;

/// Renders a centered popup dialog with the given title and message lines.
pub fn render_popup(f: &mut Frame, title: &str, lines: Vec<Line<'static>>, theme: &Theme) {
    render_box(f, title, lines, &theme.popup.border_fg, theme);
}

/// A one-line prompt. The value is shown with a trailing cursor.
pub fn render_input(f: &mut Frame, title: &str, value: &str, theme: &Theme) {
    let lines = vec![
        Line::from(Span::styled(
            format!("{value}_"),
            Style::default().fg(parse_color(&theme.popup.input_fg)),
        )),
        Line::from(""),
        hint("Enter: confirm  Esc: cancel  Ctrl+U: clear"),
    ];
    render_popup(f, title, lines, theme);
}

/// A yes/no question.
pub fn render_confirm(f: &mut Frame, prompt: &str, theme: &Theme) {
    let lines = vec![
        Line::from(prompt.to_string()),
        Line::from(""),
        hint("y: yes  n: no"),
    ];
    render_popup(f, "Confirm", lines, theme);
}

/// A dismissable notice. Errors get the error border.
pub fn render_message(
    f: &mut Frame,
    title: &str,
    lines: &[String],
    level: MessageLevel,
    theme: &Theme,
) {
    let mut content: Vec<Line<'static>> = lines.iter().map(|l| Line::from(l.clone())).collect();
    content.push(Line::from(""));
    content.push(hint("Enter: close"));
    let border = match level {
        MessageLevel::Info | MessageLevel::Warning => &theme.popup.border_fg,
        MessageLevel::Error => &theme.popup.error_fg,
    };
    render_box(f, title, content, border, theme);
}

/// A list of options with one highlighted.
pub fn render_select(f: &mut Frame, title: &str, options: &[&str], selected: usize, theme: &Theme) {
    let mut lines: Vec<Line<'static>> = options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            if i == selected {
                Line::from(Span::styled(
                    format!("> {option}"),
                    Style::default()
                        .fg(parse_color(&theme.popup.title_fg))
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(format!("  {option}"))
            }
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(hint("j/k: move  Enter: choose  Esc: cancel"));
    render_popup(f, title, lines, theme);
}

fn hint(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().add_modifier(Modifier::DIM),
    ))
}

fn render_box(f: &mut Frame, title: &str, lines: Vec<Line<'static>>, border: &str, theme: &Theme) {
    let height = (lines.len() as u16).saturating_add(2);
    let area = centered_box(60, height, f.area());

    f.render_widget(Clear, area);

    let popup = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                format!(" {title} "),
                Style::default()
                    .fg(parse_color(&theme.popup.title_fg))
                    .add_modifier(Modifier::BOLD),
            ))
            .border_style(Style::default().fg(parse_color(border))),
    );

    f.render_widget(popup, area);
}

/// A rectangle `percent_x` wide and `height` rows tall, centered in `area`
/// and clipped to it.
fn centered_box(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let top = area.y + (area.height - height) / 2;
    let row = Rect::new(area.x, top, area.width, height);
    centered_rect(percent_x, 100, row)
}

/// Calculates a centered rectangle of the given percentage size within the parent area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_inside_and_centered() {
        let area = Rect::new(0, 0, 100, 50);
        let rect = centered_rect(50, 40, area);
        assert_eq!(rect.width, 50);
        assert_eq!(rect.height, 20);
        assert_eq!(rect.x, 25);
        assert_eq!(rect.y, 15);
    }

    #[test]
    fn centered_box_uses_row_count() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered_box(60, 6, area);
        assert_eq!(rect.height, 6);
        assert_eq!(rect.y, 17);
        assert_eq!(rect.width, 60);
    }

    #[test]
    fn centered_box_clips_to_small_terminals() {
        let area = Rect::new(0, 0, 20, 4);
        let rect = centered_box(60, 10, area);
        assert_eq!(rect.height, 4);
        assert_eq!(rect.y, 0);
    }
}
