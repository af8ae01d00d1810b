//! File list pane rendering.
//!
//! Each row shows the entry name, a size column (or a `-- DIR --` style
//! tag) and the modification time. The header marks the sorted column with
//! its direction.

use std::fmt::Write as _;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use duet_core::config::theme::{parse_color, Theme};
use duet_core::{format_size, DirEntry, EntryKind, EntryStyle, PaneState, SortKey, SortSpec};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const SIZE_WIDTH: usize = 10;
/// Narrowest name column for which the time column is still shown.
const MIN_NAME_WIDTH: usize = 12;
const ELLIPSIS: &str = "...";

/// Renders a files pane.
pub fn render_file_list(
    f: &mut Frame,
    area: Rect,
    pane: &PaneState,
    theme: &Theme,
    date_format: &str,
) {
    let border_fg = if pane.is_active() {
        parse_color(&theme.panel.active_border_fg)
    } else {
        parse_color(&theme.panel.inactive_border_fg)
    };
    let title = fit_path(&pane.path().display().to_string(), area.width.saturating_sub(4) as usize);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "))
        .title_bottom(format!(" {} ", pane.summary()))
        .border_style(Style::default().fg(border_fg));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let width = inner.width as usize;
    let rows = (inner.height as usize).saturating_sub(1);
    let date_width = date_column_width(pane.entries(), date_format);
    let columns = Columns::fit(width, date_width);

    let mut lines = vec![header_line(pane.sort(), &columns, theme)];
    let (start, end) = visible_window(pane.cursor_index(), pane.entries().len(), rows);
    for (index, entry) in pane.entries()[start..end].iter().enumerate() {
        let is_cursor = start + index == pane.cursor_index();
        let style = row_style(pane.entry_style(entry), is_cursor, pane.is_active(), theme);
        lines.push(Line::from(Span::styled(
            row_text(entry, &columns, date_format),
            style,
        )));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

/// Column widths of one pane. A `date` of zero hides the time column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    name: usize,
    size: usize,
    date: usize,
}

impl Columns {
    fn fit(width: usize, date_width: usize) -> Self {
        let with_date = width.saturating_sub(SIZE_WIDTH + date_width + 2);
        if with_date >= MIN_NAME_WIDTH && date_width > 0 {
            Self {
                name: with_date,
                size: SIZE_WIDTH,
                date: date_width,
            }
        } else {
            Self {
                name: width.saturating_sub(SIZE_WIDTH + 1),
                size: SIZE_WIDTH,
                date: 0,
            }
        }
    }
}

fn header_line(sort: SortSpec, columns: &Columns, theme: &Theme) -> Line<'static> {
    let style = Style::default()
        .fg(parse_color(&theme.panel.header_fg))
        .add_modifier(Modifier::BOLD);
    let mut text = fit_name(&header_label(SortKey::Name, sort), columns.name);
    text.push(' ');
    text.push_str(&pad_left(&header_label(SortKey::Size, sort), columns.size));
    if columns.date > 0 {
        text.push(' ');
        text.push_str(&fit_name(&header_label(SortKey::Mtime, sort), columns.date));
    }
    Line::from(Span::styled(text, style))
}

/// Column label, with a direction marker on the sorted column.
fn header_label(key: SortKey, sort: SortSpec) -> String {
    if key != sort.key {
        return key.label().to_string();
    }
    let marker = if sort.reverse { " ⬆" } else { " ⬇" };
    format!("{}{marker}", key.label())
}

fn row_text(entry: &DirEntry, columns: &Columns, date_format: &str) -> String {
    let name = duet_core::nfc_string(entry.name());
    let mut text = fit_name(&name, columns.name);
    text.push(' ');
    text.push_str(&pad_left(&size_label(entry), columns.size));
    if columns.date > 0 {
        text.push(' ');
        let date = entry
            .modified()
            .map(|t| date_label(t, date_format))
            .unwrap_or_default();
        text.push_str(&fit_name(&date, columns.date));
    }
    text
}

/// Size column text: a tag for `..`, links and directories, else the size.
fn size_label(entry: &DirEntry) -> String {
    if entry.is_parent_link() {
        "-- UP⇧ --".to_string()
    } else if entry.is_link() {
        "-- LNK --".to_string()
    } else if entry.is_dir() {
        "-- DIR --".to_string()
    } else {
        format_size(entry.size())
    }
}

/// Formats a timestamp in local time. An unusable format string yields an
/// empty label.
fn date_label(time: SystemTime, format: &str) -> String {
    let local: DateTime<Local> = time.into();
    let mut out = String::new();
    match write!(out, "{}", local.format(format)) {
        Ok(()) => out,
        Err(_) => String::new(),
    }
}

fn date_column_width(entries: &[DirEntry], format: &str) -> usize {
    entries
        .iter()
        .filter_map(DirEntry::modified)
        .map(|t| date_label(t, format).width())
        .max()
        .unwrap_or(0)
}

fn row_style(style: EntryStyle, is_cursor: bool, pane_active: bool, theme: &Theme) -> Style {
    let fg = match style.kind {
        EntryKind::Directory => &theme.panel.directory_fg,
        EntryKind::Executable => &theme.panel.executable_fg,
        EntryKind::Hidden => &theme.panel.hidden_fg,
        EntryKind::Symlink => &theme.panel.symlink_fg,
        EntryKind::Regular => &theme.panel.regular_fg,
    };
    let mut out = Style::default().fg(parse_color(fg));
    if style.kind == EntryKind::Directory {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.selected {
        out = out
            .fg(parse_color(&theme.panel.selected_fg))
            .add_modifier(Modifier::BOLD);
    }
    if is_cursor {
        out = if pane_active {
            out.bg(parse_color(&theme.panel.cursor_bg))
        } else {
            out.add_modifier(Modifier::UNDERLINED)
        };
    }
    out
}

/// Pads or truncates `name` to exactly `width` terminal columns, ending
/// truncated names with `...`.
fn fit_name(name: &str, width: usize) -> String {
    let current = name.width();
    if current <= width {
        return format!("{name}{}", " ".repeat(width - current));
    }
    if width <= ELLIPSIS.len() {
        return ".".repeat(width);
    }
    let budget = width - ELLIPSIS.len();
    let mut out = String::new();
    let mut used = 0;
    for c in name.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str(ELLIPSIS);
    out.push_str(&" ".repeat(width - used - ELLIPSIS.len()));
    out
}

fn pad_left(text: &str, width: usize) -> String {
    let current = text.width();
    if current >= width {
        text.to_string()
    } else {
        format!("{}{text}", " ".repeat(width - current))
    }
}

/// Shortens a path from the left so its tail stays readable.
fn fit_path(path: &str, width: usize) -> String {
    if path.width() <= width {
        return path.to_string();
    }
    let budget = width.saturating_sub(ELLIPSIS.len());
    let mut tail: Vec<char> = Vec::new();
    let mut used = 0;
    for c in path.chars().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        tail.push(c);
        used += w;
    }
    let tail: String = tail.into_iter().rev().collect();
    format!("{ELLIPSIS}{tail}")
}

/// Computes the visible window `(start, end)` for a list of `total` items
/// so that `selected` is always in view within `max_visible` lines.
pub fn visible_window(selected: usize, total: usize, max_visible: usize) -> (usize, usize) {
    if total <= max_visible {
        return (0, total);
    }
    let half = max_visible / 2;
    let start = if selected <= half {
        0
    } else if selected + half >= total {
        total.saturating_sub(max_visible)
    } else {
        selected - half
    };
    let end = (start + max_visible).min(total);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;
    use std::fs;
    use tempfile::TempDir;

    fn entry(tmp: &TempDir, name: &str, contents: Option<&[u8]>) -> DirEntry {
        let path = tmp.path().join(name);
        match contents {
            Some(bytes) => fs::write(&path, bytes).unwrap(),
            None => fs::create_dir(&path).unwrap(),
        }
        DirEntry::from_path(&path).unwrap()
    }

    // --- size column ---

    #[test]
    fn size_label_tags_parent_and_directories() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(size_label(&DirEntry::parent_link(tmp.path())), "-- UP⇧ --");
        assert_eq!(size_label(&entry(&tmp, "sub", None)), "-- DIR --");
        assert_eq!(size_label(&entry(&tmp, "f", Some(&[0u8; 100]))), "100 B");
    }

    #[cfg(unix)]
    #[test]
    fn size_label_tags_symlinks() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("target"), "x").unwrap();
        std::os::unix::fs::symlink(tmp.path().join("target"), tmp.path().join("link")).unwrap();
        let link = DirEntry::from_path(&tmp.path().join("link")).unwrap();
        assert_eq!(size_label(&link), "-- LNK --");
    }

    // --- header ---

    #[test]
    fn header_marks_only_sorted_column() {
        let spec = SortSpec::new(SortKey::Size, false);
        assert_eq!(header_label(SortKey::Size, spec), "Size ⬇");
        assert_eq!(header_label(SortKey::Name, spec), "Name");

        let spec = SortSpec::new(SortKey::Mtime, true);
        assert_eq!(header_label(SortKey::Mtime, spec), "Modified ⬆");
    }

    // --- text fitting ---

    #[test]
    fn fit_name_pads_short_names() {
        assert_eq!(fit_name("abc", 6), "abc   ");
    }

    #[test]
    fn fit_name_truncates_with_ellipsis() {
        let fitted = fit_name("a_very_long_file_name.txt", 10);
        assert_eq!(fitted, "a_very_...");
        assert_eq!(fitted.width(), 10);
    }

    #[test]
    fn fit_name_counts_wide_characters() {
        let fitted = fit_name("日本語のファイル", 9);
        assert_eq!(fitted.width(), 9);
        assert!(fitted.starts_with("日本語"));
        assert!(fitted.contains(ELLIPSIS));
    }

    #[test]
    fn fit_name_tiny_width() {
        assert_eq!(fit_name("abcdef", 2), "..");
    }

    #[test]
    fn fit_path_keeps_tail() {
        assert_eq!(fit_path("/home/user/projects", 30), "/home/user/projects");
        assert_eq!(fit_path("/home/user/projects", 11), "...projects");
    }

    #[test]
    fn pad_left_right_aligns() {
        assert_eq!(pad_left("10 B", 8), "    10 B");
        assert_eq!(pad_left("too wide", 3), "too wide");
    }

    // --- columns ---

    #[test]
    fn date_column_dropped_when_narrow() {
        let wide = Columns::fit(60, 12);
        assert_eq!(wide.date, 12);
        assert_eq!(wide.name + wide.size + wide.date + 2, 60);

        let narrow = Columns::fit(24, 12);
        assert_eq!(narrow.date, 0);
        assert_eq!(narrow.name, 13);
    }

    #[test]
    fn date_label_uses_format() {
        let label = date_label(SystemTime::UNIX_EPOCH, "%Y");
        assert!(label == "1970" || label == "1969");
    }

    // --- styles ---

    #[test]
    fn row_style_colours_by_kind_and_selection() {
        let theme = Theme::default();
        let dir = row_style(
            EntryStyle {
                kind: EntryKind::Directory,
                selected: false,
            },
            false,
            true,
            &theme,
        );
        assert_eq!(dir.fg, Some(Color::LightBlue));
        assert!(dir.add_modifier.contains(Modifier::BOLD));

        let selected = row_style(
            EntryStyle {
                kind: EntryKind::Regular,
                selected: true,
            },
            false,
            true,
            &theme,
        );
        assert_eq!(selected.fg, Some(Color::Yellow));
    }

    #[test]
    fn cursor_row_gets_background_only_in_active_pane() {
        let theme = Theme::default();
        let style = EntryStyle {
            kind: EntryKind::Regular,
            selected: false,
        };
        assert_eq!(
            row_style(style, true, true, &theme).bg,
            Some(Color::Rgb(0x3a, 0x3a, 0x5a))
        );
        let inactive = row_style(style, true, false, &theme);
        assert_eq!(inactive.bg, None);
        assert!(inactive.add_modifier.contains(Modifier::UNDERLINED));
    }

    // --- visible_window ---

    #[test]
    fn visible_window_fits_everything() {
        assert_eq!(visible_window(3, 5, 10), (0, 5));
    }

    #[test]
    fn visible_window_centres_cursor() {
        assert_eq!(visible_window(50, 100, 10), (45, 55));
    }

    #[test]
    fn visible_window_clamps_at_end() {
        assert_eq!(visible_window(99, 100, 10), (90, 100));
    }
}
