//! Preview pane rendering.
//!
//! Directories show the breadth-first summary as a flat `┣ path` list,
//! text files are syntax-highlighted via `syntect`, anything else shows a
//! one-line notice.

use std::path::{Path, MAIN_SEPARATOR};
use std::sync::OnceLock;

use duet_core::config::theme::{parse_color, Theme};
use duet_core::fs::preview::NOT_PREVIEWABLE;
use duet_core::{Pane, Preview, PreviewBody, PreviewPane, TextPreview, TreeSummary};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use syntect::highlighting::{FontStyle, ThemeSet};
use syntect::parsing::SyntaxSet;

const FALLBACK_SYNTAX_THEME: &str = "base16-eighties.dark";

/// Lazily initialised syntax set.
fn syntax_set() -> &'static SyntaxSet {
    static SS: OnceLock<SyntaxSet> = OnceLock::new();
    SS.get_or_init(SyntaxSet::load_defaults_newlines)
}

/// Lazily initialised theme set.
fn theme_set() -> &'static ThemeSet {
    static TS: OnceLock<ThemeSet> = OnceLock::new();
    TS.get_or_init(ThemeSet::load_defaults)
}

/// Rendered lines plus the syntax theme's background, if any.
struct PreviewContent {
    lines: Vec<Line<'static>>,
    theme_bg: Option<Color>,
}

/// Renders a preview pane.
pub fn render_preview(f: &mut Frame, area: Rect, pane: &PreviewPane, theme: &Theme) {
    let border_fg = parse_color(&theme.preview.border_fg);
    let preview = match pane.body() {
        PreviewBody::Empty => PreviewContent {
            lines: Vec::new(),
            theme_bg: None,
        },
        PreviewBody::Unavailable(message) => notice(message, theme),
        PreviewBody::Ready(Preview::Tree(tree)) => PreviewContent {
            lines: tree_lines(tree, theme),
            theme_bg: None,
        },
        PreviewBody::Ready(Preview::Text(text)) => text_content(text, &theme.preview.syntax_theme),
        PreviewBody::Ready(Preview::NotPreviewable) => notice(NOT_PREVIEWABLE, theme),
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", pane.title()))
        .border_style(Style::default().fg(border_fg));
    let subtitle = pane.subtitle();
    if !subtitle.is_empty() {
        block = block.title_bottom(format!(" {subtitle} "));
    }

    // Every inner cell is written so that nothing of a previous, longer
    // preview survives.
    let inner = block.inner(area);
    let inner_width = inner.width as usize;
    let inner_height = inner.height as usize;
    let pad_style = preview
        .theme_bg
        .map(|bg| Style::default().bg(bg))
        .unwrap_or_default();

    let mut content = preview.lines;
    content.truncate(inner_height);
    for line in &mut content {
        let current = line.width();
        if current < inner_width {
            line.spans
                .push(Span::styled(" ".repeat(inner_width - current), pad_style));
        }
    }
    while content.len() < inner_height {
        content.push(Line::from(Span::styled(" ".repeat(inner_width), pad_style)));
    }

    f.render_widget(Paragraph::new(content).block(block).style(pad_style), area);
}

fn notice(message: &str, theme: &Theme) -> PreviewContent {
    PreviewContent {
        lines: vec![Line::from(Span::styled(
            message.to_string(),
            Style::default()
                .fg(parse_color(&theme.preview.notice_fg))
                .add_modifier(Modifier::ITALIC),
        ))],
        theme_bg: None,
    }
}

/// Root path first, then one `┣ ` line per summarised entry.
fn tree_lines(tree: &TreeSummary, theme: &Theme) -> Vec<Line<'static>> {
    let dir_style = Style::default().fg(parse_color(&theme.preview.dir_fg));
    let file_style = Style::default().fg(parse_color(&theme.preview.tree_fg));

    let mut lines = vec![Line::from(Span::styled(
        duet_core::nfc_string(&tree.root.display().to_string()),
        dir_style.add_modifier(Modifier::BOLD),
    ))];
    lines.extend(tree.lines.iter().map(|rel| {
        let style = if rel.ends_with(MAIN_SEPARATOR) {
            dir_style
        } else {
            file_style
        };
        Line::from(vec![
            Span::styled("┣ ", file_style),
            Span::styled(duet_core::nfc_string(rel), style),
        ])
    }));
    if !tree.skipped.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("({} unreadable directories left out)", tree.skipped.len()),
            Style::default()
                .fg(parse_color(&theme.preview.notice_fg))
                .add_modifier(Modifier::ITALIC),
        )));
    }
    lines
}

fn text_content(text: &TextPreview, syntax_theme: &str) -> PreviewContent {
    let (highlighted, theme_bg) = highlight_lines(&text.path, &text.lines, syntax_theme);
    PreviewContent {
        lines: highlighted.into_iter().map(Line::from).collect(),
        theme_bg,
    }
}

/// Applies syntect highlighting to lines, converting to ratatui Spans.
/// Returns the highlighted spans and the syntect theme's background color.
fn highlight_lines(
    path: &Path,
    lines: &[String],
    syntax_theme_name: &str,
) -> (Vec<Vec<Span<'static>>>, Option<Color>) {
    let ss = syntax_set();
    let ts = theme_set();

    let Some(th) = ts
        .themes
        .get(syntax_theme_name)
        .or_else(|| ts.themes.get(FALLBACK_SYNTAX_THEME))
        .or_else(|| ts.themes.values().next())
    else {
        let plain = lines.iter().map(|l| vec![Span::raw(l.clone())]).collect();
        return (plain, None);
    };

    let theme_bg = th.settings.background.map(|c| Color::Rgb(c.r, c.g, c.b));

    let syntax = path
        .extension()
        .and_then(|ext| ss.find_syntax_by_extension(&ext.to_string_lossy()))
        .or_else(|| {
            path.file_name()
                .and_then(|name| ss.find_syntax_by_extension(&name.to_string_lossy()))
        })
        .unwrap_or_else(|| ss.find_syntax_plain_text());

    let mut highlighter = syntect::easy::HighlightLines::new(syntax, th);

    let highlighted = lines
        .iter()
        .map(|line| {
            let text = expand_tabs(line);
            match highlighter.highlight_line(&text, ss) {
                Ok(regions) => regions
                    .into_iter()
                    .map(|(style, piece)| {
                        let fg =
                            Color::Rgb(style.foreground.r, style.foreground.g, style.foreground.b);
                        let bg =
                            Color::Rgb(style.background.r, style.background.g, style.background.b);
                        let mut modifier = Modifier::empty();
                        if style.font_style.contains(FontStyle::BOLD) {
                            modifier |= Modifier::BOLD;
                        }
                        if style.font_style.contains(FontStyle::ITALIC) {
                            modifier |= Modifier::ITALIC;
                        }
                        if style.font_style.contains(FontStyle::UNDERLINE) {
                            modifier |= Modifier::UNDERLINED;
                        }
                        Span::styled(
                            piece.to_string(),
                            Style::default().fg(fg).bg(bg).add_modifier(modifier),
                        )
                    })
                    .collect(),
                Err(_) => vec![Span::raw(text.clone())],
            }
        })
        .collect();

    (highlighted, theme_bg)
}

fn expand_tabs(line: &str) -> String {
    line.replace('\t', "    ")
}
