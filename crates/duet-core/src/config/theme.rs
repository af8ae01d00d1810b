//! Colour theme.
//!
//! Colours are stored as strings (`"blue"`, `"#ff5500"`) and turned into
//! [`ratatui::style::Color`] when drawing, via [`parse_color`].

use std::path::Path;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Complete theme with one colour group per screen component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default)]
    pub panel: PanelTheme,
    #[serde(default)]
    pub statusbar: StatusBarTheme,
    #[serde(default)]
    pub preview: PreviewTheme,
    #[serde(default)]
    pub popup: PopupTheme,
}

impl Theme {
    /// Loads a theme from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Access errors for the file, or [`CoreError::ConfigParse`].
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::from_io(path, e))?;
        toml::from_str(&content).map_err(|e| CoreError::ConfigParse(e.to_string()))
    }

    /// Built-in colours for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            panel: PanelTheme {
                directory_fg: "blue".to_string(),
                executable_fg: "green".to_string(),
                hidden_fg: "gray".to_string(),
                symlink_fg: "magenta".to_string(),
                regular_fg: "black".to_string(),
                selected_fg: "red".to_string(),
                cursor_bg: "#d0d8f0".to_string(),
                active_border_fg: "blue".to_string(),
                inactive_border_fg: "gray".to_string(),
                header_fg: "dark_gray".to_string(),
            },
            statusbar: StatusBarTheme {
                bg: "gray".to_string(),
                fg: "black".to_string(),
                message_fg: "green".to_string(),
                error_fg: "red".to_string(),
            },
            preview: PreviewTheme {
                border_fg: "gray".to_string(),
                tree_fg: "dark_gray".to_string(),
                dir_fg: "blue".to_string(),
                notice_fg: "red".to_string(),
                syntax_theme: "InspiredGitHub".to_string(),
            },
            popup: PopupTheme {
                border_fg: "blue".to_string(),
                title_fg: "black".to_string(),
                input_fg: "black".to_string(),
                error_fg: "red".to_string(),
            },
        }
    }
}

/// File list colours. Each row kind maps to one foreground colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelTheme {
    pub directory_fg: String,
    pub executable_fg: String,
    pub hidden_fg: String,
    pub symlink_fg: String,
    pub regular_fg: String,
    pub selected_fg: String,
    pub cursor_bg: String,
    pub active_border_fg: String,
    pub inactive_border_fg: String,
    pub header_fg: String,
}

impl Default for PanelTheme {
    fn default() -> Self {
        Self {
            directory_fg: "light_blue".to_string(),
            executable_fg: "light_green".to_string(),
            hidden_fg: "dark_gray".to_string(),
            symlink_fg: "cyan".to_string(),
            regular_fg: "white".to_string(),
            selected_fg: "yellow".to_string(),
            cursor_bg: "#3a3a5a".to_string(),
            active_border_fg: "light_yellow".to_string(),
            inactive_border_fg: "dark_gray".to_string(),
            header_fg: "light_cyan".to_string(),
        }
    }
}

/// Status bar colours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusBarTheme {
    pub bg: String,
    pub fg: String,
    pub message_fg: String,
    pub error_fg: String,
}

impl Default for StatusBarTheme {
    fn default() -> Self {
        Self {
            bg: "dark_gray".to_string(),
            fg: "white".to_string(),
            message_fg: "light_green".to_string(),
            error_fg: "light_red".to_string(),
        }
    }
}

/// Preview pane colours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewTheme {
    pub border_fg: String,
    pub tree_fg: String,
    pub dir_fg: String,
    pub notice_fg: String,
    pub syntax_theme: String,
}

impl Default for PreviewTheme {
    fn default() -> Self {
        Self {
            border_fg: "dark_gray".to_string(),
            tree_fg: "gray".to_string(),
            dir_fg: "light_blue".to_string(),
            notice_fg: "yellow".to_string(),
            syntax_theme: "base16-eighties.dark".to_string(),
        }
    }
}

/// Dialog colours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupTheme {
    pub border_fg: String,
    pub title_fg: String,
    pub input_fg: String,
    pub error_fg: String,
}

impl Default for PopupTheme {
    fn default() -> Self {
        Self {
            border_fg: "yellow".to_string(),
            title_fg: "light_yellow".to_string(),
            input_fg: "white".to_string(),
            error_fg: "light_red".to_string(),
        }
    }
}

/// Parses a colour string.
///
/// Accepts the sixteen ANSI names (with `_`, without, or `grey` spelling),
/// `reset`, and `#rrggbb`. Anything else is [`Color::Reset`].
pub fn parse_color(s: &str) -> Color {
    let name = s.trim().to_lowercase().replace('_', "");
    match name.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        "white" => Color::White,
        hex => parse_hex(hex).unwrap_or(Color::Reset),
    }
}

fn parse_hex(s: &str) -> Option<Color> {
    let digits = s.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}
