//! Application configuration loaded from a TOML file.
//!
//! Every field is defaulted, so an empty or missing file yields
//! [`Config::default`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::commander::CommanderOptions;
use crate::error::{CoreError, CoreResult};
use crate::nav::pane::PaneKind;
use crate::nav::preview_pane::PreviewSettings;
use crate::nav::sort::{SortKey, SortSpec};

/// Top-level application configuration.
///
/// Call [`Config::load`] to read from a TOML path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub programs: ProgramsConfig,
}

impl Config {
    /// Loads configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the file does not exist.
    /// - [`CoreError::PermissionDenied`] if the file is not readable.
    /// - [`CoreError::ConfigParse`] if the TOML is malformed.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::from_io(path, e))?;
        toml::from_str(&content).map_err(|e| CoreError::ConfigParse(e.to_string()))
    }

    /// The sort every pane starts with.
    pub fn sort_spec(&self) -> SortSpec {
        SortSpec::new(self.general.default_sort, self.general.sort_reverse)
    }

    /// Start-up options for the pane coordinator.
    ///
    /// `fallback_lines` is the preview line budget used when the file does
    /// not fix one, normally the terminal height.
    pub fn commander_options(&self, fallback_lines: usize) -> CommanderOptions {
        let defaults = PreviewSettings::default();
        CommanderOptions {
            show_hidden: self.general.show_hidden,
            delete_to_trash: self.general.delete_to_trash,
            sort: self.sort_spec(),
            preview: PreviewSettings {
                include_hidden: self.general.show_hidden,
                max_lines: self.preview.max_lines.unwrap_or(fallback_lines),
                text_max_lines: self.preview.text_max_lines.unwrap_or(defaults.text_max_lines),
            },
        }
    }
}

/// General file-browsing preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default)]
    pub show_hidden: bool,
    #[serde(default = "default_sort")]
    pub default_sort: SortKey,
    #[serde(default)]
    pub sort_reverse: bool,
    /// Send deleted entries to the trash instead of removing them.
    #[serde(default = "default_true")]
    pub delete_to_trash: bool,
    #[serde(default = "default_true")]
    pub confirm_delete: bool,
    #[serde(default = "default_true")]
    pub confirm_quit: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            show_hidden: false,
            default_sort: default_sort(),
            sort_reverse: false,
            delete_to_trash: true,
            confirm_delete: true,
            confirm_quit: true,
        }
    }
}

/// Preview pane configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Fixed line budget for directory previews. When absent the pane
    /// height is used.
    #[serde(default)]
    pub max_lines: Option<usize>,
    #[serde(default)]
    pub text_max_lines: Option<usize>,
}

/// Layout and display preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub left_pane: PaneKind,
    #[serde(default)]
    pub right_pane: PaneKind,
    /// chrono format string of the listing's time column.
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            left_pane: PaneKind::Files,
            right_pane: PaneKind::Files,
            date_format: default_date_format(),
        }
    }
}

/// Command lines that override external program discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramsConfig {
    #[serde(default)]
    pub editor: Option<String>,
    #[serde(default)]
    pub viewer: Option<String>,
    #[serde(default)]
    pub shell: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_sort() -> SortKey {
    SortKey::Name
}

fn default_date_format() -> String {
    "%b %d %H:%M".to_string()
}
