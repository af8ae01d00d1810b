//! Preview pane body: shows the other pane's cursor path.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::CoreResult;
use crate::fs::preview::{preview_path, ContentSniffer, Preview};
use crate::nav::pane::{Pane, PaneKind};

/// Budgets and filters for preview generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSettings {
    pub include_hidden: bool,
    /// Line budget of the directory summary, usually the pane height.
    pub max_lines: usize,
    /// Lines read from the head of a text file.
    pub text_max_lines: usize,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            include_hidden: false,
            max_lines: 40,
            text_max_lines: 200,
        }
    }
}

/// What the pane currently displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewBody {
    /// Nothing has been requested yet.
    Empty,
    Ready(Preview),
    /// The target could not be read; the message says why.
    Unavailable(String),
}

/// A read-only pane that follows the active pane's cursor.
#[derive(Clone)]
pub struct PreviewPane {
    target: Option<PathBuf>,
    settings: PreviewSettings,
    sniffer: Arc<dyn ContentSniffer + Send + Sync>,
    body: PreviewBody,
}

impl fmt::Debug for PreviewPane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewPane")
            .field("target", &self.target)
            .field("settings", &self.settings)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl PreviewPane {
    pub fn new(settings: PreviewSettings, sniffer: Arc<dyn ContentSniffer + Send + Sync>) -> Self {
        Self {
            target: None,
            settings,
            sniffer,
            body: PreviewBody::Empty,
        }
    }

    pub fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }

    pub fn body(&self) -> &PreviewBody {
        &self.body
    }

    pub fn settings(&self) -> PreviewSettings {
        self.settings
    }

    /// Regenerates the preview for `target`.
    ///
    /// Never fails: an unreadable target becomes
    /// [`PreviewBody::Unavailable`].
    pub fn show(&self, target: Option<&Path>) -> Self {
        let body = match target {
            None => PreviewBody::Empty,
            Some(path) => match preview_path(
                path,
                self.settings.include_hidden,
                self.settings.max_lines,
                self.settings.text_max_lines,
                self.sniffer.as_ref(),
            ) {
                Ok(preview) => PreviewBody::Ready(preview),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "preview failed");
                    PreviewBody::Unavailable(e.to_string())
                }
            },
        };
        Self {
            target: target.map(Path::to_path_buf),
            body,
            ..self.clone()
        }
    }

    /// Changes the budgets and regenerates the current preview.
    pub fn with_settings(&self, settings: PreviewSettings) -> Self {
        if settings == self.settings {
            return self.clone();
        }
        let next = Self {
            settings,
            ..self.clone()
        };
        next.show(self.target.as_deref())
    }
}

impl Pane for PreviewPane {
    fn kind(&self) -> PaneKind {
        PaneKind::Preview
    }

    fn title(&self) -> String {
        match &self.target {
            Some(path) => path.display().to_string(),
            None => PaneKind::Preview.label().to_string(),
        }
    }

    fn subtitle(&self) -> String {
        match &self.body {
            PreviewBody::Ready(Preview::Tree(tree)) if tree.truncated => {
                format!("{} entries (more not shown)", tree.lines.len())
            }
            PreviewBody::Ready(Preview::Tree(tree)) => format!("{} entries", tree.lines.len()),
            PreviewBody::Ready(Preview::Text(text)) if text.is_truncated => {
                format!("first {} lines", text.lines.len())
            }
            PreviewBody::Ready(Preview::Text(text)) => format!("{} lines", text.lines.len()),
            _ => String::new(),
        }
    }

    fn refresh(&self) -> CoreResult<Self> {
        Ok(self.show(self.target.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::preview::NullByteSniffer;
    use std::fs;
    use tempfile::TempDir;

    fn pane() -> PreviewPane {
        PreviewPane::new(PreviewSettings::default(), Arc::new(NullByteSniffer))
    }

    #[test]
    fn new_pane_is_empty() {
        let pane = pane();
        assert_eq!(pane.body(), &PreviewBody::Empty);
        assert_eq!(pane.title(), "Preview");
        assert_eq!(pane.kind(), PaneKind::Preview);
    }

    #[test]
    fn show_directory_builds_tree() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a"), "").unwrap();
        fs::write(tmp.path().join("b"), "").unwrap();

        let pane = pane().show(Some(tmp.path()));

        match pane.body() {
            PreviewBody::Ready(Preview::Tree(tree)) => assert_eq!(tree.lines, vec!["a", "b"]),
            other => panic!("unexpected body {other:?}"),
        }
        assert_eq!(pane.subtitle(), "2 entries");
        assert_eq!(pane.target(), Some(tmp.path()));
    }

    #[test]
    fn show_missing_path_is_unavailable() {
        let tmp = TempDir::new().unwrap();
        let pane = pane().show(Some(&tmp.path().join("gone")));
        assert!(matches!(pane.body(), PreviewBody::Unavailable(_)));
    }

    #[test]
    fn with_settings_regenerates() {
        let tmp = TempDir::new().unwrap();
        for name in ["a", "b", "c"] {
            fs::write(tmp.path().join(name), "").unwrap();
        }
        let pane = pane().show(Some(tmp.path()));

        let pane = pane.with_settings(PreviewSettings {
            max_lines: 2,
            ..PreviewSettings::default()
        });

        assert_eq!(pane.subtitle(), "2 entries (more not shown)");
    }

    #[test]
    fn refresh_picks_up_changes() {
        let tmp = TempDir::new().unwrap();
        let pane = pane().show(Some(tmp.path()));
        fs::write(tmp.path().join("new"), "").unwrap();

        let pane = pane.refresh().unwrap();

        assert_eq!(pane.subtitle(), "1 entries");
    }
}
