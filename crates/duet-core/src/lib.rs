//! duet core library, the UI-agnostic half of a dual-pane file manager.
//!
//! `duet-core` owns everything except drawing: reading and sorting
//! directories, pane navigation and selection, bounded directory previews
//! and batch file operations. The TUI (`duet-tui`) only translates keys
//! into [`Command`]s and renders what the [`Commander`] holds.
//!
//! # Modules
//!
//! - [`fs`]: Directory reading, single-entry operations, trash and previews.
//! - [`nav`]: Pane state machines, sorting, glob filter and selection.
//! - [`batch`]: Multi-entry operations with per-entry outcomes.
//! - [`commander`]: The two pane slots and command dispatch.
//! - [`config`]: TOML settings and colour theme.
//! - [`event`]: Command and event types for UI ↔ Core communication.
//! - [`error`]: Unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod batch;
pub mod commander;
pub mod config;
pub mod error;
pub mod event;
pub mod fs;
pub mod nav;

pub use batch::{BatchOrchestrator, BatchReport, OpError, OpKind, OpOutcome};
pub use commander::{Commander, CommanderOptions, PaneContent, PaneSide};
pub use config::settings::Config;
pub use config::theme::{parse_color, Theme};
pub use error::{CoreError, CoreResult};
pub use event::{Command, Event};
pub use fs::entry::DirEntry;
pub use fs::listing::{format_size, list_dir, DirList, DirTotals};
pub use fs::preview::{ContentSniffer, NullByteSniffer, Preview, TextPreview, TreeSummary};
pub use fs::trash::{SystemTrash, TrashBin};
pub use nav::glob::GlobPattern;
pub use nav::pane::{EntryKind, EntryStyle, Pane, PaneKind, PaneState};
pub use nav::preview_pane::{PreviewBody, PreviewPane, PreviewSettings};
pub use nav::selection::Selection;
pub use nav::sort::{sort_entries, SortKey, SortSpec};

/// Normalises a string to NFC (composed) form.
///
/// macOS stores filenames in NFD (decomposed), which splits accented and
/// Hangul characters into separate code points. This re-composes them.
pub fn nfc_string(s: &str) -> String {
    use unicode_normalization::UnicodeNormalization;
    s.nfc().collect()
}
