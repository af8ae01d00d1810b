//! Multi-selection of entries within one directory.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::fs::entry::PARENT_NAME;

/// A set of selected entry names.
///
/// Names are relative to the directory of the owning pane, so the set is
/// independent of the listing order and survives re-sorting. The `..` row
/// can never be a member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    names: BTreeSet<String>,
}

impl Selection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `name`. Adding `..` is a no-op.
    pub fn add(&mut self, name: &str) {
        if name == PARENT_NAME {
            return;
        }
        self.names.insert(name.to_string());
    }

    /// Removes `name` if present.
    pub fn remove(&mut self, name: &str) {
        self.names.remove(name);
    }

    /// Adds `name` when absent, removes it when present.
    pub fn toggle(&mut self, name: &str) {
        if self.names.contains(name) {
            self.remove(name);
        } else {
            self.add(name);
        }
    }

    /// Empties the selection.
    pub fn clear(&mut self) {
        self.names.clear();
    }

    /// Keeps only the names for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.names.retain(|name| keep(name));
    }

    /// Returns `true` if `name` is selected.
    pub fn is_selected(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// All selected names in lexicographic order.
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolves the selection into the paths an operation should act on.
    ///
    /// A non-empty selection yields every selected name joined onto `dir`.
    /// An empty selection falls back to the cursor entry, except when the
    /// cursor rests on `..` (or there is no cursor), which yields nothing.
    pub fn resolve(&self, dir: &Path, cursor_name: Option<&str>) -> Vec<PathBuf> {
        if !self.names.is_empty() {
            return self.names.iter().map(|name| dir.join(name)).collect();
        }
        match cursor_name {
            Some(name) if name != PARENT_NAME => vec![dir.join(name)],
            _ => Vec::new(),
        }
    }
}
