//! Ordering of directory listings.
//!
//! Every listing is ordered in bands before the chosen key is consulted:
//! the `..` row always comes first, then (for [`SortKey::Size`] only)
//! directories and symlinks, then everything else. Inside a band the key
//! and direction apply. The band order itself never flips with the
//! direction, so the parent row stays pinned to the top of the list.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::fs::entry::DirEntry;

/// The attribute a listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Entry name, case-sensitive, by code point.
    Name,
    /// File size, ties broken by name.
    Size,
    /// Last-modified time, ties keep name order.
    Mtime,
}

impl SortKey {
    /// Short label used in listing headers.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Size => "Size",
            Self::Mtime => "Modified",
        }
    }
}

/// A pane's ordering preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub reverse: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::new(SortKey::Name, false)
    }
}

impl SortSpec {
    pub const fn new(key: SortKey, reverse: bool) -> Self {
        Self { key, reverse }
    }

    /// Resolves a "sort by `key`" request against the current spec.
    ///
    /// Requesting exactly the current `(key, reverse)` pair flips the
    /// direction, so pressing the same sort key twice alternates between
    /// ascending and descending.
    pub fn request(self, key: SortKey, reverse: bool) -> Self {
        let requested = Self::new(key, reverse);
        if requested == self {
            Self::new(key, !reverse)
        } else {
            requested
        }
    }

    /// The same key with the opposite direction.
    pub fn reversed(self) -> Self {
        Self::new(self.key, !self.reverse)
    }
}

/// Sorts entries according to `spec`.
///
/// Returns a **new** vector; the input slice is never mutated. The sort
/// is stable and deterministic: entries are first put in name order, so
/// any tie left by the key (equal timestamps) resolves by name.
pub fn sort_entries(entries: &[DirEntry], spec: SortSpec) -> Vec<DirEntry> {
    let mut sorted: Vec<DirEntry> = entries.to_vec();
    sorted.sort_by(|a, b| a.name().cmp(b.name()));

    sorted.sort_by(|a, b| {
        let band = band(a, spec.key).cmp(&band(b, spec.key));
        if band != Ordering::Equal {
            return band;
        }
        let ord = compare_in_band(a, b, spec.key);
        if spec.reverse {
            ord.reverse()
        } else {
            ord
        }
    });

    sorted
}

/// Band rank: lower bands always precede higher ones.
fn band(entry: &DirEntry, key: SortKey) -> u8 {
    if entry.is_parent_link() {
        0
    } else if key == SortKey::Size && (entry.is_dir() || entry.is_link()) {
        1
    } else {
        2
    }
}

fn compare_in_band(a: &DirEntry, b: &DirEntry, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name().cmp(b.name()),
        SortKey::Size => {
            if band(a, key) == 1 {
                // Sizes of directories and links mean nothing here.
                a.name().cmp(b.name())
            } else {
                (a.size(), a.name()).cmp(&(b.size(), b.name()))
            }
        }
        SortKey::Mtime => a.modified().cmp(&b.modified()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    fn at(secs: u64) -> Option<SystemTime> {
        Some(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
    }

    fn file(name: &str, size: u64, secs: u64) -> DirEntry {
        DirEntry::from_parts(PathBuf::from("/d").join(name), size, at(secs), false, false, false)
    }

    fn dir(name: &str, secs: u64) -> DirEntry {
        DirEntry::from_parts(PathBuf::from("/d").join(name), 0, at(secs), true, false, false)
    }

    fn link(name: &str, size: u64) -> DirEntry {
        DirEntry::from_parts(PathBuf::from("/d").join(name), size, at(5), false, true, false)
    }

    fn parent() -> DirEntry {
        DirEntry::from_parts(PathBuf::from("/d/.."), 0, at(1_000_000), true, false, false)
    }

    fn sample() -> Vec<DirEntry> {
        vec![
            file("banana.txt", 500, 30),
            dir("docs", 10),
            file("apple.rs", 20, 20),
            parent(),
            file("Zeta.md", 1000, 40),
            link("shortcut", 999_999),
            dir("src", 50),
        ]
    }

    fn names(entries: &[DirEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name()).collect()
    }

    #[test]
    fn name_ascending_is_case_sensitive_code_point_order() {
        let sorted = sort_entries(&sample(), SortSpec::new(SortKey::Name, false));
        assert_eq!(
            names(&sorted),
            vec!["..", "Zeta.md", "apple.rs", "banana.txt", "docs", "shortcut", "src"]
        );
    }

    #[test]
    fn name_descending_keeps_parent_on_top() {
        let sorted = sort_entries(&sample(), SortSpec::new(SortKey::Name, true));
        assert_eq!(
            names(&sorted),
            vec!["..", "src", "shortcut", "docs", "banana.txt", "apple.rs", "Zeta.md"]
        );
    }

    #[test]
    fn size_ascending_puts_dirs_and_links_after_parent() {
        let sorted = sort_entries(&sample(), SortSpec::new(SortKey::Size, false));
        assert_eq!(
            names(&sorted),
            vec!["..", "docs", "shortcut", "src", "apple.rs", "banana.txt", "Zeta.md"]
        );
    }

    #[test]
    fn size_descending_keeps_bands_and_reverses_inside_them() {
        let sorted = sort_entries(&sample(), SortSpec::new(SortKey::Size, true));
        assert_eq!(
            names(&sorted),
            vec!["..", "src", "shortcut", "docs", "Zeta.md", "banana.txt", "apple.rs"]
        );
    }

    #[test]
    fn size_ties_break_by_name() {
        let entries = vec![file("b", 10, 1), file("a", 10, 2), file("c", 5, 3)];
        let sorted = sort_entries(&entries, SortSpec::new(SortKey::Size, false));
        assert_eq!(names(&sorted), vec!["c", "a", "b"]);
    }

    #[test]
    fn mtime_orders_by_timestamp_and_interleaves_dirs() {
        let sorted = sort_entries(&sample(), SortSpec::new(SortKey::Mtime, false));
        assert_eq!(
            names(&sorted),
            vec!["..", "shortcut", "docs", "apple.rs", "banana.txt", "Zeta.md", "src"]
        );
    }

    #[test]
    fn mtime_ties_resolve_by_name() {
        let entries = vec![file("c", 1, 7), file("a", 1, 7), file("b", 1, 7)];
        let sorted = sort_entries(&entries, SortSpec::new(SortKey::Mtime, false));
        assert_eq!(names(&sorted), vec!["a", "b", "c"]);
    }

    #[test]
    fn parent_is_first_for_every_key_and_direction() {
        for key in [SortKey::Name, SortKey::Size, SortKey::Mtime] {
            for reverse in [false, true] {
                let sorted = sort_entries(&sample(), SortSpec::new(key, reverse));
                assert!(sorted[0].is_parent_link(), "{key:?} reverse={reverse}");
                assert_eq!(sorted.iter().filter(|e| e.is_parent_link()).count(), 1);
            }
        }
    }

    #[test]
    fn sorting_is_idempotent() {
        for key in [SortKey::Name, SortKey::Size, SortKey::Mtime] {
            for reverse in [false, true] {
                let spec = SortSpec::new(key, reverse);
                let once = sort_entries(&sample(), spec);
                let twice = sort_entries(&once, spec);
                assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn reversing_twice_restores_order() {
        for key in [SortKey::Name, SortKey::Size, SortKey::Mtime] {
            let spec = SortSpec::new(key, false);
            let original = sort_entries(&sample(), spec);
            let reversed = sort_entries(&original, spec.reversed());
            let restored = sort_entries(&reversed, spec.reversed().reversed());
            assert_eq!(original, restored);
        }
    }

    #[test]
    fn sort_does_not_mutate_input() {
        let entries = sample();
        let before = names(&entries).join(",");
        let _ = sort_entries(&entries, SortSpec::new(SortKey::Size, true));
        assert_eq!(names(&entries).join(","), before);
    }

    #[test]
    fn sort_empty_entries() {
        assert!(sort_entries(&[], SortSpec::default()).is_empty());
    }

    #[test]
    fn request_same_spec_flips_direction() {
        let spec = SortSpec::new(SortKey::Size, false);
        assert_eq!(spec.request(SortKey::Size, false), SortSpec::new(SortKey::Size, true));
        let flipped = spec.request(SortKey::Size, false);
        assert_eq!(flipped.request(SortKey::Size, true), SortSpec::new(SortKey::Size, false));
    }

    #[test]
    fn request_different_spec_is_taken_as_is() {
        let spec = SortSpec::new(SortKey::Name, false);
        assert_eq!(spec.request(SortKey::Mtime, true), SortSpec::new(SortKey::Mtime, true));
        assert_eq!(spec.request(SortKey::Name, true), SortSpec::new(SortKey::Name, true));
    }

    #[test]
    fn sort_key_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            key: SortKey,
        }
        let parsed: Wrapper = toml::from_str("key = \"mtime\"").unwrap();
        assert_eq!(parsed.key, SortKey::Mtime);
    }
}
