//! Previews of the path under the other pane's cursor.
//!
//! Directories are summarised breadth-first within a line budget
//! ([`summarize_tree`]); text files show their first lines
//! ([`read_text_preview`]); anything else is [`Preview::NotPreviewable`].

use std::collections::VecDeque;
use std::fs;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use crate::error::{CoreError, CoreResult};

/// The number of bytes inspected by [`NullByteSniffer`].
const BINARY_CHECK_SIZE: usize = 8192;

/// Message shown for paths that have no preview.
pub const NOT_PREVIEWABLE: &str = "Cannot preview, not a text file";

/// Decides whether a file holds text.
///
/// `None` means "cannot tell"; callers treat it like `Some(false)`.
pub trait ContentSniffer {
    fn is_text(&self, path: &Path) -> Option<bool>;
}

/// Treats a file as binary when its first 8 KiB contain a null byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullByteSniffer;

impl ContentSniffer for NullByteSniffer {
    fn is_text(&self, path: &Path) -> Option<bool> {
        is_binary(path).ok().map(|binary| !binary)
    }
}

/// Returns `true` if the file contains a null byte in its first 8 KiB.
///
/// # Errors
///
/// Returns the classified I/O error if the file cannot be opened or read.
pub fn is_binary(path: &Path) -> CoreResult<bool> {
    let mut file = fs::File::open(path).map_err(|e| CoreError::from_io(path, e))?;
    let mut buf = vec![0u8; BINARY_CHECK_SIZE];
    let bytes_read = file.read(&mut buf)?;
    Ok(buf[..bytes_read].contains(&0))
}

/// What a preview pane shows for one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    Tree(TreeSummary),
    Text(TextPreview),
    NotPreviewable,
}

/// A bounded, breadth-first summary of a directory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSummary {
    /// The summarised directory.
    pub root: PathBuf,
    /// Paths relative to `root`, each parent directly followed by its
    /// discovered children. Directories end with a path separator.
    pub lines: Vec<String>,
    /// Subdirectories that could not be read and were left out.
    pub skipped: Vec<PathBuf>,
    /// `true` when the line budget ran out before the walk finished.
    pub truncated: bool,
}

/// The first lines of a text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPreview {
    pub path: PathBuf,
    pub lines: Vec<String>,
    /// `true` when the file continues past the last line read.
    pub is_truncated: bool,
}

/// Builds the preview for `path`.
///
/// `max_lines` bounds the directory summary, `text_max_lines` the text
/// head. Files the sniffer does not vouch for, and files that turn out not
/// to be valid UTF-8, are [`Preview::NotPreviewable`].
///
/// # Errors
///
/// Returns an error only when `path` itself cannot be read.
pub fn preview_path(
    path: &Path,
    include_hidden: bool,
    max_lines: usize,
    text_max_lines: usize,
    sniffer: &dyn ContentSniffer,
) -> CoreResult<Preview> {
    let meta = fs::metadata(path).map_err(|e| CoreError::from_io(path, e))?;

    if meta.is_dir() {
        return summarize_tree(path, include_hidden, max_lines).map(Preview::Tree);
    }
    if !meta.is_file() || sniffer.is_text(path) != Some(true) {
        return Ok(Preview::NotPreviewable);
    }

    match read_text_preview(path, text_max_lines) {
        Ok(text) => Ok(Preview::Text(text)),
        Err(CoreError::Io(e)) if e.kind() == ErrorKind::InvalidData => Ok(Preview::NotPreviewable),
        Err(e) => Err(e),
    }
}

/// Reads at most `max_lines` lines from the start of `path`.
///
/// Reading stops as soon as the budget is met, so large files cost no more
/// than their head. Tabs are expanded and control characters removed.
///
/// # Errors
///
/// - The classified I/O error if the file cannot be opened.
/// - [`CoreError::Io`] with [`ErrorKind::InvalidData`] for non-UTF-8 content.
pub fn read_text_preview(path: &Path, max_lines: usize) -> CoreResult<TextPreview> {
    let file = fs::File::open(path).map_err(|e| CoreError::from_io(path, e))?;
    let mut reader = BufReader::new(file).lines();

    let mut lines = Vec::with_capacity(max_lines.min(256));
    while lines.len() < max_lines {
        match reader.next() {
            Some(line) => lines.push(sanitize_line(&line?)),
            None => break,
        }
    }
    let is_truncated = reader.next().is_some();

    Ok(TextPreview {
        path: path.to_path_buf(),
        lines,
        is_truncated,
    })
}

/// Strips ANSI escape sequences and control characters, expanding tabs.
fn sanitize_line(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\x1b' => match chars.next() {
                // CSI: ESC [ ... final letter
                Some('[') => {
                    for next in chars.by_ref() {
                        if next.is_ascii_alphabetic() {
                            break;
                        }
                    }
                }
                // OSC: ESC ] ... (BEL | ESC \)
                Some(']') => {
                    while let Some(next) = chars.next() {
                        if next == '\x07' {
                            break;
                        }
                        if next == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            },
            '\t' => result.push_str("    "),
            c if c.is_control() => {}
            c => result.push(c),
        }
    }

    result
}

struct Node {
    rel: PathBuf,
    is_dir: bool,
    children: Vec<usize>,
}

struct Child {
    name: String,
    path: PathBuf,
    is_dir: bool,
    descend: bool,
}

/// Summarises the tree under `root` in at most `max_lines` lines.
///
/// Directories are read level by level: every entry of a directory is
/// collected before any of its subdirectories is opened. Each discovered
/// child is placed right after its parent and the siblings found before
/// it, so the result reads as an ordinary indented tree even though it was
/// discovered breadth-first. The walk stops for good once `max_lines`
/// entries have been collected.
///
/// Children are ordered by name. Hidden entries are skipped unless
/// `include_hidden` is set. Symlinked directories are listed but never
/// entered. A subdirectory that cannot be read is recorded in
/// [`TreeSummary::skipped`] and the walk goes on.
///
/// # Errors
///
/// Returns the access error when `root` itself cannot be listed.
pub fn summarize_tree(root: &Path, include_hidden: bool, max_lines: usize) -> CoreResult<TreeSummary> {
    let meta = fs::metadata(root).map_err(|e| CoreError::from_io(root, e))?;
    if !meta.is_dir() {
        return Err(CoreError::NotADirectory(root.to_path_buf()));
    }

    let mut nodes: Vec<Node> = Vec::new();
    let mut top_level: Vec<usize> = Vec::new();
    let mut skipped = Vec::new();
    let mut truncated = false;

    let mut queue: VecDeque<(Option<usize>, PathBuf)> = VecDeque::new();
    queue.push_back((None, root.to_path_buf()));

    'walk: while let Some((parent, dir)) = queue.pop_front() {
        if nodes.len() >= max_lines {
            truncated = true;
            break;
        }

        let children = match read_children(&dir, include_hidden) {
            Ok(children) => children,
            Err(e) if parent.is_none() => return Err(e),
            Err(e) => {
                tracing::warn!(path = %dir.display(), error = %e, "preview skipped subtree");
                skipped.push(dir);
                continue;
            }
        };

        for child in children {
            if nodes.len() >= max_lines {
                truncated = true;
                break 'walk;
            }

            let rel = match parent {
                Some(p) => nodes[p].rel.join(&child.name),
                None => PathBuf::from(&child.name),
            };
            let index = nodes.len();
            nodes.push(Node {
                rel,
                is_dir: child.is_dir,
                children: Vec::new(),
            });
            match parent {
                Some(p) => nodes[p].children.push(index),
                None => top_level.push(index),
            }
            if child.descend {
                queue.push_back((Some(index), child.path));
            }
        }
    }

    let lines = flatten(&nodes, &top_level);
    tracing::debug!(
        root = %root.display(),
        lines = lines.len(),
        truncated,
        "tree preview built"
    );

    Ok(TreeSummary {
        root: root.to_path_buf(),
        lines,
        skipped,
        truncated,
    })
}

/// Pre-order rendering of the collected nodes.
fn flatten(nodes: &[Node], top_level: &[usize]) -> Vec<String> {
    let mut lines = Vec::with_capacity(nodes.len());
    let mut stack: Vec<usize> = top_level.iter().rev().copied().collect();

    while let Some(index) = stack.pop() {
        let node = &nodes[index];
        let mut line = node.rel.display().to_string();
        if node.is_dir {
            line.push(MAIN_SEPARATOR);
        }
        lines.push(line);
        stack.extend(node.children.iter().rev());
    }

    lines
}

fn read_children(dir: &Path, include_hidden: bool) -> CoreResult<Vec<Child>> {
    let read_dir = fs::read_dir(dir).map_err(|e| CoreError::from_io(dir, e))?;

    let mut children: Vec<Child> = read_dir
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = crate::nfc_string(&entry.file_name().to_string_lossy());
            if !include_hidden && name.starts_with('.') {
                return None;
            }
            let file_type = entry.file_type().ok()?;
            let path = entry.path();
            let is_dir = if file_type.is_symlink() {
                path.is_dir()
            } else {
                file_type.is_dir()
            };
            Some(Child {
                name,
                path,
                is_dir,
                descend: file_type.is_dir(),
            })
        })
        .collect();

    children.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(children)
}
