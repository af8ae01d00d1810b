//! File system layer.
//!
//! Directory reading ([`listing::list_dir`]) into [`entry::DirEntry`]
//! values, single-entry operations ([`ops`]), the reversible-delete seam
//! ([`trash::TrashBin`]) and previews ([`preview`]).

pub mod entry;
pub mod listing;
pub mod ops;
pub mod preview;
pub mod trash;

pub use preview::{Preview, TextPreview, TreeSummary};
