//! Navigation logic.
//!
//! The [`pane::Pane`] trait with its two bodies, the files pane state
//! machine ([`pane::PaneState`]) and the preview pane
//! ([`preview_pane::PreviewPane`]), plus the pieces they are built from:
//! [`sort`]ing, [`glob`] filtering and the [`selection`] set.

pub mod glob;
pub mod pane;
pub mod preview_pane;
pub mod selection;
pub mod sort;
