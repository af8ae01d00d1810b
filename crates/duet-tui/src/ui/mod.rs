//! Widgets: the two pane bodies, the status bar and the modal dialogs.

pub mod panel;
pub mod popup;
pub mod preview;
pub mod statusbar;
