//! TUI module for the interactive movie browser.
//!
//! Uses `ratatui` + `crossterm` for rendering.

mod browser;
/// Filter bar state types.
pub mod filters;
/// Pagination windowing.
pub mod pager;
/// Browse state types.
pub mod state;
mod ui;

pub use browser::run_browser;
