//! TUI module for interactive terminal interfaces.
//!
//! Uses `ratatui` + `crossterm` for rendering.

mod curator;
/// Curator state types.
pub mod state;
mod ui;

pub use curator::run_curator;
