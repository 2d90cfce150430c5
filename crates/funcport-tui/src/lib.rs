//! # funcport-tui - Terminal UI for Funcport
//!
//! The View half of the loader/view split: ratatui widgets over the
//! resolved state in funcport-app, a crossterm event loop, and the runner
//! that wires loader completions back into the update cycle.

pub mod event;
pub mod layout;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod view;
pub mod widgets;

#[cfg(test)]
pub mod test_utils;

// Re-export main entry point
pub use runner::run;
