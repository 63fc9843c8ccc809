//! # Rendering Module
//!
//! Terminal-based rendering system using crossterm for display management.
//!
//! [`ui`] lays out the screen as plain lines; [`display`] writes them to the terminal.

pub mod display;
pub mod ui;

pub use display::*;
pub use ui::*;
