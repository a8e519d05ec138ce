//! Output module for search reports.
//!
//! This module handles:
//! - Colored console output and progress
//! - Grid table rendering
//! - JSON report formatting

pub mod console;
pub mod table;

pub use console::ConsoleOutput;
pub use table::{render_grid, status_label};
