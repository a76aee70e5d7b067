//! User interface module - terminal output.

pub mod formatter;

pub use formatter::{display_error, display_release_summary, display_status, format_error};
