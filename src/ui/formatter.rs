//! Pure formatting functions for UI output.
//!
//! Status output goes to stderr so that stdout carries only the released tag.

use console::style;

use crate::cli::ReleaseOutcome;

/// Format an error the way the binary reports it: `<program>: <error>`
pub fn format_error(program: &str, message: &str) -> String {
    format!("{}: {}", program, message)
}

/// Print an error message to stderr, program name in red.
pub fn display_error(program: &str, message: &str) {
    eprintln!("{}", format_error(&style(program).red().to_string(), message));
}

/// Print a status message with yellow arrow to stderr.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Summarise a finished release on stderr.
///
/// Shows either "From: old -> To: new" or, on a first release, only the new tag.
pub fn display_release_summary(outcome: &ReleaseOutcome) {
    match &outcome.previous {
        Some(previous) => {
            eprintln!("{}", style("Released:").bold());
            eprintln!("  From: {}", style(previous).red());
            eprintln!("  To:   {}", style(&outcome.tag).green());
        }
        None => {
            eprintln!("{}", style("Initial release:").bold());
            eprintln!("  Tag: {}", style(&outcome.tag).green());
        }
    }
    eprintln!(
        "{} Archive written to {}",
        style("✓").green(),
        outcome.archive.display()
    );
}
