//! Terminal helpers: width, spinner, error line

use colored::Colorize;
use console::{Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Width used when stdout is not a terminal
pub const DEFAULT_WIDTH: usize = 80;

/// Color palette for ossaudit's status output
pub struct AuditColors;

impl AuditColors {
    pub fn primary() -> Style {
        Style::new().cyan().bold()
    }

    pub fn subtle() -> Style {
        Style::new().dim()
    }
}

/// Columns available on stdout
pub fn terminal_width() -> usize {
    match Term::stdout().size_checked() {
        Some((_, cols)) if cols > 0 => usize::from(cols),
        _ => DEFAULT_WIDTH,
    }
}

/// Spinner on stderr, hidden automatically when stderr is not a terminal
pub fn audit_spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"]),
    );
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Styled status line, e.g. for the interpreter in use
pub fn status_line(label: &str, value: &str) -> String {
    format!(
        "{} {}",
        AuditColors::primary().apply_to(label),
        AuditColors::subtle().apply_to(value)
    )
}

/// `Error: <message>` with the prefix highlighted
pub fn error_line(message: &str) -> String {
    format!("{} {}", "Error:".red().bold(), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_line() {
        colored::control::set_override(false);
        assert_eq!(error_line("boom"), "Error: boom");
    }

    #[test]
    fn test_terminal_width_is_positive() {
        assert!(terminal_width() > 0);
    }
}
