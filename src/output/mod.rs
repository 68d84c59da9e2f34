//! Output formatting for ossaudit

use clap::ValueEnum;
use colored::Colorize;
use strum_macros::Display;

use crate::models::AuditReport;

pub mod table;
pub mod terminal;

use table::Table;

/// Trait for formatting output
pub trait OutputFormatter: Send + Sync {
    /// Format an audit report, showing `columns` for each vulnerability
    fn format_report(&self, report: &AuditReport, columns: &[String]) -> String;
}

/// Output formats selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, ValueEnum)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// Table and summary for humans
    #[default]
    Pretty,

    /// A single JSON document
    Json,
}

impl OutputFormat {
    /// Formatter for this format
    pub fn formatter(self) -> Box<dyn OutputFormatter> {
        match self {
            OutputFormat::Pretty => Box::new(PrettyFormatter::new()),
            OutputFormat::Json => Box::new(JsonFormatter),
        }
    }
}

/// Bordered table followed by a one-line summary
#[derive(Debug, Clone)]
pub struct PrettyFormatter {
    /// Widest a table line may be
    max_width: usize,
}

impl Default for PrettyFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl PrettyFormatter {
    /// Create a formatter sized to the terminal
    pub fn new() -> Self {
        Self::with_width(terminal::terminal_width())
    }

    /// Create a formatter with a fixed width
    pub fn with_width(max_width: usize) -> Self {
        Self { max_width }
    }

    /// The closing line, e.g. `Found 2 vulnerabilities in 10 packages`
    pub fn summary(report: &AuditReport) -> String {
        let line = format!(
            "Found {} vulnerabilities in {} packages",
            report.vulnerabilities.len(),
            report.packages
        );
        if report.is_clean() {
            line.green().to_string()
        } else {
            line.red().bold().to_string()
        }
    }
}

impl OutputFormatter for PrettyFormatter {
    fn format_report(&self, report: &AuditReport, columns: &[String]) -> String {
        let mut output = String::new();

        if !report.is_clean() {
            let mut table = Table::new(columns.iter().cloned(), self.max_width);
            for vuln in &report.vulnerabilities {
                table.add_row(
                    columns
                        .iter()
                        .map(|column| vuln.field_by_name(column))
                        .collect(),
                );
            }
            output.push_str(&table.draw());
        }

        output.push_str(&Self::summary(report));
        output.push('\n');
        output
    }
}

/// JSON formatter for machine-readable output
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AuditReport, _columns: &[String]) -> String {
        let mut output =
            serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
        output.push('\n');
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Vulnerability;

    fn vulnerability(name: &str, title: &str) -> Vulnerability {
        Vulnerability {
            name: name.to_string(),
            version: "1.0".to_string(),
            id: "id".to_string(),
            cve: None,
            cvss_score: None,
            cvss_vector: None,
            title: title.to_string(),
            description: String::new(),
            reference: None,
        }
    }

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_clean_report_has_no_table() {
        colored::control::set_override(false);
        let report = AuditReport {
            packages: 3,
            vulnerabilities: Vec::new(),
        };
        let output = PrettyFormatter::with_width(80).format_report(&report, &columns(&["name"]));
        assert_eq!(output, "Found 0 vulnerabilities in 3 packages\n");
    }

    #[test]
    fn test_table_uses_configured_headers() {
        colored::control::set_override(false);
        let report = AuditReport {
            packages: 1,
            vulnerabilities: vec![vulnerability("django", "XSS")],
        };
        let output = PrettyFormatter::with_width(80)
            .format_report(&report, &columns(&["Name", "Title", "Bogus"]));

        assert!(output.contains("| Name   | Title | Bogus |"));
        assert!(output.contains("| django | XSS   |       |"));
        assert!(output.ends_with("Found 1 vulnerabilities in 1 packages\n"));
    }

    #[test]
    fn test_json_report() {
        let report = AuditReport {
            packages: 2,
            vulnerabilities: vec![vulnerability("flask", "bad")],
        };
        let output = JsonFormatter.format_report(&report, &[]);
        let parsed: AuditReport = serde_json::from_str(&output).expect("valid json");
        assert_eq!(parsed, report);
    }
}
