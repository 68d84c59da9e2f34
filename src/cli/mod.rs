//! Command-line interface for ossaudit

use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Verbosity level for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Default)]
pub enum Verbosity {
    /// Quiet mode - only show errors
    Quiet = 0,

    /// Normal mode - show errors and warnings
    #[default]
    Normal = 1,

    /// Verbose mode - show errors, warnings, and info
    Verbose = 2,

    /// Debug mode - show everything including debug info
    Debug = 3,
}

impl From<u8> for Verbosity {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }
}

impl Verbosity {
    /// Default log level for this verbosity
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::Error,
            Self::Normal => LevelFilter::Warn,
            Self::Verbose => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
        }
    }
}

/// What to audit, independent of how the flags were spelled
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditRequest {
    /// Include installed packages
    pub installed: bool,

    /// Requirement files, `-` for stdin
    pub files: Vec<PathBuf>,

    /// Ids and CVEs ignored for this run, on top of the configured ones
    pub ignore_ids: Vec<String>,
}

/// ossaudit - audit Python packages for known vulnerabilities
#[derive(Parser, Debug)]
#[command(
    name = "ossaudit",
    author,
    version,
    about = "Audit Python packages for known vulnerabilities",
    long_about = "ossaudit looks up installed Python packages and pinned requirements in \
                  Sonatype OSS Index and reports every known vulnerability. It exits with a \
                  non-zero status when any vulnerability is found."
)]
pub struct Cli {
    /// Configuration file
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Audit installed packages
    #[arg(short, long)]
    pub installed: bool,

    /// Audit packages in file (can be specified multiple times, `-` for stdin)
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Ignore a vulnerability by id or CVE (can be specified multiple times)
    #[arg(long = "ignore-id", value_name = "ID")]
    pub ignore_ids: Vec<String>,

    /// Remove the cached OSS Index reports before auditing
    #[arg(long)]
    pub reset_cache: bool,

    /// Neither read nor write cached reports
    #[arg(long)]
    pub no_cache: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,

    /// Python interpreter used to list installed packages
    #[arg(long, value_name = "EXE")]
    pub python: Option<String>,

    /// Verbosity level (-v=verbose, -vv=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only errors are logged)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Effective verbosity
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            Verbosity::from(self.verbose)
        }
    }

    /// The audit this invocation asks for
    pub fn audit_request(&self) -> AuditRequest {
        AuditRequest {
            installed: self.installed,
            files: self.files.clone(),
            ignore_ids: self.ignore_ids.clone(),
        }
    }
}
