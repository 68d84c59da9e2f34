//! Package collection: installed distributions and requirement files

use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;
use std::path::PathBuf;
use std::process::Command;
use tokio::task;

use crate::errors::PackageError;
use crate::models::Package;
use crate::utils::{display_command, find_executable, get_command_version, log_command};

pub mod requirements;

pub use requirements::{read_requirements, RequirementsReader};

/// Interpreters tried, in order, when none is configured
pub const DEFAULT_INTERPRETERS: &[&str] = &["python3", "python"];

/// Source of packages to audit
#[async_trait]
pub trait PackageCollector: Send + Sync {
    /// Packages installed in the Python environment
    async fn installed(&self) -> Result<Vec<Package>, PackageError>;

    /// Packages pinned in the given requirement files
    fn from_files(&self, files: &[PathBuf]) -> Result<Vec<Package>, PackageError>;
}

/// Collects packages with `pip list` and by parsing requirement files
#[derive(Debug, Clone, Default)]
pub struct PipPackageCollector {
    /// Interpreter name or path; `None` tries the defaults
    python: Option<String>,
}

impl PipPackageCollector {
    /// Create a new collector
    pub fn new(python: Option<String>) -> Self {
        Self { python }
    }

    /// Resolve the interpreter to run
    fn interpreter(&self) -> Result<PathBuf, PackageError> {
        match &self.python {
            Some(python) => {
                find_executable(python).ok_or_else(|| PackageError::InterpreterNotFound(python.clone()))
            }
            None => DEFAULT_INTERPRETERS
                .iter()
                .find_map(find_executable)
                .ok_or_else(|| PackageError::InterpreterNotFound(DEFAULT_INTERPRETERS.join(" or "))),
        }
    }

    fn list_installed(python: PathBuf) -> Result<Vec<Package>, PackageError> {
        if let Some(version) = get_command_version(&python, &["--version"]) {
            info!("Listing packages installed for {}", version);
        }

        let mut command = Command::new(&python);
        command.args([
            "-m",
            "pip",
            "list",
            "--format=json",
            "--disable-pip-version-check",
        ]);
        log_command(&command);

        let output = command.output().map_err(|e| PackageError::CommandFailed {
            command: display_command(&command),
            message: e.to_string(),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PackageError::CommandFailed {
                command: display_command(&command),
                message: stderr.trim().to_string(),
            });
        }

        parse_pip_list(&String::from_utf8_lossy(&output.stdout))
    }
}

#[async_trait]
impl PackageCollector for PipPackageCollector {
    async fn installed(&self) -> Result<Vec<Package>, PackageError> {
        let python = self.interpreter()?;
        let display = python.display().to_string();

        task::spawn_blocking(move || Self::list_installed(python))
            .await
            .unwrap_or_else(|e| {
                Err(PackageError::CommandFailed {
                    command: display,
                    message: format!("Task panicked: {}", e),
                })
            })
    }

    fn from_files(&self, files: &[PathBuf]) -> Result<Vec<Package>, PackageError> {
        let packages = read_requirements(files)?;
        debug!("Read {} pinned packages from {} files", packages.len(), files.len());
        Ok(packages)
    }
}

#[derive(Debug, Deserialize)]
struct PipEntry {
    name: String,
    version: String,
}

/// Parse the output of `pip list --format=json`
pub fn parse_pip_list(output: &str) -> Result<Vec<Package>, PackageError> {
    // Old pips print warnings ahead of the JSON document
    let start = output
        .find('[')
        .ok_or_else(|| PackageError::InvalidOutput(output.trim().to_string()))?;

    let entries: Vec<PipEntry> = serde_json::from_str(output[start..].trim())
        .map_err(|e| PackageError::InvalidOutput(e.to_string()))?;

    Ok(entries
        .into_iter()
        .map(|entry| Package::new(entry.name, entry.version))
        .collect())
}
