//! Utility functions for ossaudit

use log::{debug, log_enabled, Level};
use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::Command;

/// Log a command that is about to be executed
pub fn log_command(command: &Command) {
    // Only log if debug level is enabled (which corresponds to verbose mode)
    if log_enabled!(Level::Debug) {
        let program = command.get_program().to_string_lossy();

        let args: Vec<String> = command
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();

        let working_dir = command
            .get_current_dir()
            .map(|p| format!(" (in {})", p.display()))
            .unwrap_or_default();

        debug!("Executing: {} {}{}", program, args.join(" "), working_dir);
    }
}

/// Render a command for error messages
pub fn display_command(command: &Command) -> String {
    let mut parts = vec![command.get_program().to_string_lossy().into_owned()];
    parts.extend(
        command
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned()),
    );
    parts.join(" ")
}

/// Locate an executable in PATH, or accept it as-is when it is a path to an existing file
pub fn find_executable<S: AsRef<OsStr>>(command: S) -> Option<PathBuf> {
    let cmd = command.as_ref();
    let as_path = PathBuf::from(cmd);
    if as_path.components().count() > 1 && as_path.is_file() {
        return Some(as_path);
    }

    let result = which::which(cmd).ok();
    debug!("Command {:?} resolved to {:?}", cmd, result);
    result
}

/// Get the version of a command
pub fn get_command_version<S: AsRef<OsStr>>(command: S, args: &[&str]) -> Option<String> {
    let output = Command::new(command).args(args).output().ok()?;

    if output.status.success() {
        // Python 2 printed its version on stderr
        let text = if output.stdout.is_empty() {
            String::from_utf8_lossy(&output.stderr).to_string()
        } else {
            String::from_utf8_lossy(&output.stdout).to_string()
        };
        let first_line = text.lines().next()?;
        Some(first_line.trim().to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_command() {
        let mut command = Command::new("python3");
        command.args(["-m", "pip", "list"]);
        assert_eq!(display_command(&command), "python3 -m pip list");
    }

    #[test]
    fn test_missing_command() {
        assert!(find_executable("ossaudit-definitely-not-a-real-binary").is_none());
        assert!(find_executable("./no/such/interpreter").is_none());
    }
}
