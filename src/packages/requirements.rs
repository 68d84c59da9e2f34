//! pip requirements file parsing
//!
//! Only exact pins (`==` / `===`) name a release that OSS Index can report
//! on; everything else is skipped with a log message.

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::errors::PackageError;
use crate::models::Package;

/// Path that selects standard input
pub const STDIN_PATH: &str = "-";

static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(^|\s+)#.*$").unwrap());

static INCLUDE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:-r\s*|--requirement(?:\s*=\s*|\s+))(\S.*)$").unwrap());

static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)\s*(?:\[[^\]]*\])?\s*(.*)$").unwrap()
});

static OPTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s--?[A-Za-z]").unwrap());

static SPECIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(===|==|~=|!=|<=|>=|<|>)\s*(\S+)$").unwrap());

/// One logical line of a requirements file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementLine {
    /// `-r other.txt`
    Include(String),

    /// Any other pip option
    Option(String),

    /// A requirement pinned to one version
    Pinned(Package),

    /// A requirement with a range or no version at all
    Unpinned(String),

    /// URLs, local paths and anything else we cannot turn into a release
    Unsupported(String),
}

/// Split content into logical lines: continuations joined, comments and blanks removed
pub fn logical_lines(content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for raw in content.lines() {
        // A comment line ends the logical line even when it ends in `\`
        if raw.trim_start().starts_with('#') {
            current.push(' ');
        } else if let Some(stripped) = raw.strip_suffix('\\') {
            current.push_str(stripped);
            continue;
        }
        current.push_str(raw);
        push_logical(&mut lines, &current);
        current.clear();
    }
    push_logical(&mut lines, &current);

    lines
}

fn push_logical(lines: &mut Vec<String>, line: &str) {
    let uncommented = COMMENT_RE.replace(line, "");
    let trimmed = uncommented.trim();
    if !trimmed.is_empty() {
        lines.push(trimmed.to_string());
    }
}

/// Classify one logical line
pub fn parse_line(line: &str) -> RequirementLine {
    if let Some(caps) = INCLUDE_RE.captures(line) {
        return RequirementLine::Include(caps[1].trim().to_string());
    }

    if line.starts_with('-') {
        return RequirementLine::Option(line.to_string());
    }

    // Environment markers and per-requirement options do not affect the pin
    let requirement = line.split(';').next().unwrap_or_default();
    let requirement = match OPTION_RE.find(requirement) {
        Some(m) => &requirement[..m.start()],
        None => requirement,
    }
    .trim();

    if requirement.contains("://") || requirement.starts_with('.') || requirement.starts_with('/')
    {
        return RequirementLine::Unsupported(line.to_string());
    }

    let Some(caps) = NAME_RE.captures(requirement) else {
        return RequirementLine::Unsupported(line.to_string());
    };

    let name = &caps[1];
    let specifiers = caps[2]
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .trim();

    if specifiers.is_empty() {
        return RequirementLine::Unpinned(line.to_string());
    }

    let mut pinned = None;
    for specifier in specifiers.split(',') {
        let Some(parts) = SPECIFIER_RE.captures(specifier.trim()) else {
            return RequirementLine::Unsupported(line.to_string());
        };
        let version = &parts[2];
        if matches!(&parts[1], "==" | "===") && !version.contains('*') && pinned.is_none() {
            pinned = Some(version.to_string());
        }
    }

    match pinned {
        Some(version) => RequirementLine::Pinned(Package::new(name, version)),
        None => RequirementLine::Unpinned(line.to_string()),
    }
}

/// Reads requirement files, following `-r` includes
#[derive(Default)]
pub struct RequirementsReader {
    visited: HashSet<PathBuf>,
    packages: Vec<Package>,
    stdin: Option<Box<dyn Read>>,
}

impl RequirementsReader {
    /// Create a new reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `-` from `input` instead of the process's standard input
    pub fn with_stdin(mut self, input: impl Read + 'static) -> Self {
        self.stdin = Some(Box::new(input));
        self
    }

    /// Read one file, or standard input for `-`
    pub fn read_path(&mut self, path: &Path) -> Result<(), PackageError> {
        if path == Path::new(STDIN_PATH) {
            return match self.stdin.take() {
                Some(input) => self.read_from(input, path),
                None => self.read_from(std::io::stdin().lock(), path),
            };
        }

        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if !self.visited.insert(key) {
            debug!("Already read {:?}, skipping", path);
            return Ok(());
        }

        let content = std::fs::read_to_string(path).map_err(|e| PackageError::ReadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        self.read_str(&content, base_dir)
    }

    /// Read requirements streamed from `input`, reported as `path` in errors.
    /// Includes resolve against the working directory.
    pub fn read_from<R: Read>(&mut self, mut input: R, path: &Path) -> Result<(), PackageError> {
        let mut content = String::new();
        input
            .read_to_string(&mut content)
            .map_err(|e| PackageError::ReadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        self.read_str(&content, Path::new("."))
    }

    /// Read requirements from a string; includes resolve against `base_dir`
    pub fn read_str(&mut self, content: &str, base_dir: &Path) -> Result<(), PackageError> {
        // Drop a leading byte order mark
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        for line in logical_lines(content) {
            match parse_line(&line) {
                RequirementLine::Include(target) => {
                    let target = base_dir.join(target);
                    self.read_path(&target)?;
                }
                RequirementLine::Pinned(package) => self.packages.push(package),
                RequirementLine::Option(option) => debug!("Ignoring option '{}'", option),
                RequirementLine::Unpinned(req) => {
                    warn!("Skipping '{}': only exact (==) pins can be audited", req)
                }
                RequirementLine::Unsupported(req) => {
                    warn!("Skipping unsupported requirement '{}'", req)
                }
            }
        }
        Ok(())
    }

    /// Packages read so far, in file order
    pub fn into_packages(self) -> Vec<Package> {
        self.packages
    }
}

/// Read every pinned requirement from `paths`, in order
pub fn read_requirements(paths: &[PathBuf]) -> Result<Vec<Package>, PackageError> {
    let mut reader = RequirementsReader::new();
    for path in paths {
        reader.read_path(path)?;
    }
    Ok(reader.into_packages())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_logical_lines() {
        let content = "# header\n\nrequests==2.0 # trailing\nflask\\\n==1.0\n   \nurl#frag\n";
        assert_eq!(
            logical_lines(content),
            vec!["requests==2.0", "flask==1.0", "url#frag"]
        );
    }

    #[rstest]
    #[case("requests==2.22.0", "requests", "2.22.0")]
    #[case("Django === 1.11", "Django", "1.11")]
    #[case("urllib3[secure]==1.25.3", "urllib3", "1.25.3")]
    #[case("pyyaml==5.1; python_version >= '3'", "pyyaml", "5.1")]
    #[case("six==1.12.0 --hash=sha256:abc", "six", "1.12.0")]
    #[case("idna>=2.5,==2.8", "idna", "2.8")]
    #[case("zope.interface (==4.6.0)", "zope.interface", "4.6.0")]
    fn test_pinned(#[case] line: &str, #[case] name: &str, #[case] version: &str) {
        assert_eq!(
            parse_line(line),
            RequirementLine::Pinned(Package::new(name, version))
        );
    }

    #[rstest]
    #[case("requests")]
    #[case("requests>=2.0")]
    #[case("requests==2.*")]
    #[case("requests~=2.1,!=2.3")]
    fn test_unpinned(#[case] line: &str) {
        assert_eq!(parse_line(line), RequirementLine::Unpinned(line.to_string()));
    }

    #[rstest]
    #[case("git+https://github.com/pallets/flask.git#egg=flask")]
    #[case("./local/package")]
    #[case("pkg @ https://example.com/pkg-1.0.tar.gz")]
    fn test_unsupported(#[case] line: &str) {
        assert_eq!(
            parse_line(line),
            RequirementLine::Unsupported(line.to_string())
        );
    }

    #[test]
    fn test_options() {
        assert_eq!(
            parse_line("-r base.txt"),
            RequirementLine::Include("base.txt".to_string())
        );
        assert_eq!(
            parse_line("--requirement=dev.txt"),
            RequirementLine::Include("dev.txt".to_string())
        );
        assert_eq!(
            parse_line("--index-url https://pypi.org/simple"),
            RequirementLine::Option("--index-url https://pypi.org/simple".to_string())
        );
        assert_eq!(
            parse_line("-e ."),
            RequirementLine::Option("-e .".to_string())
        );
    }

    #[test]
    fn test_read_str_keeps_order() {
        let mut reader = RequirementsReader::new();
        reader
            .read_str("b==2\na>=1\nc==3\n", Path::new("."))
            .expect("parse");
        assert_eq!(
            reader.into_packages(),
            vec![Package::new("b", "2"), Package::new("c", "3")]
        );
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let mut reader = RequirementsReader::new();
        reader
            .read_str("\u{feff}django==1.11.1\nsix==1.12.0\n", Path::new("."))
            .expect("parse");
        assert_eq!(
            reader.into_packages(),
            vec![Package::new("django", "1.11.1"), Package::new("six", "1.12.0")]
        );
    }

    #[test]
    fn test_comment_lines_do_not_continue() {
        let content = "# pinned for CVE-2019-6975 \\\ndjango==2.1.6\nflask\\\n# note \\\n==1.0\n";
        assert_eq!(logical_lines(content), vec!["django==2.1.6", "flask", "==1.0"]);
    }

    #[test]
    fn test_dash_reads_injected_stdin() {
        let mut reader =
            RequirementsReader::new().with_stdin(std::io::Cursor::new("requests==2.22.0\n"));
        reader.read_path(Path::new(STDIN_PATH)).expect("read stdin");
        assert_eq!(
            reader.into_packages(),
            vec![Package::new("requests", "2.22.0")]
        );
    }
}
