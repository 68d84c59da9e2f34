use serde::{Deserialize, Serialize};
use std::fmt;

/// A Python distribution pinned to one version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Distribution name as it was written
    pub name: String,

    /// Exact version
    pub version: String,
}

impl Package {
    /// Create a new package
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// PEP 503 normalized name: lowercase, runs of `-`, `_` and `.` collapsed to `-`
    pub fn canonical_name(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        let mut in_separator = false;
        for c in self.name.chars() {
            if matches!(c, '-' | '_' | '.') {
                if !in_separator {
                    out.push('-');
                }
                in_separator = true;
            } else {
                out.extend(c.to_lowercase());
                in_separator = false;
            }
        }
        out
    }

    /// Package URL understood by OSS Index
    pub fn coordinate(&self) -> String {
        format!("pkg:pypi/{}@{}", self.canonical_name(), self.version)
    }

    /// Whether two packages refer to the same release
    pub fn same_release(&self, other: &Package) -> bool {
        self.version == other.version && self.canonical_name() == other.canonical_name()
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=={}", self.name, self.version)
    }
}

/// Remove repeated releases, keeping the first occurrence
pub fn dedup_packages(packages: Vec<Package>) -> Vec<Package> {
    let mut unique: Vec<Package> = Vec::with_capacity(packages.len());
    for package in packages {
        if !unique.iter().any(|p| p.same_release(&package)) {
            unique.push(package);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_name() {
        assert_eq!(Package::new("Django", "1.0").canonical_name(), "django");
        assert_eq!(
            Package::new("zope.interface", "5.0").canonical_name(),
            "zope-interface"
        );
        assert_eq!(Package::new("Foo__Bar-.baz", "1").canonical_name(), "foo-bar-baz");
    }

    #[test]
    fn test_coordinate() {
        let package = Package::new("PyYAML", "5.1");
        assert_eq!(package.coordinate(), "pkg:pypi/pyyaml@5.1");
    }

    #[test]
    fn test_dedup_keeps_first() {
        let packages = vec![
            Package::new("Requests", "2.0"),
            Package::new("flask", "1.0"),
            Package::new("requests", "2.0"),
            Package::new("requests", "2.1"),
        ];
        let unique = dedup_packages(packages);
        assert_eq!(
            unique,
            vec![
                Package::new("Requests", "2.0"),
                Package::new("flask", "1.0"),
                Package::new("requests", "2.1"),
            ]
        );
    }
}
