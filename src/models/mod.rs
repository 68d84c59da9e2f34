//! Core data models for ossaudit

use serde::{Deserialize, Serialize};

pub mod package;
pub mod vulnerability;

pub use package::*;
pub use vulnerability::*;

/// Result of auditing a set of packages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    /// Number of distinct packages audited
    pub packages: usize,

    /// Vulnerabilities left after ignores were applied
    pub vulnerabilities: Vec<Vulnerability>,
}

impl AuditReport {
    /// Whether the audit found nothing to report
    pub fn is_clean(&self) -> bool {
        self.vulnerabilities.is_empty()
    }
}
