use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

use super::Package;

/// OSS Index's answer for a single coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentReport {
    /// Coordinate the report is about
    pub coordinates: String,

    /// Component description
    #[serde(default)]
    pub description: Option<String>,

    /// Link to the component page
    #[serde(default)]
    pub reference: Option<String>,

    /// Known vulnerabilities
    #[serde(default)]
    pub vulnerabilities: Vec<ReportedVulnerability>,
}

/// A vulnerability as OSS Index describes it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedVulnerability {
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub cvss_score: Option<f64>,

    #[serde(default)]
    pub cvss_vector: Option<String>,

    #[serde(default)]
    pub cve: Option<String>,

    #[serde(default)]
    pub reference: Option<String>,
}

/// A vulnerability affecting one audited package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub name: String,
    pub version: String,
    pub id: String,
    pub cve: Option<String>,
    pub cvss_score: Option<f64>,
    pub cvss_vector: Option<String>,
    pub title: String,
    pub description: String,
    pub reference: Option<String>,
}

impl Vulnerability {
    /// Combine a package with one entry of its component report
    pub fn from_report(package: &Package, reported: &ReportedVulnerability) -> Self {
        Self {
            name: package.name.clone(),
            version: package.version.clone(),
            id: reported.id.clone(),
            cve: reported.cve.clone().filter(|cve| !cve.is_empty()),
            cvss_score: reported.cvss_score,
            cvss_vector: reported.cvss_vector.clone(),
            title: reported.title.clone(),
            description: reported.description.clone(),
            reference: reported.reference.clone(),
        }
    }

    /// Text for a table column
    pub fn field(&self, column: Column) -> String {
        match column {
            Column::Name => self.name.clone(),
            Column::Version => self.version.clone(),
            Column::Id => self.id.clone(),
            Column::Cve => self.cve.clone().unwrap_or_default(),
            Column::CvssScore => self
                .cvss_score
                .map(|score| score.to_string())
                .unwrap_or_default(),
            Column::CvssVector => self.cvss_vector.clone().unwrap_or_default(),
            Column::Title => self.title.clone(),
            Column::Description => self.description.clone(),
            Column::Reference => self.reference.clone().unwrap_or_default(),
        }
    }

    /// Text for a user-named column; unknown names render empty
    pub fn field_by_name(&self, name: &str) -> String {
        Column::from_str(name.trim())
            .map(|column| self.field(column))
            .unwrap_or_default()
    }

    /// Whether the id or CVE is in `ignored`
    pub fn is_ignored<S: AsRef<str>>(&self, ignored: &[S]) -> bool {
        ignored.iter().any(|entry| {
            let entry = entry.as_ref();
            entry == self.id || self.cve.as_deref() == Some(entry)
        })
    }
}

/// Vulnerability fields that can be shown in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Column {
    Name,
    Version,
    Id,
    Cve,
    CvssScore,
    CvssVector,
    Title,
    Description,
    Reference,
}
