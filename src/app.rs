use log::info;
use std::io::Write;

use crate::audit::{filter_ignored, Auditor, ComponentIndex};
use crate::cli::AuditRequest;
use crate::config::OssauditConfig;
use crate::errors::OssauditError;
use crate::models::{dedup_packages, AuditReport, Package};
use crate::output::{terminal, OutputFormatter};
use crate::packages::PackageCollector;

/// Core application that orchestrates an audit
pub struct OssauditApp<P, I>
where
    P: PackageCollector,
    I: ComponentIndex,
{
    config: OssauditConfig,
    collector: P,
    auditor: Auditor<I>,
    output_formatter: Box<dyn OutputFormatter>,
    show_progress: bool,
}

impl<P, I> OssauditApp<P, I>
where
    P: PackageCollector,
    I: ComponentIndex,
{
    /// Create a new instance of OssauditApp
    pub fn new(
        config: OssauditConfig,
        collector: P,
        auditor: Auditor<I>,
        output_formatter: Box<dyn OutputFormatter>,
    ) -> Self {
        Self {
            config,
            collector,
            auditor,
            output_formatter,
            show_progress: false,
        }
    }

    /// Show a spinner on stderr while waiting on OSS Index
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Installed packages first, then each file's pins, without repeats
    pub async fn collect_packages(
        &self,
        request: &AuditRequest,
    ) -> Result<Vec<Package>, OssauditError> {
        let mut packages = Vec::new();

        if request.installed {
            let installed = self.collector.installed().await?;
            info!("Found {} installed packages", installed.len());
            packages.extend(installed);
        }

        if !request.files.is_empty() {
            packages.extend(self.collector.from_files(&request.files)?);
        }

        Ok(dedup_packages(packages))
    }

    /// Run the audit and write the formatted report to `out`
    pub async fn run<W: Write>(
        &mut self,
        request: &AuditRequest,
        out: &mut W,
    ) -> Result<AuditReport, OssauditError> {
        let packages = self.collect_packages(request).await?;

        let spinner = (self.show_progress && !packages.is_empty()).then(|| {
            terminal::audit_spinner(format!("Auditing {} packages", packages.len()))
        });
        let audited = self.auditor.audit(&packages).await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        let ignored: Vec<&String> = self
            .config
            .ignore_ids
            .iter()
            .chain(&request.ignore_ids)
            .collect();
        let report = AuditReport {
            packages: packages.len(),
            vulnerabilities: filter_ignored(audited?, &ignored),
        };

        let rendered = self
            .output_formatter
            .format_report(&report, &self.config.columns);
        out.write_all(rendered.as_bytes())?;
        out.flush()?;

        Ok(report)
    }
}
