//! Vulnerability lookup against OSS Index

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};

use crate::cache::ReportCache;
use crate::config::MAX_BATCH_SIZE;
use crate::errors::AuditError;
use crate::models::{ComponentReport, Package, Vulnerability};

mod client;

pub use client::OssIndexClient;

/// Requests allowed in flight at once
pub const MAX_IN_FLIGHT: usize = 2;

/// Anything that can answer component report queries
#[async_trait]
pub trait ComponentIndex: Send + Sync {
    /// Reports for `coordinates`; at most [`MAX_BATCH_SIZE`] per call
    async fn component_reports(
        &self,
        coordinates: &[String],
    ) -> Result<Vec<ComponentReport>, AuditError>;
}

/// Resolves packages to vulnerabilities, batching and caching lookups
pub struct Auditor<I: ComponentIndex> {
    index: I,
    cache: Option<ReportCache>,
    batch_size: usize,
}

impl<I: ComponentIndex> Auditor<I> {
    /// Create an auditor without a cache
    pub fn new(index: I) -> Self {
        Self {
            index,
            cache: None,
            batch_size: MAX_BATCH_SIZE,
        }
    }

    /// Serve fresh reports from `cache` and store new ones in it
    pub fn with_cache(mut self, cache: Option<ReportCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Coordinates per request, clamped to what OSS Index accepts
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
        self
    }

    /// Every known vulnerability of `packages`, in package order
    pub async fn audit(&mut self, packages: &[Package]) -> Result<Vec<Vulnerability>, AuditError> {
        if packages.is_empty() {
            return Ok(Vec::new());
        }

        let mut reports: HashMap<String, ComponentReport> = HashMap::new();
        let mut seen = HashSet::new();
        let mut pending = Vec::new();

        for package in packages {
            let coordinate = package.coordinate();
            let key = coordinate.to_lowercase();
            if !seen.insert(key.clone()) {
                continue;
            }

            match self.cache.as_ref().and_then(|cache| cache.get(&key)) {
                Some(report) => {
                    debug!("Cache hit for {}", coordinate);
                    reports.insert(key, report.clone());
                }
                None => pending.push(coordinate),
            }
        }

        if !pending.is_empty() {
            info!(
                "Querying OSS Index for {} of {} packages",
                pending.len(),
                seen.len()
            );

            let index = &self.index;
            let fetched: Vec<Vec<ComponentReport>> = stream::iter(pending.chunks(self.batch_size))
                .map(|chunk| index.component_reports(chunk))
                .buffered(MAX_IN_FLIGHT)
                .try_collect()
                .await?;

            for report in fetched.into_iter().flatten() {
                if let Some(cache) = self.cache.as_mut() {
                    cache.insert(report.clone());
                }
                reports.insert(report.coordinates.to_lowercase(), report);
            }

            if let Some(cache) = self.cache.as_mut() {
                if let Err(err) = cache.save() {
                    warn!("Failed to save report cache: {}", err);
                }
            }
        }

        let mut vulnerabilities = Vec::new();
        for package in packages {
            match reports.get(&package.coordinate().to_lowercase()) {
                Some(report) => vulnerabilities.extend(
                    report
                        .vulnerabilities
                        .iter()
                        .map(|reported| Vulnerability::from_report(package, reported)),
                ),
                None => debug!("No report for {}", package),
            }
        }

        Ok(vulnerabilities)
    }
}

/// Drop vulnerabilities whose id or CVE appears in `ignored`
pub fn filter_ignored<S: AsRef<str>>(
    vulnerabilities: Vec<Vulnerability>,
    ignored: &[S],
) -> Vec<Vulnerability> {
    if ignored.is_empty() {
        return vulnerabilities;
    }

    let before = vulnerabilities.len();
    let kept: Vec<Vulnerability> = vulnerabilities
        .into_iter()
        .filter(|vuln| !vuln.is_ignored(ignored))
        .collect();
    debug!("Ignored {} vulnerabilities", before - kept.len());
    kept
}
