//! On-disk cache of OSS Index component reports

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::APP_NAME;
use crate::errors::CacheError;
use crate::models::ComponentReport;

/// Longest TTL honored; roughly a century
const MAX_TTL_HOURS: u64 = 24 * 365 * 100;

/// Default location of the cache file
pub fn default_cache_path() -> Option<PathBuf> {
    let mut path = dirs::cache_dir()?;
    path.push(APP_NAME);
    path.push("cache.json");
    Some(path)
}

/// Delete the cache file at `path`; a missing file is fine
pub fn reset(path: &Path) -> Result<(), CacheError> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed cache {:?}", path);
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(CacheError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    fetched_at: DateTime<Utc>,
    report: ComponentReport,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    #[serde(default)]
    entries: HashMap<String, CacheEntry>,
}

/// Component reports keyed by lowercased coordinate
#[derive(Debug)]
pub struct ReportCache {
    path: PathBuf,
    ttl: Duration,
    file: CacheFile,
    dirty: bool,
}

impl ReportCache {
    /// Open the cache at `path`, starting empty if it is missing or unreadable
    pub fn open(path: impl Into<PathBuf>, ttl_hours: u64) -> Self {
        let path = path.into();
        let file = match Self::load(&path) {
            Ok(file) => file,
            Err(err) => {
                warn!("Ignoring report cache: {}", err);
                CacheFile::default()
            }
        };

        Self {
            path,
            ttl: Duration::hours(ttl_hours.min(MAX_TTL_HOURS) as i64),
            file,
            dirty: false,
        }
    }

    fn load(path: &Path) -> Result<CacheFile, CacheError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(CacheFile::default()),
            Err(source) => {
                return Err(CacheError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|source| CacheError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Number of stored reports, fresh or not
    pub fn len(&self) -> usize {
        self.file.entries.len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.file.entries.is_empty()
    }

    /// A fresh report for `coordinate`, if any
    pub fn get(&self, coordinate: &str) -> Option<&ComponentReport> {
        self.get_at(coordinate, Utc::now())
    }

    /// Like [`ReportCache::get`], judged at `now`
    pub fn get_at(&self, coordinate: &str, now: DateTime<Utc>) -> Option<&ComponentReport> {
        let entry = self.file.entries.get(&coordinate.to_lowercase())?;
        if now.signed_duration_since(entry.fetched_at) < self.ttl {
            Some(&entry.report)
        } else {
            None
        }
    }

    /// Store a report fetched now
    pub fn insert(&mut self, report: ComponentReport) {
        self.insert_at(report, Utc::now());
    }

    /// Store a report fetched at `fetched_at`
    pub fn insert_at(&mut self, report: ComponentReport, fetched_at: DateTime<Utc>) {
        let key = report.coordinates.to_lowercase();
        self.file.entries.insert(key, CacheEntry { fetched_at, report });
        self.dirty = true;
    }

    /// Write the cache back if anything changed; stale entries are dropped
    pub fn save(&mut self) -> Result<(), CacheError> {
        if !self.dirty {
            return Ok(());
        }

        let now = Utc::now();
        let ttl = self.ttl;
        self.file
            .entries
            .retain(|_, entry| now.signed_duration_since(entry.fetched_at) < ttl);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| CacheError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string(&self.file).map_err(|source| CacheError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        fs::write(&self.path, content).map_err(|source| CacheError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!("Saved {} reports to {:?}", self.len(), self.path);
        self.dirty = false;
        Ok(())
    }
}
