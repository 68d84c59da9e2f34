use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ossaudit
#[derive(Debug, Error)]
pub enum OssauditError {
    /// Configuration errors
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Package collection errors
    #[error("{0}")]
    Package(#[from] PackageError),

    /// Vulnerability lookup errors
    #[error("{0}")]
    Audit(#[from] AuditError),

    /// Report cache errors
    #[error("{0}")]
    Cache(#[from] CacheError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Configuration related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error loading configuration file
    #[error("Failed to load config from {path}: {message}")]
    LoadError { path: PathBuf, message: String },

    /// Error parsing configuration
    #[error("Failed to parse config {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// A value was syntactically fine but out of range
    #[error("Invalid config value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised while collecting packages to audit
#[derive(Debug, Error)]
pub enum PackageError {
    /// No usable Python interpreter
    #[error("Python interpreter '{0}' not found")]
    InterpreterNotFound(String),

    /// The package listing command failed
    #[error("Command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    /// The package listing command printed something unexpected
    #[error("Unexpected package listing output: {0}")]
    InvalidOutput(String),

    /// A requirements file could not be read
    #[error("Failed to read requirements from {path}: {message}")]
    ReadFailed { path: PathBuf, message: String },
}

/// Errors raised while querying OSS Index
#[derive(Debug, Error)]
pub enum AuditError {
    /// The request never produced a response
    #[error("OSS Index request failed: {0}")]
    Request(String),

    /// OSS Index throttled us
    #[error("OSS Index rate limit exceeded; configure a username and token or retry later")]
    RateLimited,

    /// OSS Index answered with an unexpected status
    #[error("OSS Index returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be decoded
    #[error("Invalid OSS Index response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for AuditError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AuditError::InvalidResponse(err.to_string())
        } else {
            AuditError::Request(err.to_string())
        }
    }
}

/// Report cache errors
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error
    #[error("Cache I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The cache file is not valid JSON
    #[error("Corrupt cache file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
