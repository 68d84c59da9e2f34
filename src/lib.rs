//! ossaudit - audit Python packages for known vulnerabilities
//!
//! Packages come from the active Python environment (`pip list`) and from
//! pinned requirement files. Each release is looked up in Sonatype OSS Index
//! and every reported vulnerability that is not explicitly ignored ends up in
//! the [`models::AuditReport`].

pub mod app;
pub mod audit;
pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod output;
pub mod packages;
pub mod utils;
