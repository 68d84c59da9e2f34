use clap::Parser;
use std::io;
use std::process::ExitCode;

use ossaudit::app::OssauditApp;
use ossaudit::audit::{Auditor, OssIndexClient};
use ossaudit::cache::{self, ReportCache};
use ossaudit::cli::{Cli, Verbosity};
use ossaudit::config::{default_config_path, ConfigProvider, TomlConfigProvider};
use ossaudit::errors::OssauditError;
use ossaudit::models::AuditReport;
use ossaudit::output::{terminal, OutputFormat};
use ossaudit::packages::PipPackageCollector;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbosity = cli.verbosity();

    // RUST_LOG still wins over -v/-q
    env_logger::Builder::new()
        .filter_level(verbosity.level_filter())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    match run(cli, verbosity).await {
        Ok(report) if report.is_clean() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{}", terminal::error_line(&err.to_string()));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, verbosity: Verbosity) -> Result<AuditReport, OssauditError> {
    let config_provider = TomlConfigProvider::new();
    let config = config_provider.load_config(cli.config_file.as_deref())?;

    let cache_path = cache::default_cache_path();
    if verbosity >= Verbosity::Verbose {
        let config_path = cli.config_file.clone().or_else(default_config_path);
        for (label, path) in [("config", config_path), ("cache", cache_path.clone())] {
            let shown = path
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(none)".to_string());
            eprintln!("{}", terminal::status_line(label, &shown));
        }
    }

    if cli.reset_cache {
        if let Some(path) = &cache_path {
            cache::reset(path)?;
        }
    }

    let report_cache = if cli.no_cache {
        None
    } else {
        cache_path.map(|path| ReportCache::open(path, config.cache_ttl_hours))
    };

    let index = OssIndexClient::from_config(&config)?;
    let auditor = Auditor::new(index)
        .with_batch_size(config.batch_size)
        .with_cache(report_cache);

    let python = cli.python.clone().or_else(|| config.python.clone());
    let collector = PipPackageCollector::new(python);

    let show_progress = cli.format == OutputFormat::Pretty && verbosity != Verbosity::Quiet;
    let mut app = OssauditApp::new(config, collector, auditor, cli.format.formatter())
        .with_progress(show_progress);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    app.run(&cli.audit_request(), &mut out).await
}
