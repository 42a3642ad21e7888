//! Vigil Monitor - health-check runner
//!
//! Loads the YAML configuration, wires the declared resources, builds the
//! check directory (direct registrations first, wildcard expansion second),
//! runs the requested suites, and reports the results. Exits non-zero when
//! any check fails.

mod disk;

use anyhow::{bail, Context as _, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use vigil_checks::{build_directory, build_reporters, KindRegistry, MailReportingOptions};
use vigil_common::{Config, LogFormat};
use vigil_core::Resources;

/// Vigil health-check runner
#[derive(Parser, Debug)]
#[command(name = "vigil")]
#[command(version)]
#[command(about = "Runs configured health checks and reports the results", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "/etc/vigil/config.yaml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log format (pretty, json, compact)
    #[arg(long, default_value = "pretty")]
    log_format: String,

    /// Only run checks in this suite
    #[arg(long)]
    suite: Option<String>,

    /// Print the report batch as JSON to stdout
    #[arg(long)]
    json: bool,

    /// List the available check kinds and exit
    #[arg(long)]
    list_checks: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    vigil_common::init_logging(&args.log_level, LogFormat::parse(&args.log_format));

    if args.list_checks {
        for kind in KindRegistry::builtin().iter() {
            match kind.config_info {
                Some(info) => println!("{}: {}", kind.config_key, info),
                None => println!("{}", kind.config_key),
            }
        }
        return Ok(());
    }

    info!("vigil {} starting", env!("CARGO_PKG_VERSION"));

    let config = if std::path::Path::new(&args.config).exists() {
        Config::from_file(&args.config)?
    } else {
        warn!("config file {} not found, using defaults", args.config);
        Config::default()
    };
    let config = config.merge_env();

    let mut resources = Resources::new();
    for (name, storage) in &config.resources.storage {
        resources.add_storage(name.clone(), Arc::new(disk::DiskStorage::new(&storage.root)));
    }

    let kinds = KindRegistry::builtin();
    let directory = build_directory(&config.checks, &kinds, &resources)
        .context("failed to build check directory")?;
    info!(
        checks = directory.len(),
        suites = directory.suites().count(),
        "check directory ready"
    );

    let reports = match &args.suite {
        Some(suite) => directory
            .run_suite(suite)
            .with_context(|| format!("unknown suite '{suite}'"))?,
        None => directory.run_all(),
    };

    let mail = MailReportingOptions {
        enabled: config.reporting.mail.enabled,
        recipients: config.reporting.mail.recipients.clone(),
        only_failures: config.reporting.mail.only_failures,
    };
    for reporter in build_reporters(&mail, &resources)? {
        reporter.deliver(&reports)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    let failures = reports.iter().filter(|r| r.outcome.is_failure()).count();
    if failures > 0 {
        bail!("{failures} of {} checks failing", reports.len());
    }

    info!("{} checks passing", reports.len());
    Ok(())
}
