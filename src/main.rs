// NetSyslog - GPL-3.0-or-later
// This file is part of NetSyslog.
//
// Copyright (C) 2026 Daniel Freiermuth
//
// NetSyslog is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// NetSyslog is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with NetSyslog.  If not, see <https://www.gnu.org/licenses/>.

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use netsyslog::config::{resolve_target_date, Config};
use netsyslog::core::{run, RunError, RunStatus};
use netsyslog::render::{report_subject, HtmlRenderer};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Mail-ready HTML report
    Html,
    /// Report table and diagnostics as JSON
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "netsyslog")]
#[command(author = "NetSyslog Team")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("NETSYSLOG_REVISION"), ")"))]
#[command(about = "Summarize one day of network device syslog files as an HTML report", long_about = None)]
struct Args {
    /// Path to the JSON config file (default: <config dir>/netsyslog/config.json)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the yyyy-mm-dd.xxx.xxx.xxx.xxx.txt log files
    #[arg(short, long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Date to report on
    #[arg(long, value_name = "YYYY-MM-DD", conflicts_with = "days_before")]
    date: Option<NaiveDate>,

    /// Report on the logs of this many days ago
    #[arg(long, value_name = "N")]
    days_before: Option<u32>,

    /// Distinct example messages kept per row
    #[arg(long, value_name = "N")]
    sample_cap: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    format: OutputFormat,

    /// Write the report here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write nothing when no log file exists for the date
    #[arg(long)]
    skip_empty: bool,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the report can be piped; RUST_LOG overrides the level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::debug!("netsyslog {} starting", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(dir) = args.dir {
        config.log_dir = Some(dir);
    }
    if let Some(days_before) = args.days_before {
        config.days_before = days_before;
    }
    if let Some(sample_cap) = args.sample_cap {
        config.sample_cap = sample_cap;
    }
    config.validate()?;

    let base_dir = config
        .log_dir
        .clone()
        .context("No log directory configured; pass --dir or set log_dir in the config file")?;
    let date = resolve_target_date(args.date, config.days_before, Local::now().date_naive());
    tracing::info!("Building report for {date} from {}", base_dir.display());

    let outcome = run(date, &base_dir, config.run_options()).inspect_err(|e| {
        if let RunError::NoUsableInput { failures, .. } = e {
            for failure in failures {
                tracing::error!("{}: {}", failure.path.display(), failure.message);
            }
        }
    })?;

    if outcome.status == RunStatus::NoMatchingFiles && args.skip_empty {
        tracing::info!("Nothing to report for {date}, skipping output");
        return Ok(());
    }

    let report = match args.format {
        OutputFormat::Html => {
            let template = match &config.template {
                Some(path) => Some(std::fs::read_to_string(path).with_context(|| {
                    format!("Failed to read template {}", path.display())
                })?),
                None => None,
            };
            let mut renderer = HtmlRenderer::new().with_inventory(&config.inventory);
            if let Some(template) = template {
                renderer = renderer.with_template(template);
            }
            renderer.render(&outcome)
        }
        OutputFormat::Json => serde_json::to_string_pretty(&outcome)?,
    };

    write_report(args.output.as_deref(), &report)?;
    tracing::info!("{} written", report_subject(date));
    Ok(())
}

fn write_report(output: Option<&Path>, report: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => std::fs::write(path, report)
            .with_context(|| format!("Failed to write report to {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(report.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}
