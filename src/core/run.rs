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

//! One report run: select the files of a date, parse and aggregate their
//! lines, and build the report table.

use crate::core::aggregator::{Aggregator, DEFAULT_SAMPLE_CAP};
use crate::core::diagnostics::{Diagnostics, FileFailure, LineFailure};
use crate::core::report::{build_table, ReportTable, TableOptions};
use crate::core::source_file::{select_files, SelectError, SourceFile};
use crate::parser::{parse_line, LogRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::net::Ipv4Addr;
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub sample_cap: usize,
    pub table: TableOptions,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            sample_cap: DEFAULT_SAMPLE_CAP,
            table: TableOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    /// Every selected file was read
    Complete,
    /// Some selected files could not be read; see [`Diagnostics::io_failures`]
    Partial,
    /// No file in the directory is named for the requested date
    NoMatchingFiles,
}

impl RunStatus {
    /// Status for a run that read `read` files and failed on `failed`.
    /// `None` means files were found but none of them could be used.
    const fn classify(read: usize, failed: usize) -> Option<Self> {
        match (read, failed) {
            (0, 0) => Some(Self::NoMatchingFiles),
            (0, _) => None,
            (_, 0) => Some(Self::Complete),
            _ => Some(Self::Partial),
        }
    }
}

/// Result of a run handed to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub table: ReportTable,
    pub diagnostics: Diagnostics,
    /// Files that were read, ordered by address
    pub sources: Vec<SourceFile>,
}

impl RunOutcome {
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.table.header.date
    }

    #[must_use]
    pub fn has_source(&self, source_ip: Ipv4Addr) -> bool {
        self.sources.iter().any(|source| source.source_ip == source_ip)
    }
}

/// Failures that stop a run as a whole
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Select(#[from] SelectError),
    #[error("none of the {} log files for {date} could be read", failures.len())]
    NoUsableInput {
        date: NaiveDate,
        failures: Vec<FileFailure>,
    },
}

/// Records and rejected lines of one completely read file
#[derive(Debug, Default)]
pub struct FileScan {
    pub records: Vec<LogRecord>,
    pub failures: Vec<LineFailure>,
}

/// Read `source` line by line.
///
/// The file is closed before this returns, on every path.
///
/// # Errors
///
/// Returns the I/O error that stopped reading; nothing read before it is kept.
pub fn scan_file(source: &SourceFile) -> io::Result<FileScan> {
    let file = File::open(&source.path)?;
    scan_reader(BufReader::new(file), source)
}

/// Parse every line of `reader`, tagging records with `source`'s address.
/// Invalid UTF-8 is replaced rather than rejected; blank lines are ignored.
///
/// # Errors
///
/// Returns the first I/O error of `reader`.
pub fn scan_reader<R: BufRead>(mut reader: R, source: &SourceFile) -> io::Result<FileScan> {
    let mut scan = FileScan::default();
    let mut buffer = Vec::new();
    let mut line_number = 0;

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        line_number += 1;

        let line = String::from_utf8_lossy(&buffer);
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(&line) {
            Ok(record) => scan.records.push(record.with_source(source.source_ip)),
            Err(failure) => {
                tracing::debug!(
                    "{}:{line_number}: {}",
                    source.path.display(),
                    failure.reason
                );
                scan.failures.push(LineFailure {
                    source_ip: source.source_ip,
                    path: source.path.clone(),
                    line_number,
                    reason: failure.reason,
                    raw_line: failure.raw_line,
                });
            }
        }
    }

    Ok(scan)
}

/// Build the report for `target_date` from the log files in `base_dir`.
///
/// Bad lines, badly named files and unreadable files are recorded in the
/// outcome's diagnostics and do not stop the run.
///
/// # Errors
///
/// Fails when `base_dir` cannot be listed, or when files for the date exist
/// but none of them could be read.
pub fn run(target_date: NaiveDate, base_dir: &Path, options: RunOptions) -> Result<RunOutcome, RunError> {
    let start_time = Instant::now();
    let mut files = select_files(target_date, base_dir)?;
    let mut aggregator = Aggregator::new(options.sample_cap);
    let mut diagnostics = Diagnostics::default();
    let mut sources = Vec::new();

    for source in files.by_ref() {
        match scan_file(&source) {
            Ok(scan) => {
                tracing::info!(
                    "Read {}: {} records, {} rejected lines",
                    source.path.display(),
                    scan.records.len(),
                    scan.failures.len()
                );
                for record in scan.records {
                    aggregator.ingest(record);
                }
                diagnostics.parse_failures.extend(scan.failures);
                sources.push(source);
            }
            Err(e) => {
                tracing::warn!("Cannot read {}: {e}", source.path.display());
                diagnostics.io_failures.push(FileFailure {
                    source_ip: source.source_ip,
                    path: source.path,
                    message: e.to_string(),
                });
            }
        }
    }
    diagnostics.skipped_files = files.into_mismatches();

    diagnostics.io_failures.sort_by_key(|failure| failure.source_ip);
    let Some(status) = RunStatus::classify(sources.len(), diagnostics.io_failures.len()) else {
        return Err(RunError::NoUsableInput {
            date: target_date,
            failures: diagnostics.io_failures,
        });
    };

    sources.sort_by_key(|source| source.source_ip);
    diagnostics
        .parse_failures
        .sort_by_key(|failure| (failure.source_ip, failure.line_number));

    tracing::debug!(
        "Aggregated {} records into {} groups",
        aggregator.total_records(),
        aggregator.distinct_keys()
    );
    let table = build_table(&aggregator.snapshot(), target_date, options.table);

    match status {
        RunStatus::NoMatchingFiles => {
            tracing::warn!("No log files for {target_date} in {}", base_dir.display());
        }
        RunStatus::Complete | RunStatus::Partial if table.is_empty() => {
            tracing::warn!("No parsable lines in {} log files for {target_date}", sources.len());
        }
        RunStatus::Complete | RunStatus::Partial => {}
    }
    if diagnostics.is_clean() {
        tracing::debug!("Every line of every log file for {target_date} was accepted");
    }
    for (reason, count) in diagnostics.count_by_reason() {
        tracing::info!("{count} lines rejected: {reason}");
    }
    tracing::info!(
        "Report for {target_date}: {} files, {} records in {} groups, {} rejected lines, {} skipped files, {} unreadable files, took {:?}",
        sources.len(),
        table.header.total_records,
        table.header.distinct_keys,
        diagnostics.parse_failures.len(),
        diagnostics.skipped_files.len(),
        diagnostics.io_failures.len(),
        start_time.elapsed()
    );

    Ok(RunOutcome {
        status,
        table,
        diagnostics,
        sources,
    })
}
