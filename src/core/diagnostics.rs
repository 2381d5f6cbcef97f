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

//! Everything a run skipped, returned next to the report table.

use crate::core::source_file::FilenameMismatch;
use crate::parser::FailureReason;
use serde::Serialize;
use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::path::PathBuf;

/// A line the parser rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineFailure {
    pub source_ip: Ipv4Addr,
    pub path: PathBuf,
    /// 1-based line number within the file
    pub line_number: usize,
    pub reason: FailureReason,
    pub raw_line: String,
}

/// A log file that could not be read to the end
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub source_ip: Ipv4Addr,
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub parse_failures: Vec<LineFailure>,
    pub skipped_files: Vec<FilenameMismatch>,
    pub io_failures: Vec<FileFailure>,
}

impl Diagnostics {
    /// Nothing was skipped
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.parse_failures.is_empty() && self.skipped_files.is_empty() && self.io_failures.is_empty()
    }

    #[must_use]
    pub fn count_by_reason(&self) -> BTreeMap<FailureReason, usize> {
        let mut counts = BTreeMap::new();
        for failure in &self.parse_failures {
            *counts.entry(failure.reason).or_insert(0) += 1;
        }
        counts
    }

    /// Rejected line counts per device and reason, ordered by address
    #[must_use]
    pub fn count_by_source(&self) -> BTreeMap<(Ipv4Addr, FailureReason), usize> {
        let mut counts = BTreeMap::new();
        for failure in &self.parse_failures {
            *counts.entry((failure.source_ip, failure.reason)).or_insert(0) += 1;
        }
        counts
    }

    /// Read failure for `source_ip`, if its file could not be read
    #[must_use]
    pub fn io_failure_for(&self, source_ip: Ipv4Addr) -> Option<&FileFailure> {
        self.io_failures
            .iter()
            .find(|failure| failure.source_ip == source_ip)
    }
}
