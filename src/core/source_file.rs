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

//! Discovery of the per-day, per-device log files.
//!
//! The collector writes one file per device and day, named
//! `yyyy-mm-dd.xxx.xxx.xxx.xxx.txt` with zero-padded octets. Date and
//! device address come from the file name only, never from its content.

use chrono::NaiveDate;
use serde::Serialize;
use std::fs::{self, ReadDir};
use std::io;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

/// Extension of every log file
pub const FILE_EXTENSION: &str = "txt";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One device's log file for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    pub date: NaiveDate,
    pub source_ip: Ipv4Addr,
    pub path: PathBuf,
}

/// Why a directory entry is not a usable log file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum MismatchReason {
    #[error("name is not yyyy-mm-dd.xxx.xxx.xxx.xxx.txt")]
    Shape,
    #[error("invalid date {0:?}")]
    InvalidDate(String),
    #[error("octet {0:?} is not three digits")]
    OctetWidth(String),
    #[error("octet {0} is out of range")]
    OctetRange(u16),
    #[error("file name is not valid UTF-8")]
    NonUtf8,
}

/// A file in the log directory that was skipped because of its name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{file_name}: {reason}")]
pub struct FilenameMismatch {
    pub file_name: String,
    pub reason: MismatchReason,
}

/// The log directory itself cannot be used
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    #[error("log directory {} does not exist", path.display())]
    Missing { path: PathBuf },
    #[error("cannot read log directory {}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Split a log file name into its date and device address.
///
/// # Errors
///
/// Returns the first grammar violation found in the name.
pub fn parse_file_name(file_name: &str) -> Result<(NaiveDate, Ipv4Addr), MismatchReason> {
    let stem = file_name
        .strip_suffix(FILE_EXTENSION)
        .and_then(|s| s.strip_suffix('.'))
        .ok_or(MismatchReason::Shape)?;

    let parts: Vec<&str> = stem.split('.').collect();
    let [date, octets @ ..] = parts.as_slice() else {
        return Err(MismatchReason::Shape);
    };
    if octets.len() != 4 {
        return Err(MismatchReason::Shape);
    }

    let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
        .ok()
        .filter(|parsed| parsed.format(DATE_FORMAT).to_string() == *date)
        .ok_or_else(|| MismatchReason::InvalidDate((*date).to_string()))?;

    let mut ip = [0u8; 4];
    for (slot, octet) in ip.iter_mut().zip(octets) {
        *slot = parse_octet(octet)?;
    }

    Ok((date, Ipv4Addr::from(ip)))
}

fn parse_octet(octet: &str) -> Result<u8, MismatchReason> {
    if octet.len() != 3 || !octet.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MismatchReason::OctetWidth(octet.to_string()));
    }
    let value: u16 = octet
        .parse()
        .map_err(|_| MismatchReason::OctetWidth(octet.to_string()))?;
    u8::try_from(value).map_err(|_| MismatchReason::OctetRange(value))
}

/// Name the collector gives the log of `source_ip` on `date`
#[must_use]
pub fn format_file_name(date: NaiveDate, source_ip: Ipv4Addr) -> String {
    let [a, b, c, d] = source_ip.octets();
    format!(
        "{}.{a:03}.{b:03}.{c:03}.{d:03}.{FILE_EXTENSION}",
        date.format(DATE_FORMAT)
    )
}

/// Start enumerating the log files of `base_dir` written on `target_date`.
///
/// # Errors
///
/// Fails only when `base_dir` is missing or cannot be listed; problems with
/// individual entries are logged and skipped while iterating.
pub fn select_files(target_date: NaiveDate, base_dir: &Path) -> Result<SourceFiles, SelectError> {
    let entries = fs::read_dir(base_dir).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            SelectError::Missing {
                path: base_dir.to_path_buf(),
            }
        } else {
            SelectError::Unreadable {
                path: base_dir.to_path_buf(),
                source,
            }
        }
    })?;

    tracing::debug!("Scanning {} for logs of {target_date}", base_dir.display());

    Ok(SourceFiles {
        entries,
        target_date,
        mismatches: Vec::new(),
    })
}

/// Lazy sequence of the log files for one date, in directory order.
///
/// Any entry named for the date is yielded, even when it is not a readable
/// regular file, so that reading it fails and gets reported. Other regular
/// files whose name does not follow the file name grammar are collected as
/// [`FilenameMismatch`]es and can be taken once iteration is done.
#[derive(Debug)]
pub struct SourceFiles {
    entries: ReadDir,
    target_date: NaiveDate,
    mismatches: Vec<FilenameMismatch>,
}

impl SourceFiles {
    /// Files skipped because of their name
    #[must_use]
    pub fn into_mismatches(self) -> Vec<FilenameMismatch> {
        self.mismatches
    }
}

fn record_mismatch(mismatches: &mut Vec<FilenameMismatch>, file_name: String, reason: MismatchReason) {
    tracing::debug!("Ignoring {file_name:?}: {reason}");
    mismatches.push(FilenameMismatch { file_name, reason });
}

impl Iterator for SourceFiles {
    type Item = SourceFile;

    fn next(&mut self) -> Option<SourceFile> {
        for entry in self.entries.by_ref() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Cannot read directory entry: {e}");
                    continue;
                }
            };

            let path = entry.path();
            let Ok(file_name) = entry.file_name().into_string() else {
                if path.is_file() {
                    record_mismatch(
                        &mut self.mismatches,
                        entry.file_name().to_string_lossy().into_owned(),
                        MismatchReason::NonUtf8,
                    );
                }
                continue;
            };

            match parse_file_name(&file_name) {
                Ok((date, source_ip)) if date == self.target_date => {
                    if !path.is_file() {
                        tracing::warn!("{} is not a regular file", path.display());
                    }
                    return Some(SourceFile {
                        date,
                        source_ip,
                        path,
                    });
                }
                Ok(_) => {}
                // Subdirectories and other non-files are not log candidates
                Err(_) if !path.is_file() => {}
                Err(reason) => record_mismatch(&mut self.mismatches, file_name, reason),
            }
        }
        None
    }
}
