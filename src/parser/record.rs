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

use serde::Serialize;
use std::net::Ipv4Addr;

/// A syslog line that matched the full line grammar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    /// Device the line came from. The parser never sets this; it is taken
    /// from the name of the file the line was read from.
    pub source_ip: Option<Ipv4Addr>,
    /// `facility.severity`, e.g. `local.err`
    pub level: String,
    /// Vendor message code, e.g. `%SEC-3-4`
    pub code: String,
    pub message: String,
    pub raw_line: String,
}

impl LogRecord {
    /// Attach the device address taken from the source file name
    #[must_use]
    pub const fn with_source(mut self, source_ip: Ipv4Addr) -> Self {
        self.source_ip = Some(source_ip);
        self
    }
}

/// Why a line was rejected by the parser
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, thiserror::Error,
)]
pub enum FailureReason {
    #[error("missing or malformed level")]
    MissingLevel,
    #[error("malformed message code")]
    MalformedCode,
    #[error("missing message text")]
    MissingMessage,
}

impl FailureReason {
    /// Short name used in report tables
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MissingLevel => "MissingLevel",
            Self::MalformedCode => "MalformedCode",
            Self::MissingMessage => "MissingMessage",
        }
    }
}

/// A rejected line together with the reason it was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}: {raw_line:?}")]
pub struct ParseFailure {
    pub reason: FailureReason,
    pub raw_line: String,
}
