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

//! Line grammar of the syslog collector's daily files.
//!
//! Every line is `timestamp<TAB>facility.severity<TAB>host<TAB>message`.
//! The message field carries the device's message code, `%FAC-n-n: text`,
//! either at its very start or after the preamble some devices emit
//! (sequence number, device clock). With tabs shown as `<TAB>`:
//!
//! ```text
//! 2024-03-01 10:00:00<TAB>local.err<TAB>10.20.30.40<TAB>812: *Mar  1 10:00:00: %SEC-3-4: list 101 denied
//! ```

use super::record::{FailureReason, LogRecord, ParseFailure};
use fancy_regex::Regex;
use std::sync::LazyLock;

/// Separator between the fields of a line
pub const FIELD_DELIMITER: char = '\t';

/// Index of the `facility.severity` field
pub const LEVEL_FIELD: usize = 1;

/// The message field is whatever follows the host field, tabs included
const MAX_FIELDS: usize = 4;

static LEVEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]+\.[A-Za-z]+$").expect("valid regex literal")
});

// Code at field start or after whitespace, then ": " and the message text.
// A code followed by anything but ": " does not match at all.
static CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(%[A-Za-z]+-\d+-\d+):(?: (.*))?$").expect("valid regex literal")
});

/// Parse one line into a [`LogRecord`].
///
/// The line terminator is ignored. The returned record has no source
/// address yet; see [`LogRecord::with_source`].
///
/// # Errors
///
/// Returns a [`ParseFailure`] when the line does not match the grammar.
pub fn parse_line(raw_line: &str) -> Result<LogRecord, ParseFailure> {
    let line = raw_line.trim_end_matches(['\r', '\n']);
    let fail = |reason| ParseFailure {
        reason,
        raw_line: line.to_string(),
    };

    let fields: Vec<&str> = line.splitn(MAX_FIELDS, FIELD_DELIMITER).collect();

    let level = fields
        .get(LEVEL_FIELD)
        .copied()
        .map(str::trim)
        .filter(|field| LEVEL.is_match(field).unwrap_or(false))
        .ok_or_else(|| fail(FailureReason::MissingLevel))?;

    if fields.len() <= LEVEL_FIELD + 1 {
        return Err(fail(FailureReason::MissingMessage));
    }
    let message_field = fields[fields.len() - 1];

    let caps = CODE
        .captures(message_field)
        .ok()
        .flatten()
        .ok_or_else(|| fail(FailureReason::MalformedCode))?;

    let code = caps.get(1).map_or("", |m| m.as_str());
    let message = caps.get(2).map_or("", |m| m.as_str()).trim_end();
    if message.trim_start().is_empty() {
        return Err(fail(FailureReason::MissingMessage));
    }

    Ok(LogRecord {
        source_ip: None,
        level: level.to_string(),
        code: code.to_string(),
        message: message.to_string(),
        raw_line: line.to_string(),
    })
}
