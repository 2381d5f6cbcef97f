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

//! Report table data types and construction.

use crate::core::aggregator::AggregationEntry;
use chrono::NaiveDate;
use serde::Serialize;

/// Separator between the sample messages of a row
pub const SAMPLE_SEPARATOR: &str = "; ";

/// Default limit for the joined sample messages of a row, in characters
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 300;

const ELLIPSIS: char = '…';

/// Address shown for records that never got a source attached
const UNKNOWN_SOURCE: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableOptions {
    pub max_message_chars: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
        }
    }
}

/// One summary row; the column order of the rendered table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub source_ip: String,
    pub level: String,
    pub code: String,
    pub count: usize,
    pub messages: String,
}

/// Values for the template's summary placeholders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportHeader {
    pub date: NaiveDate,
    pub total_records: usize,
    pub distinct_keys: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportTable {
    pub header: ReportHeader,
    pub rows: Vec<ReportRow>,
}

impl ReportTable {
    /// Table with no rows for `date`
    #[must_use]
    pub const fn empty(date: NaiveDate) -> Self {
        Self {
            header: ReportHeader {
                date,
                total_records: 0,
                distinct_keys: 0,
            },
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows_for<'a>(&'a self, source_ip: &'a str) -> impl Iterator<Item = &'a ReportRow> {
        self.rows.iter().filter(move |row| row.source_ip == source_ip)
    }
}

/// Turn a sorted aggregation snapshot into the report table.
///
/// Rows keep the order of `entries`.
#[must_use]
pub fn build_table(
    entries: &[AggregationEntry],
    date: NaiveDate,
    options: TableOptions,
) -> ReportTable {
    let rows: Vec<ReportRow> = entries
        .iter()
        .map(|entry| ReportRow {
            source_ip: entry
                .key
                .source_ip
                .map_or_else(|| UNKNOWN_SOURCE.to_string(), |ip| ip.to_string()),
            level: entry.key.level.clone(),
            code: entry.key.code.clone(),
            count: entry.count,
            messages: truncate_chars(
                &entry.sample_messages.join(SAMPLE_SEPARATOR),
                options.max_message_chars,
            ),
        })
        .collect();

    ReportTable {
        header: ReportHeader {
            date,
            total_records: entries.iter().map(|entry| entry.count).sum(),
            distinct_keys: entries.len(),
        },
        rows,
    }
}

/// Cut `text` to at most `max_chars` characters, marking the cut with an ellipsis
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push(ELLIPSIS);
    cut
}
