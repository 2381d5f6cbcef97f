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

//! HTML rendering of a run outcome, ready to be used as a mail body.
//!
//! Templates are plain HTML with the placeholders `{title}`, `{date}`,
//! `{total}`, `{distinct}` and `{body}`.

use crate::config::Inventory;
use crate::core::report::ReportRow;
use crate::core::run::{RunOutcome, RunStatus};
use crate::core::source_file::format_file_name;
use chrono::NaiveDate;
use std::borrow::Cow;
use std::fmt::Write as _;
use std::net::Ipv4Addr;

/// Template used when none is configured
pub const DEFAULT_TEMPLATE: &str = include_str!("template.html");

/// Mail subject for the report of `date`
#[must_use]
pub fn report_subject(date: NaiveDate) -> String {
    format!("net_syslog for {date}")
}

/// Escape text for use in HTML element content and attribute values
#[must_use]
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub struct HtmlRenderer<'a> {
    template: Cow<'a, str>,
    inventory: Option<&'a Inventory>,
}

impl Default for HtmlRenderer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> HtmlRenderer<'a> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            template: Cow::Borrowed(DEFAULT_TEMPLATE),
            inventory: None,
        }
    }

    #[must_use]
    pub fn with_template(mut self, template: impl Into<Cow<'a, str>>) -> Self {
        self.template = template.into();
        self
    }

    /// Label sections with device names and list devices without a log
    #[must_use]
    pub const fn with_inventory(mut self, inventory: &'a Inventory) -> Self {
        self.inventory = Some(inventory);
        self
    }

    #[must_use]
    pub fn render(&self, outcome: &RunOutcome) -> String {
        let header = &outcome.table.header;
        self.template
            .replace("{title}", &escape(&report_subject(header.date)))
            .replace("{date}", &header.date.to_string())
            .replace("{total}", &header.total_records.to_string())
            .replace("{distinct}", &header.distinct_keys.to_string())
            .replace("{body}", &self.render_body(outcome))
    }

    fn render_body(&self, outcome: &RunOutcome) -> String {
        let date = outcome.date();
        let mut body = String::new();

        if outcome.status == RunStatus::NoMatchingFiles {
            let _ = writeln!(body, "<p>No syslog files found for {date}.</p>");
        }

        for source in &outcome.sources {
            let ip = source.source_ip.to_string();
            let _ = writeln!(body, "<p>{}:</p>", escape(&self.label(source.source_ip)));

            let rows: Vec<&ReportRow> = outcome.table.rows_for(&ip).collect();
            if rows.is_empty() {
                body.push_str("<p>No parsable messages.</p>\n");
            } else {
                body.push_str(&render_rows(&rows));
            }
        }

        for failure in &outcome.diagnostics.io_failures {
            let _ = writeln!(
                body,
                "<p>{}: logfile {} could not be read: {}</p>",
                escape(&self.label(failure.source_ip)),
                escape(&format_file_name(date, failure.source_ip)),
                escape(&failure.message)
            );
        }

        if let Some(inventory) = self.inventory {
            for (_, device) in inventory.devices() {
                if outcome.has_source(device.ip)
                    || outcome.diagnostics.io_failure_for(device.ip).is_some()
                {
                    continue;
                }
                let _ = writeln!(
                    body,
                    "<p>{}: logfile {} for {date} not found</p>",
                    escape(&self.label(device.ip)),
                    escape(&format_file_name(date, device.ip))
                );
            }
        }

        let rejected = outcome.diagnostics.count_by_source();
        if !rejected.is_empty() {
            body.push_str("<h3>Rejected lines</h3>\n<table>\n");
            body.push_str("<tr><th>source</th><th>reason</th><th>lines</th></tr>\n");
            for ((ip, reason), count) in rejected {
                let _ = writeln!(
                    body,
                    "<tr><td>{}</td><td>{}</td><td>{count}</td></tr>",
                    escape(&self.label(ip)),
                    reason.label()
                );
            }
            body.push_str("</table>\n");
        }

        let skipped = outcome.diagnostics.skipped_files.len();
        if skipped > 0 {
            let _ = writeln!(
                body,
                "<p>{skipped} files in the log directory were ignored because of their names.</p>"
            );
        }

        body
    }

    /// `group device (ip)` for inventory devices, the bare address otherwise
    fn label(&self, ip: Ipv4Addr) -> String {
        self.inventory
            .and_then(|inventory| inventory.find(ip))
            .map_or_else(
                || ip.to_string(),
                |(group, device)| format!("{} {} ({ip})", group.name, device.name),
            )
    }
}

fn render_rows(rows: &[&ReportRow]) -> String {
    let mut table = String::from("<table>\n<tr><th>count</th><th>level</th><th>code</th><th>messages</th></tr>\n");
    for row in rows {
        let _ = writeln!(
            table,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            row.count,
            escape(&row.level),
            escape(&row.code),
            escape(&row.messages)
        );
    }
    table.push_str("</table>\n");
    table
}
