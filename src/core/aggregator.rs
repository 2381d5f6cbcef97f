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

//! Grouping of parsed records into one summary entry per
//! (device, level, code).

use crate::parser::LogRecord;
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::Serialize;
use std::net::Ipv4Addr;

/// Number of distinct example messages kept per entry
pub const DEFAULT_SAMPLE_CAP: usize = 3;

/// Identifies one summary row.
///
/// The derived ordering compares the address numerically octet by octet,
/// so `10.0.0.9` sorts before `10.0.0.10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AggregationKey {
    pub source_ip: Option<Ipv4Addr>,
    pub level: String,
    pub code: String,
}

impl AggregationKey {
    fn of(record: &LogRecord) -> Self {
        Self {
            source_ip: record.source_ip,
            level: record.level.clone(),
            code: record.code.clone(),
        }
    }
}

/// Count and example messages for one key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregationEntry {
    pub key: AggregationKey,
    pub count: usize,
    /// Distinct messages in the order they were first seen
    pub sample_messages: Vec<String>,
}

impl AggregationEntry {
    fn new(key: AggregationKey, message: String) -> Self {
        Self {
            key,
            count: 1,
            sample_messages: vec![message],
        }
    }

    fn record(&mut self, message: String, sample_cap: usize) {
        self.count += 1;
        if self.sample_messages.len() < sample_cap && !self.sample_messages.contains(&message) {
            self.sample_messages.push(message);
        }
    }
}

/// Accumulates the records of one run.
///
/// Entries live in an insertion-ordered map, so first-seen order is what
/// breaks ties when sorting a snapshot.
#[derive(Debug, Clone)]
pub struct Aggregator {
    entries: IndexMap<AggregationKey, AggregationEntry>,
    sample_cap: usize,
    total_records: usize,
}

impl Aggregator {
    /// Create an aggregator keeping up to `sample_cap` messages per key.
    /// A cap of zero is raised to one.
    #[must_use]
    pub fn new(sample_cap: usize) -> Self {
        Self {
            entries: IndexMap::new(),
            sample_cap: sample_cap.max(1),
            total_records: 0,
        }
    }

    pub fn ingest(&mut self, record: LogRecord) {
        self.total_records += 1;
        match self.entries.entry(AggregationKey::of(&record)) {
            Entry::Occupied(mut occupied) => {
                occupied.get_mut().record(record.message, self.sample_cap);
            }
            Entry::Vacant(vacant) => {
                let key = vacant.key().clone();
                vacant.insert(AggregationEntry::new(key, record.message));
            }
        }
    }

    /// All entries sorted by address, level, code, then first-seen order
    #[must_use]
    pub fn snapshot(&self) -> Vec<AggregationEntry> {
        let mut entries: Vec<AggregationEntry> = self.entries.values().cloned().collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries
    }

    /// Number of distinct keys
    #[must_use]
    pub fn distinct_keys(&self) -> usize {
        self.entries.len()
    }

    /// Number of records ingested so far
    #[must_use]
    pub const fn total_records(&self) -> usize {
        self.total_records
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_CAP)
    }
}
