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

//! Daily digest of network device syslog files.
//!
//! [`core::run`] selects the files of one date, parses every line with
//! [`parser::parse_line`], groups the records per device, level and message
//! code, and returns a [`core::ReportTable`] that [`render::HtmlRenderer`]
//! turns into a mail body.

pub mod config;
pub mod core;
pub mod parser;
pub mod render;
