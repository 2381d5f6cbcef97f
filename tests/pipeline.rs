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

use chrono::NaiveDate;
use netsyslog::config::Config;
use netsyslog::core::source_file::format_file_name;
use netsyslog::core::{run, RunError, RunOptions, RunStatus};
use netsyslog::parser::FailureReason;
use netsyslog::render::HtmlRenderer;
use std::net::Ipv4Addr;
use std::path::Path;
use tempfile::TempDir;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")
}

fn line(level: &str, code: &str, message: &str) -> String {
    format!("2024-03-01 10:00:00\t{level}\t10.20.30.40\t{code}: {message}\n")
}

fn write_log(dir: &Path, day: NaiveDate, ip: Ipv4Addr, lines: &[String]) {
    std::fs::write(dir.join(format_file_name(day, ip)), lines.concat()).expect("write log file");
}

fn log_dir() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

#[test]
fn two_files_same_date() {
    let dir = log_dir();
    let ip1 = Ipv4Addr::new(10, 0, 0, 2);
    let ip2 = Ipv4Addr::new(10, 0, 0, 10);
    write_log(
        dir.path(),
        date(),
        ip1,
        &[
            line("local.err", "%SEC-3-4", "denied 1"),
            line("local.err", "%SEC-3-4", "denied 2"),
            line("local.err", "%SEC-3-4", "denied 1"),
        ],
    );
    write_log(dir.path(), date(), ip2, &[line("local.info", "%SYS-6-1", "up")]);

    let outcome = run(date(), dir.path(), RunOptions::default()).expect("run succeeds");
    assert_eq!(outcome.status, RunStatus::Complete);

    let table = &outcome.table;
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].source_ip, "10.0.0.2");
    assert_eq!(table.rows[0].level, "local.err");
    assert_eq!(table.rows[0].code, "%SEC-3-4");
    assert_eq!(table.rows[0].count, 3);
    assert_eq!(table.rows[0].messages, "denied 1; denied 2");
    assert_eq!(table.rows[1].source_ip, "10.0.0.10");
    assert_eq!(table.rows[1].count, 1);
    assert_eq!(table.header.total_records, 4);
    assert_eq!(table.header.distinct_keys, 2);
    assert_eq!(table.header.date, date());

    let sources: Vec<Ipv4Addr> = outcome.sources.iter().map(|s| s.source_ip).collect();
    assert_eq!(sources, [ip1, ip2]);
    assert!(outcome.diagnostics.is_clean());
}

#[test]
fn malformed_lines_do_not_abort() {
    let dir = log_dir();
    let ip = Ipv4Addr::new(10, 20, 30, 40);
    let mut lines: Vec<String> = (0..5)
        .map(|i| line("local.warn", "%LINK-3-5", &format!("flap {i}")))
        .collect();
    lines.insert(2, "2024-03-01 10:00:00\tnot-a-level\t10.20.30.40\t%LINK-3-5: x\n".to_string());
    lines.push(line("local.warn", "%LINK-X-5", "bad code"));
    write_log(dir.path(), date(), ip, &lines);

    let outcome = run(date(), dir.path(), RunOptions::default()).expect("run succeeds");
    assert_eq!(outcome.table.header.total_records, 5);
    assert_eq!(outcome.table.rows.len(), 1);
    assert_eq!(outcome.table.rows[0].messages, "flap 0; flap 1; flap 2");

    let failures = &outcome.diagnostics.parse_failures;
    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0].reason, FailureReason::MissingLevel);
    assert_eq!(failures[0].line_number, 3);
    assert_eq!(failures[1].reason, FailureReason::MalformedCode);
    assert_eq!(failures[1].line_number, 7);
    assert!(failures.iter().all(|f| f.source_ip == ip));
}

#[test]
fn no_matching_files() {
    let dir = log_dir();
    write_log(
        dir.path(),
        NaiveDate::from_ymd_opt(2024, 2, 29).expect("valid date"),
        Ipv4Addr::new(10, 0, 0, 1),
        &[line("local.err", "%SEC-3-4", "yesterday")],
    );

    let outcome = run(date(), dir.path(), RunOptions::default()).expect("run succeeds");
    assert_eq!(outcome.status, RunStatus::NoMatchingFiles);
    assert!(outcome.table.is_empty());
    assert_eq!(outcome.table.header.total_records, 0);
    assert!(outcome.sources.is_empty());
    assert!(outcome.diagnostics.skipped_files.is_empty());
}

#[test]
fn badly_named_files_are_skipped() {
    let dir = log_dir();
    write_log(
        dir.path(),
        date(),
        Ipv4Addr::new(10, 0, 0, 1),
        &[line("local.err", "%SEC-3-4", "kept")],
    );
    std::fs::write(
        dir.path().join("2024-03-01.010.000.000.256.txt"),
        line("local.err", "%SEC-3-4", "ignored"),
    )
    .expect("write file");
    std::fs::write(dir.path().join("2024-03-01.10.0.0.2.txt"), "").expect("write file");

    let outcome = run(date(), dir.path(), RunOptions::default()).expect("run succeeds");
    assert_eq!(outcome.table.header.total_records, 1);
    assert_eq!(outcome.diagnostics.skipped_files.len(), 2);
}

#[test]
fn missing_base_dir_fails_the_run() {
    let dir = log_dir();
    let err = run(date(), &dir.path().join("gone"), RunOptions::default())
        .expect_err("directory is missing");
    assert!(matches!(err, RunError::Select(_)));
}

#[cfg(unix)]
#[test]
fn dangling_log_file_is_reported_and_skipped() {
    let dir = log_dir();
    write_log(
        dir.path(),
        date(),
        Ipv4Addr::new(10, 0, 0, 2),
        &[line("local.err", "%SEC-3-4", "still counted")],
    );
    std::os::unix::fs::symlink(
        dir.path().join("gone"),
        dir.path().join(format_file_name(date(), Ipv4Addr::new(10, 0, 0, 1))),
    )
    .expect("create symlink");

    let outcome = run(date(), dir.path(), RunOptions::default()).expect("run succeeds");
    assert_eq!(outcome.status, RunStatus::Partial);
    assert_eq!(outcome.table.header.total_records, 1);
    assert_eq!(outcome.table.rows[0].messages, "still counted");

    let failures = &outcome.diagnostics.io_failures;
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].source_ip, Ipv4Addr::new(10, 0, 0, 1));
    assert!(!outcome.has_source(Ipv4Addr::new(10, 0, 0, 1)));
    assert!(outcome.diagnostics.skipped_files.is_empty());

    let html = HtmlRenderer::new().render(&outcome);
    assert!(html.contains("<p>10.0.0.1: logfile 2024-03-01.010.000.000.001.txt could not be read: "));
}

#[test]
fn directory_named_like_a_log_is_an_io_failure() {
    let dir = log_dir();
    write_log(
        dir.path(),
        date(),
        Ipv4Addr::new(10, 0, 0, 1),
        &[line("local.err", "%SEC-3-4", "denied")],
    );
    std::fs::create_dir(dir.path().join(format_file_name(date(), Ipv4Addr::new(10, 0, 0, 3))))
        .expect("create dir");

    let outcome = run(date(), dir.path(), RunOptions::default()).expect("run succeeds");
    assert_eq!(outcome.status, RunStatus::Partial);
    assert_eq!(outcome.table.header.total_records, 1);
    assert_eq!(outcome.diagnostics.io_failures.len(), 1);
    assert_eq!(outcome.diagnostics.io_failures[0].source_ip, Ipv4Addr::new(10, 0, 0, 3));
}

#[test]
fn no_readable_file_fails_the_run() {
    let dir = log_dir();
    for last in [7, 5] {
        std::fs::create_dir(dir.path().join(format_file_name(date(), Ipv4Addr::new(10, 0, 0, last))))
            .expect("create dir");
    }

    let err = run(date(), dir.path(), RunOptions::default()).expect_err("nothing is readable");
    let ips: Vec<Ipv4Addr> = match &err {
        RunError::NoUsableInput { date: failed_date, failures } if *failed_date == date() => {
            failures.iter().map(|f| f.source_ip).collect()
        }
        RunError::NoUsableInput { .. } | RunError::Select(_) => Vec::new(),
    };
    assert_eq!(ips, [Ipv4Addr::new(10, 0, 0, 5), Ipv4Addr::new(10, 0, 0, 7)]);
    assert_eq!(err.to_string(), "none of the 2 log files for 2024-03-01 could be read");
}

#[test]
fn sample_cap_option_is_honoured() {
    let dir = log_dir();
    let lines: Vec<String> = ["a", "b", "c", "d"]
        .iter()
        .map(|m| line("local.err", "%SEC-3-4", m))
        .collect();
    write_log(dir.path(), date(), Ipv4Addr::new(10, 0, 0, 1), &lines);

    let options = RunOptions {
        sample_cap: 2,
        ..RunOptions::default()
    };
    let outcome = run(date(), dir.path(), options).expect("run succeeds");
    assert_eq!(outcome.table.rows[0].count, 4);
    assert_eq!(outcome.table.rows[0].messages, "a; b");
}

#[test]
fn renders_html_with_inventory() {
    let dir = log_dir();
    write_log(
        dir.path(),
        date(),
        Ipv4Addr::new(10, 0, 0, 1),
        &[line("local.err", "%SEC-3-4", "denied <acl>"), "junk\n".to_string()],
    );
    let config = Config::from_json(
        r#"{"inventory": [{"name": "switch", "devices": [
            {"name": "sw1", "ip": "10.0.0.1"},
            {"name": "sw2", "ip": "10.0.0.2"}
        ]}]}"#,
    )
    .expect("valid config");

    let outcome = run(date(), dir.path(), config.run_options()).expect("run succeeds");
    let html = HtmlRenderer::new()
        .with_inventory(&config.inventory)
        .render(&outcome);

    assert!(html.contains("<p>switch sw1 (10.0.0.1):</p>"));
    assert!(html.contains("denied &lt;acl&gt;"));
    assert!(html.contains("switch sw2 (10.0.0.2): logfile 2024-03-01.010.000.000.002.txt for 2024-03-01 not found"));
    assert!(html.contains("<td>MissingLevel</td><td>1</td>"));
}

#[test]
fn outcome_serializes_to_json() {
    let dir = log_dir();
    write_log(
        dir.path(),
        date(),
        Ipv4Addr::new(10, 0, 0, 1),
        &[line("local.err", "%SEC-3-4", "denied")],
    );
    let outcome = run(date(), dir.path(), RunOptions::default()).expect("run succeeds");

    let json: serde_json::Value = serde_json::to_value(&outcome).expect("serializable");
    assert_eq!(json["status"], "Complete");
    assert_eq!(json["table"]["header"]["date"], "2024-03-01");
    assert_eq!(json["table"]["rows"][0]["code"], "%SEC-3-4");
    assert_eq!(json["table"]["rows"][0]["count"], 1);
}
