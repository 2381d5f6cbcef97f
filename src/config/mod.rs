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

use crate::core::aggregator::DEFAULT_SAMPLE_CAP;
use crate::core::report::{TableOptions, DEFAULT_MAX_MESSAGE_CHARS};
use crate::core::run::RunOptions;
use anyhow::{bail, Context};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

/// Report the logs of this many days ago unless a date is given
pub const DEFAULT_DAYS_BEFORE: u32 = 1;

/// User configuration, read from `config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Directory the syslog collector writes its daily files to
    pub log_dir: Option<PathBuf>,

    pub days_before: u32,

    /// Distinct example messages kept per report row
    pub sample_cap: usize,

    /// Length limit of a row's joined example messages
    pub max_message_chars: usize,

    /// HTML template replacing the built-in one
    pub template: Option<PathBuf>,

    /// Known devices, used to label report sections
    pub inventory: Inventory,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_dir: None,
            days_before: DEFAULT_DAYS_BEFORE,
            sample_cap: DEFAULT_SAMPLE_CAP,
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
            template: None,
            inventory: Inventory::default(),
        }
    }
}

/// Devices grouped by kind, e.g. "switch" or "router"
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Inventory {
    pub groups: Vec<DeviceGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceGroup {
    pub name: String,
    #[serde(default)]
    pub devices: Vec<Device>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Device {
    pub name: String,
    pub ip: Ipv4Addr,
}

impl Inventory {
    /// Group and device entry for `ip`
    #[must_use]
    pub fn find(&self, ip: Ipv4Addr) -> Option<(&DeviceGroup, &Device)> {
        self.groups.iter().find_map(|group| {
            group
                .devices
                .iter()
                .find(|device| device.ip == ip)
                .map(|device| (group, device))
        })
    }

    /// Every device with its group, in configuration order
    pub fn devices(&self) -> impl Iterator<Item = (&DeviceGroup, &Device)> {
        self.groups
            .iter()
            .flat_map(|group| group.devices.iter().map(move |device| (group, device)))
    }
}

impl Config {
    /// Get the path to the default config file
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|config_dir| config_dir.join("netsyslog").join("config.json"))
    }

    /// Load the config from `path`, or from the default location.
    ///
    /// An explicitly given file must exist; a missing default file yields
    /// the defaults.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid config JSON.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::config_path() {
                Some(path) if path.exists() => path,
                _ => {
                    tracing::info!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        tracing::info!("Loading config from {}", path.display());
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_json(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::info!(
            "Loaded config with {} inventory devices",
            config.inventory.devices().count()
        );
        Ok(config)
    }

    /// Parse a config from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or values of the wrong type.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check values the run relies on.
    ///
    /// # Errors
    ///
    /// Names the first invalid setting.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.sample_cap == 0 {
            bail!("sample_cap must be > 0");
        }
        if self.max_message_chars == 0 {
            bail!("max_message_chars must be > 0");
        }
        if let Some(dir) = &self.log_dir {
            if dir.as_os_str().is_empty() {
                bail!("log_dir must not be empty");
            }
        }
        Ok(())
    }

    #[must_use]
    pub const fn run_options(&self) -> RunOptions {
        RunOptions {
            sample_cap: self.sample_cap,
            table: TableOptions {
                max_message_chars: self.max_message_chars,
            },
        }
    }
}

/// Date to report on: `explicit` if given, else `days_before` days before `today`
#[must_use]
pub fn resolve_target_date(explicit: Option<NaiveDate>, days_before: u32, today: NaiveDate) -> NaiveDate {
    explicit.unwrap_or_else(|| {
        today
            .checked_sub_days(Days::new(days_before.into()))
            .unwrap_or(NaiveDate::MIN)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_defaults_from_empty_json() {
        let config = Config::from_json("{}").expect("valid json");
        assert_eq!(config, Config::default());
        assert_eq!(config.days_before, 1);
        assert_eq!(config.sample_cap, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config() {
        let json = r#"{
            "log_dir": "/var/log/net",
            "days_before": 2,
            "sample_cap": 5,
            "inventory": [
                {"name": "switch", "devices": [
                    {"name": "core-sw1", "ip": "10.0.0.1"},
                    {"name": "core-sw2", "ip": "10.0.0.2"}
                ]},
                {"name": "router", "devices": [{"name": "edge", "ip": "192.168.1.1"}]}
            ]
        }"#;
        let config = Config::from_json(json).expect("valid json");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/net")));
        assert_eq!(config.run_options().sample_cap, 5);
        assert_eq!(config.max_message_chars, DEFAULT_MAX_MESSAGE_CHARS);

        let (group, device) = config
            .inventory
            .find(Ipv4Addr::new(192, 168, 1, 1))
            .expect("device is listed");
        assert_eq!(group.name, "router");
        assert_eq!(device.name, "edge");
        assert!(config.inventory.find(Ipv4Addr::new(10, 0, 0, 3)).is_none());
        assert_eq!(config.inventory.devices().count(), 3);
    }

    #[test]
    fn test_invalid_config() {
        assert!(Config::from_json(r#"{"sample_cap": "three"}"#).is_err());
        assert!(Config::from_json(r#"{"inventory": [{"name": "x", "devices": [{"name": "d", "ip": "300.1.1.1"}]}]}"#).is_err());

        let config = Config {
            sample_cap: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"days_before": 7}"#).expect("write config");
        let config = Config::load(Some(&path)).expect("loads");
        assert_eq!(config.days_before, 7);

        assert!(Config::load(Some(&dir.path().join("missing.json"))).is_err());
    }

    #[test]
    fn test_resolve_target_date() {
        let today = date(2024, 3, 1);
        assert_eq!(resolve_target_date(None, 1, today), date(2024, 2, 29));
        assert_eq!(resolve_target_date(None, 0, today), today);
        assert_eq!(
            resolve_target_date(Some(date(2023, 1, 1)), 1, today),
            date(2023, 1, 1)
        );
    }
}
