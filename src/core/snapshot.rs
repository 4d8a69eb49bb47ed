// Ethminer Exporter - Free and Open Source Software Statement
//
// This project, ethminer-exporter, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/snapshot.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file defines the decoded state of a mining rig at one scrape instant,
// located in the core subdirectory. Snapshots are built fresh for every scrape
// and discarded once the metrics have been rendered.
//
// Tree Location:
// - src/core/snapshot.rs (per-scrape rig state)
// - Depends on: std

use std::fmt;

/// One network endpoint (host:port) believed to run a miner's local API
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target(String);

impl Target {
    /// Wrap an address that is already in host:port form
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Build a target from a bare host and a port, bracketing IPv6 literals
    pub fn from_host(host: &str, port: u16) -> Self {
        if host.contains(':') && !host.starts_with('[') {
            Self(format!("[{}]:{}", host, port))
        } else {
            Self(format!("{}:{}", host, port))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decoded `miner_getstatdetail` result for one rig
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RigSnapshot {
    /// Is the miner connected to its pool
    pub connected: bool,

    /// Pool connection URI
    pub pool_uri: String,

    /// Number of pool switches since start
    pub switch_count: i64,

    /// Seconds the miner process has been running
    pub started_runtime_secs: i64,

    /// Miner software version string
    pub software_version: String,

    /// Host name reported by the miner
    pub host_name: String,

    /// Current job difficulty
    pub difficulty: f64,

    /// Current DAG epoch
    pub epoch: i64,

    /// Rig-wide hashrate, hex-encoded H/s
    pub hashrate_hex: String,

    /// Devices in the order the miner reported them
    pub devices: Vec<DeviceSnapshot>,
}

/// One compute device managed by the miner
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceSnapshot {
    pub index: i64,
    pub bus_id: String,
    pub name: String,
    pub device_type: String,

    /// Mining strategy (e.g. "CUDA", "OpenCL")
    pub mode: String,

    /// Hex-encoded hashes per second
    pub hashrate_hex: String,

    pub shares: ShareCounts,
    pub sensors: SensorReadings,
    pub paused: bool,

    /// Why the device is paused; may be stale or empty when running
    pub pause_reason: String,
}

/// Share counters, in the miner's wire order: found, rejected, failed, age
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShareCounts {
    pub found: u64,
    pub rejected: u64,
    pub failed: u64,
    pub last_share_age_secs: u64,
}

/// Sensor readings, in the miner's wire order: temperature, fan, power
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorReadings {
    pub temperature_c: f64,
    pub fan_percent: f64,
    pub power_watts: f64,
}

/// Decode a hex hashrate ("0x1a" or "1a"). Anything unparsable counts as 0 H/s.
pub fn parse_hashrate(value: &str) -> u64 {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u64::from_str_radix(digits, 16).unwrap_or(0)
}

impl RigSnapshot {
    pub fn hashrate(&self) -> u64 {
        parse_hashrate(&self.hashrate_hex)
    }
}

impl DeviceSnapshot {
    pub fn hashrate(&self) -> u64 {
        parse_hashrate(&self.hashrate_hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hashrate() {
        assert_eq!(parse_hashrate("0x1a"), 26);
        assert_eq!(parse_hashrate("1a"), 26);
        assert_eq!(parse_hashrate("0X03a2b1c0"), 0x03a2b1c0);
        assert_eq!(parse_hashrate("not-hex"), 0);
        assert_eq!(parse_hashrate(""), 0);
        assert_eq!(parse_hashrate("0x"), 0);
    }

    #[test]
    fn test_target_from_host() {
        assert_eq!(Target::from_host("10.0.0.5", 3333).as_str(), "10.0.0.5:3333");
        assert_eq!(Target::from_host("fd00::2", 3333).as_str(), "[fd00::2]:3333");
        assert_eq!(Target::from_host("[fd00::2]", 3333).as_str(), "[fd00::2]:3333");
    }
}

// Changelog:
// - v1.1.0 (2025-07-14): Added Target::from_host for discovered container IPs.
//   - IPv6 literals are bracketed so the resulting address stays connectable.
// - v1.0.0 (2025-07-02): Initial snapshot types.
//   - Named share and sensor fields replace the miner's positional arrays;
//     the wire order is fixed in rig/messages.rs.
