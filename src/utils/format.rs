// Ethminer Exporter - Free and Open Source Software Statement
//
// This project, ethminer-exporter, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/utils/format.rs
// Version: 1.0.1
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file provides formatting helpers for rig statistics in log output,
// located in the utils subdirectory.
//
// Tree Location:
// - src/utils/format.rs (formatting utilities)
// - Depends on: std

use std::time::Duration;

/// Utility functions for formatting rig statistics
pub struct FormatUtils;

impl FormatUtils {
    /// Format a rig-reported hashrate (whole H/s) in the largest fitting unit
    pub fn format_hashrate(hashes_per_sec: u64) -> String {
        const UNITS: [(u64, &str); 4] = [
            (1_000_000_000_000, "TH/s"),
            (1_000_000_000, "GH/s"),
            (1_000_000, "MH/s"),
            (1_000, "KH/s"),
        ];
        UNITS
            .iter()
            .find(|(scale, _)| hashes_per_sec >= *scale)
            .map(|(scale, unit)| format!("{:.2} {}", hashes_per_sec as f64 / *scale as f64, unit))
            .unwrap_or_else(|| format!("{} H/s", hashes_per_sec))
    }

    /// Format an uptime as the two largest units (e.g. "3d 4h", "5m 12s")
    pub fn format_duration(duration: Duration) -> String {
        let secs = duration.as_secs();
        let (days, hours, mins) = (secs / 86_400, (secs % 86_400) / 3600, (secs % 3600) / 60);
        if days > 0 {
            format!("{}d {}h", days, hours)
        } else if hours > 0 {
            format!("{}h {}m", hours, mins)
        } else if mins > 0 {
            format!("{}m {}s", mins, secs % 60)
        } else {
            format!("{}s", secs)
        }
    }
}


// Changelog:
// - v1.0.1 (2025-07-21): Hashrates are whole H/s; added TH/s.
// - v1.0.0 (2025-07-02): Hashrate and uptime formatting for scrape logs.
