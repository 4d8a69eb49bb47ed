// Ethminer Exporter - Free and Open Source Software Statement
//
// This project, ethminer-exporter, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/metrics/mapper.rs
// Version: 1.0.3
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file maps a decoded rig snapshot onto the exported metric set, located
// in the metrics subdirectory. It owns the metric descriptors (name, help,
// kind) and the label derivation rules for devices.
//
// Tree Location:
// - src/metrics/mapper.rs (snapshot to labeled samples)
// - Depends on: regex, crate::core::snapshot

use crate::core::snapshot::{DeviceSnapshot, RigSnapshot, Target};
use regex::Regex;
use std::sync::LazyLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Prefix shared by every exported metric
pub const NAMESPACE: &str = "ethminer_";

/// Exposition type of a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    Counter,
}

/// Static description of one exported metric
#[derive(Debug, PartialEq, Eq)]
pub struct MetricDescriptor {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
}

// Global
pub static STARTED_TIMESTAMP: MetricDescriptor = MetricDescriptor {
    name: "ethminer_started_timestamp",
    help: "Ethminer start time (unix timestamp)",
    kind: MetricKind::Gauge,
};
pub static CONNECTED: MetricDescriptor = MetricDescriptor {
    name: "ethminer_connected",
    help: "Is Ethminer connected to the pool",
    kind: MetricKind::Gauge,
};

// Per-device
pub static LAST_SHARE_TIMESTAMP: MetricDescriptor = MetricDescriptor {
    name: "ethminer_last_share_timestamp",
    help: "Per-device: Last found share time (unix timestamp)",
    kind: MetricKind::Gauge,
};
pub static HASHRATE: MetricDescriptor = MetricDescriptor {
    name: "ethminer_hashrate",
    help: "Per-device: Hashrate (H/s)",
    kind: MetricKind::Gauge,
};
pub static FOUND_SHARES_TOTAL: MetricDescriptor = MetricDescriptor {
    name: "ethminer_found_shares_total",
    help: "Per-device: Number of found shares",
    kind: MetricKind::Counter,
};
pub static REJECTED_SHARES_TOTAL: MetricDescriptor = MetricDescriptor {
    name: "ethminer_rejected_shares_total",
    help: "Per-device: Number of shares rejected by the pool",
    kind: MetricKind::Counter,
};
pub static FAILED_SHARES_TOTAL: MetricDescriptor = MetricDescriptor {
    name: "ethminer_failed_shares_total",
    help: "Per-device: Number of failed shares (always 0 if --no-eval is set)",
    kind: MetricKind::Counter,
};
pub static FAN_SPEED_PERCENT: MetricDescriptor = MetricDescriptor {
    name: "ethminer_fan_speed_percent",
    help: "Per-device: Fan speed (0-100%)",
    kind: MetricKind::Gauge,
};
pub static POWER_DRAW_WATTS: MetricDescriptor = MetricDescriptor {
    name: "ethminer_power_draw_watts",
    help: "Per-device: Power draw (W)",
    kind: MetricKind::Gauge,
};
pub static TEMPERATURE_DEGREES: MetricDescriptor = MetricDescriptor {
    name: "ethminer_temperature_degrees",
    help: "Per-device: Temperature (degrees celsius)",
    kind: MetricKind::Gauge,
};
pub static PAUSED: MetricDescriptor = MetricDescriptor {
    name: "ethminer_paused",
    help: "Per-device: Is device paused",
    kind: MetricKind::Gauge,
};

/// Every descriptor, in emission order
pub static ALL_METRICS: [&MetricDescriptor; 11] = [
    &STARTED_TIMESTAMP,
    &CONNECTED,
    &LAST_SHARE_TIMESTAMP,
    &HASHRATE,
    &FOUND_SHARES_TOTAL,
    &REJECTED_SHARES_TOTAL,
    &FAILED_SHARES_TOTAL,
    &FAN_SPEED_PERCENT,
    &POWER_DRAW_WATTS,
    &TEMPERATURE_DEGREES,
    &PAUSED,
];

/// Samples emitted per device
pub const SAMPLES_PER_DEVICE: usize = 9;

/// Samples emitted per rig regardless of device count
pub const GLOBAL_SAMPLES: usize = 2;

/// Label names shared by every per-device metric, in emission order
pub const DEVICE_LABELS: [&str; 5] = ["api_endpoint", "device", "name", "type", "mode"];

// Trailing memory size some drivers append to the device name ("... 10.0 GB")
static CAPACITY_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+[\d.]+\s*GB$").expect("capacity suffix pattern is valid"));

/// One (metric, labels, value) emission handed to the exposition sink
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub metric: &'static MetricDescriptor,
    pub labels: Vec<(&'static str, String)>,
    pub value: f64,
}

impl MetricSample {
    pub fn name(&self) -> &'static str {
        self.metric.name
    }

    pub fn kind(&self) -> MetricKind {
        self.metric.kind
    }

    /// Value of a label, if present
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(label, _)| *label == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn label_names(&self) -> Vec<&'static str> {
        self.labels.iter().map(|(name, _)| *name).collect()
    }
}

/// Device name without the trailing memory size
pub fn display_name(name: &str) -> String {
    CAPACITY_SUFFIX.replace(name, "").into_owned()
}

fn bool_value(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

// Ages come straight off the wire, so subtract in f64
fn seconds_before(now_unix: i64, age_secs: f64) -> f64 {
    now_unix as f64 - age_secs
}

pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Map a snapshot at a fixed instant: 2 global samples plus 9 per device
pub fn map_snapshot(target: &Target, snapshot: &RigSnapshot, now_unix: i64) -> Vec<MetricSample> {
    let mut samples = Vec::with_capacity(GLOBAL_SAMPLES + SAMPLES_PER_DEVICE * snapshot.devices.len());

    samples.push(MetricSample {
        metric: &STARTED_TIMESTAMP,
        labels: vec![
            ("api_endpoint", target.to_string()),
            ("version", snapshot.software_version.clone()),
        ],
        value: seconds_before(now_unix, snapshot.started_runtime_secs as f64),
    });
    samples.push(MetricSample {
        metric: &CONNECTED,
        labels: vec![
            ("api_endpoint", target.to_string()),
            ("uri", snapshot.pool_uri.clone()),
        ],
        value: bool_value(snapshot.connected),
    });

    for device in &snapshot.devices {
        map_device(target, device, now_unix, &mut samples);
    }

    samples
}

fn device_labels(target: &Target, device: &DeviceSnapshot) -> Vec<(&'static str, String)> {
    let values = [
        target.to_string(),
        device.bus_id.to_uppercase(),
        display_name(&device.name),
        device.device_type.clone(),
        device.mode.clone(),
    ];
    DEVICE_LABELS.into_iter().zip(values).collect()
}

fn map_device(target: &Target, device: &DeviceSnapshot, now_unix: i64, samples: &mut Vec<MetricSample>) {
    let labels = device_labels(target, device);
    let shares = &device.shares;
    let sensors = &device.sensors;

    let values: [(&'static MetricDescriptor, f64); 8] = [
        (&LAST_SHARE_TIMESTAMP, seconds_before(now_unix, shares.last_share_age_secs as f64)),
        (&HASHRATE, device.hashrate() as f64),
        (&FOUND_SHARES_TOTAL, shares.found as f64),
        (&REJECTED_SHARES_TOTAL, shares.rejected as f64),
        (&FAILED_SHARES_TOTAL, shares.failed as f64),
        (&FAN_SPEED_PERCENT, sensors.fan_percent),
        (&POWER_DRAW_WATTS, sensors.power_watts),
        (&TEMPERATURE_DEGREES, sensors.temperature_c),
    ];
    for (metric, value) in values {
        samples.push(MetricSample {
            metric,
            labels: labels.clone(),
            value,
        });
    }

    // reason is always present so every paused sample has the same label set
    let mut paused_labels = labels;
    paused_labels.push(("reason", device.pause_reason.clone()));
    samples.push(MetricSample {
        metric: &PAUSED,
        labels: paused_labels,
        value: bool_value(device.paused),
    });
}


// Changelog:
// - v1.0.3 (2025-07-21): Timestamps derived in f64.
//   - Extreme runtime and share-age values no longer overflow.
//   - Removed the wall-clock `map` wrapper; callers pass the scrape instant.
// - v1.0.2 (2025-07-09): Constant label shape for paused.
//   - The reason label is emitted even for running devices.
// - v1.0.1 (2025-07-05): Device label cleanup.
//   - Bus ids are upper-cased; trailing "<n> GB" is stripped from names.
// - v1.0.0 (2025-07-02): Initial mapper with the 11 exported metrics.
