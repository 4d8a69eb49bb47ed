// Ethminer Exporter - Free and Open Source Software Statement
//
// This project, ethminer-exporter, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/rig/messages.rs
// Version: 1.0.1
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file defines the wire structures of the ethminer `miner_getstatdetail`
// response, located in the rig subdirectory. Every field is optional on the
// wire; numeric arrays are decoded leniently so a single bad value never
// rejects the whole record.
//
// Tree Location:
// - src/rig/messages.rs (JSON-RPC wire structs)
// - Depends on: serde, serde_json, crate::core::snapshot

use crate::core::snapshot::{DeviceSnapshot, RigSnapshot, SensorReadings, ShareCounts};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Top-level JSON-RPC envelope. The result stays raw until the error object
/// has been checked, so a populated error wins over a malformed result.
#[derive(Debug, Default, Deserialize)]
pub struct RpcEnvelope {
    #[serde(default)]
    pub id: Value,

    #[serde(default, deserialize_with = "null_as_default")]
    pub jsonrpc: String,

    #[serde(default)]
    pub result: Option<Value>,

    #[serde(default)]
    pub error: Option<RpcError>,
}

/// JSON-RPC error object
#[derive(Debug, Default, Deserialize)]
pub struct RpcError {
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatDetail {
    #[serde(default, deserialize_with = "null_as_default")]
    pub connection: Connection,

    #[serde(default, deserialize_with = "null_as_default")]
    pub devices: Vec<Device>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub host: Host,

    #[serde(default, deserialize_with = "null_as_default")]
    pub mining: Mining,
}

#[derive(Debug, Default, Deserialize)]
pub struct Connection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub connected: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub switches: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub uri: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Device {
    #[serde(rename = "_index", default, deserialize_with = "null_as_default")]
    pub index: i64,

    #[serde(rename = "_mode", default, deserialize_with = "null_as_default")]
    pub mode: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub hardware: DeviceHardware,

    #[serde(default, deserialize_with = "null_as_default")]
    pub mining: DeviceMining,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeviceHardware {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub pci: String,

    /// [temperature, fan, power]
    #[serde(default, deserialize_with = "null_as_default")]
    pub sensors: Vec<Value>,

    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub device_type: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeviceMining {
    #[serde(default)]
    pub hashrate: Value,

    #[serde(default, deserialize_with = "null_as_default")]
    pub pause_reason: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub paused: bool,

    /// [found, rejected, failed, seconds since last share]
    #[serde(default, deserialize_with = "null_as_default")]
    pub shares: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Host {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub runtime: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Mining {
    #[serde(default, deserialize_with = "null_as_default")]
    pub difficulty: f64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub epoch: i64,

    #[serde(default)]
    pub hashrate: Value,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Number or numeric string as f64, anything else as 0
fn lenient_f64(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Non-negative integer, tolerating floats and numeric strings
fn lenient_u64(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

/// Hashrates are hex strings on the wire; plain numbers are re-encoded as hex
fn hashrate_hex(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .map(|v| format!("{:#x}", v))
            .unwrap_or_default(),
        _ => String::new(),
    }
}

impl From<Device> for DeviceSnapshot {
    fn from(device: Device) -> Self {
        let shares = &device.mining.shares;
        let sensors = &device.hardware.sensors;
        Self {
            index: device.index,
            bus_id: device.hardware.pci,
            name: device.hardware.name,
            device_type: device.hardware.device_type,
            mode: device.mode,
            hashrate_hex: hashrate_hex(&device.mining.hashrate),
            shares: ShareCounts {
                found: lenient_u64(shares.first()),
                rejected: lenient_u64(shares.get(1)),
                failed: lenient_u64(shares.get(2)),
                last_share_age_secs: lenient_u64(shares.get(3)),
            },
            sensors: SensorReadings {
                temperature_c: lenient_f64(sensors.first()),
                fan_percent: lenient_f64(sensors.get(1)),
                power_watts: lenient_f64(sensors.get(2)),
            },
            paused: device.mining.paused,
            pause_reason: device.mining.pause_reason,
        }
    }
}

impl From<StatDetail> for RigSnapshot {
    fn from(detail: StatDetail) -> Self {
        Self {
            connected: detail.connection.connected,
            pool_uri: detail.connection.uri,
            switch_count: detail.connection.switches,
            started_runtime_secs: detail.host.runtime,
            software_version: detail.host.version,
            host_name: detail.host.name,
            difficulty: detail.mining.difficulty,
            epoch: detail.mining.epoch,
            hashrate_hex: hashrate_hex(&detail.mining.hashrate),
            devices: detail.devices.into_iter().map(DeviceSnapshot::from).collect(),
        }
    }
}


// Changelog:
// - v1.0.1 (2025-07-09): Lenient decoding.
//   - null strings, objects and arrays decode as their defaults.
//   - Non-numeric sensor and share entries decode as 0 instead of failing.
//   - Numeric hashrates are re-encoded as hex.
// - v1.0.0 (2025-07-02): Initial wire structs for miner_getstatdetail.
