// Ethminer Exporter - Free and Open Source Software Statement
//
// This project, ethminer-exporter, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/rig/protocol.rs
// Version: 1.0.1
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the ethminer JSON-RPC codec, located in the rig
// subdirectory. It produces the fixed statistics request and decodes the
// response into a RigSnapshot.
//
// Tree Location:
// - src/rig/protocol.rs (request encoding and response decoding)
// - Depends on: serde_json, thiserror, crate::rig::messages

use crate::core::snapshot::RigSnapshot;
use crate::rig::messages::{RpcEnvelope, StatDetail};
use log::debug;
use thiserror::Error;

const LOG_TARGET: &str = "ethminer::exporter::rig::protocol";

/// Read-only statistics call, one line, id fixed at 0
pub const STAT_DETAIL_REQUEST: &str =
    "{\"id\":0,\"jsonrpc\":\"2.0\",\"method\":\"miner_getstatdetail\"}\n";

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("invalid JSON in miner response: {source}")]
    Malformed {
        #[from]
        source: serde_json::Error,
    },

    #[error("miner API error {code}: {message}")]
    ApiError { code: i64, message: String },
}

/// Encodes and decodes the ethminer statistics protocol
pub struct EthminerProtocol;

impl EthminerProtocol {
    /// The request line written to every rig
    pub fn encode_request() -> &'static [u8] {
        STAT_DETAIL_REQUEST.as_bytes()
    }

    /// Decode a raw response line into a snapshot
    pub fn decode_response(payload: &[u8]) -> Result<RigSnapshot, DecodeError> {
        let envelope: RpcEnvelope = serde_json::from_slice(payload)?;

        if let Some(error) = envelope.error {
            if error.code != 0 {
                return Err(DecodeError::ApiError {
                    code: error.code,
                    message: error.message,
                });
            }
        }

        let detail = match envelope.result {
            Some(result) if !result.is_null() => serde_json::from_value::<StatDetail>(result)?,
            _ => {
                debug!(target: LOG_TARGET, "Response carries no result object, using defaults");
                StatDetail::default()
            }
        };

        Ok(RigSnapshot::from(detail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESPONSE: &str = r#"{
        "id": 0,
        "jsonrpc": "2.0",
        "result": {
            "connection": { "connected": true, "switches": 1, "uri": "stratum1+tcp://eu1.ethermine.org:4444" },
            "devices": [
                {
                    "_index": 0,
                    "_mode": "CUDA",
                    "hardware": { "name": "GeForce GTX 1060 6GB 5.94 GB", "pci": "01:00.0", "sensors": [53, 41, 98], "type": "Gpu" },
                    "mining": { "hashrate": "0x0148d3a5", "pause_reason": null, "paused": false, "segment": ["0x0", "0x1"], "shares": [28, 1, 0, 15] }
                }
            ],
            "host": { "name": "rig01", "runtime": 3686, "version": "ethminer-0.19.0" },
            "mining": { "difficulty": 4000000000.0, "epoch": 385, "epoch_changes": 1, "hashrate": "0x0148d3a5", "shares": [28, 1, 0, 15] },
            "monitors": { "temperatures": [0, 0] }
        }
    }"#;

    #[test]
    fn test_request_is_single_line() {
        let request = EthminerProtocol::encode_request();
        assert_eq!(request.last(), Some(&b'\n'));
        assert_eq!(request.iter().filter(|b| **b == b'\n').count(), 1);
        let value: serde_json::Value = serde_json::from_slice(request).unwrap();
        assert_eq!(value["method"], "miner_getstatdetail");
        assert_eq!(value["id"], 0);
    }

    #[test]
    fn test_decode_full_response() {
        let snapshot = EthminerProtocol::decode_response(SAMPLE_RESPONSE.as_bytes()).unwrap();
        assert!(snapshot.connected);
        assert_eq!(snapshot.pool_uri, "stratum1+tcp://eu1.ethermine.org:4444");
        assert_eq!(snapshot.switch_count, 1);
        assert_eq!(snapshot.started_runtime_secs, 3686);
        assert_eq!(snapshot.software_version, "ethminer-0.19.0");
        assert_eq!(snapshot.epoch, 385);
        assert_eq!(snapshot.devices.len(), 1);

        let device = &snapshot.devices[0];
        assert_eq!(device.bus_id, "01:00.0");
        assert_eq!(device.mode, "CUDA");
        assert_eq!(device.hashrate(), 0x0148d3a5);
        assert_eq!(device.shares.found, 28);
        assert_eq!(device.shares.rejected, 1);
        assert_eq!(device.shares.failed, 0);
        assert_eq!(device.shares.last_share_age_secs, 15);
        assert_eq!(device.sensors.temperature_c, 53.0);
        assert_eq!(device.sensors.fan_percent, 41.0);
        assert_eq!(device.sensors.power_watts, 98.0);
        assert_eq!(device.pause_reason, "");
    }

    #[test]
    fn test_rejects_invalid_json() {
        let err = EthminerProtocol::decode_response(b"{\"id\":0,").unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { .. }));
    }

    #[test]
    fn test_api_error_takes_precedence_over_result() {
        let payload = br#"{"id":0,"result":{"connection":{"connected":true}},"error":{"code":5,"message":"bad method"}}"#;
        match EthminerProtocol::decode_response(payload) {
            Err(DecodeError::ApiError { code, message }) => {
                assert_eq!(code, 5);
                assert_eq!(message, "bad method");
            }
            other => panic!("expected ApiError, got {:?}", other),
        }
    }

    #[test]
    fn test_api_error_wins_over_malformed_result() {
        let payload = br#"{"id":0,"result":{"devices":"oops"},"error":{"code":-32601,"message":"Method not found"}}"#;
        let err = EthminerProtocol::decode_response(payload).unwrap_err();
        assert!(matches!(err, DecodeError::ApiError { code: -32601, .. }));
    }

    #[test]
    fn test_zero_error_code_is_not_an_error() {
        let payload = br#"{"id":0,"result":{"host":{"runtime":10}},"error":{"code":0,"message":""}}"#;
        let snapshot = EthminerProtocol::decode_response(payload).unwrap();
        assert_eq!(snapshot.started_runtime_secs, 10);
    }

    #[test]
    fn test_missing_devices_decode_as_empty() {
        let payload = br#"{"id":0,"jsonrpc":"2.0","result":{"connection":{"connected":false}}}"#;
        let snapshot = EthminerProtocol::decode_response(payload).unwrap();
        assert!(snapshot.devices.is_empty());
        assert!(!snapshot.connected);
    }

    #[test]
    fn test_bad_hashrate_does_not_fail_record() {
        let payload = br#"{"id":0,"result":{"devices":[{"_index":0,"hardware":{"sensors":["n/a",40,90]},"mining":{"hashrate":"not-hex"}}]}}"#;
        let snapshot = EthminerProtocol::decode_response(payload).unwrap();
        assert_eq!(snapshot.devices[0].hashrate(), 0);
        assert_eq!(snapshot.devices[0].sensors.temperature_c, 0.0);
        assert_eq!(snapshot.devices[0].sensors.fan_percent, 40.0);
    }

    #[test]
    fn test_trailing_newline_is_accepted() {
        let payload = b"{\"id\":0,\"result\":{}}\n";
        assert!(EthminerProtocol::decode_response(payload).is_ok());
    }
}

// Changelog:
// - v1.0.1 (2025-07-09): Error object precedence.
//   - The result object is decoded only after the error code has been checked,
//     so a populated error is reported even when the result is malformed.
// - v1.0.0 (2025-07-02): Initial codec for miner_getstatdetail.
