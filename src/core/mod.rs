// Ethminer Exporter - Free and Open Source Software Statement
//
// This project, ethminer-exporter, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/mod.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the module declaration for the core types of the exporter,
// located in the core subdirectory. It declares submodules and re-exports
// key types for use throughout the project.

pub mod snapshot;
pub mod types;

// Re-export the most commonly used items
pub use snapshot::{DeviceSnapshot, RigSnapshot, SensorReadings, ShareCounts, Target, parse_hashrate};
pub use types::Args;

// Changelog:
// - v1.0.0 (2025-07-02): Initial core module.
//   - Declares snapshot (per-scrape rig state) and types (command-line Args).
