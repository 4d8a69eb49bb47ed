// Ethminer Exporter - Free and Open Source Software Statement
//
// This project, ethminer-exporter, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/lib.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file serves as the main library entry point for the ethminer exporter,
// located at the root of the source tree. It exports all public modules
// and types that the binary and the integration tests use.
//
// Tree Location:
// - src/lib.rs (root library file)
// - Exports modules: core, rig, discovery, metrics, collector, web_server, utils

pub mod collector;
pub mod core;
pub mod discovery;
pub mod metrics;
pub mod rig;
pub mod utils;
pub mod web_server;

// Re-export commonly used types at the crate root for convenience
pub use crate::collector::{CollectionResult, Collector, TargetFailure};
pub use crate::core::{Args, RigSnapshot, Target};
pub use crate::discovery::{DockerDiscovery, HostDiscovery, StaticDiscovery, TargetResolver};
pub use crate::rig::{RigClient, SampleError};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

// Changelog:
// - v1.1.0 (2025-07-14): Added collector and web_server to the library.
//   - The HTTP router is now reachable from integration tests.
// - v1.0.0 (2025-07-02): Initial library layout.
//   - Purpose: Establishes the library root, organizing the exporter into
//     core, rig, discovery, metrics and utils modules.
//   - Features: Exports the collection engine types and defines a common
//     Result type for startup paths.
