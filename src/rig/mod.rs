// Ethminer Exporter - Free and Open Source Software Statement
//
// This project, ethminer-exporter, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/rig/mod.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the module declaration for rig communication, located in the
// rig subdirectory. It declares submodules and re-exports key types for use
// throughout the project.
//
// Tree Location:
// - src/rig/mod.rs (rig module entry point)
// - Submodules: client, messages, protocol

pub mod client;
pub mod messages;
pub mod protocol;

// Re-export key types for convenience
pub use client::{ReadFailure, RigClient, SampleError};
pub use protocol::{DecodeError, EthminerProtocol};

// Changelog:
// - v1.0.0 (2025-07-02): Initial rig module.
//   - Purpose: Groups the JSON-RPC wire structs, the codec and the TCP client
//     used to sample one rig per call.
