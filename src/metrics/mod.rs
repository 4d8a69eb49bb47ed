// Ethminer Exporter - Free and Open Source Software Statement
//
// This project, ethminer-exporter, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/metrics/mod.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the module declaration for metric mapping and exposition,
// located in the metrics subdirectory.
//
// Tree Location:
// - src/metrics/mod.rs (metrics module entry point)
// - Submodules: exposition, mapper

pub mod exposition;
pub mod mapper;

pub use exposition::{CONTENT_TYPE, ExpositionError, render};
pub use mapper::{MetricDescriptor, MetricKind, MetricSample, NAMESPACE, map_snapshot};

// Changelog:
// - v1.0.0 (2025-07-02): Initial metrics module.
