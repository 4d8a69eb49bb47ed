// Ethminer Exporter - Free and Open Source Software Statement
//
// This project, ethminer-exporter, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/collector.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the collection engine that runs one scrape, located at
// the root of the source tree. It resolves targets, samples every rig
// concurrently, maps each snapshot, and records per-target failures without
// aborting the remaining targets.
//
// Tree Location:
// - src/collector.rs (per-scrape orchestration)
// - Depends on: futures, crate::discovery, crate::rig, crate::metrics

use crate::core::snapshot::{RigSnapshot, Target};
use crate::discovery::TargetResolver;
use crate::metrics::mapper::{self, MetricSample};
use crate::rig::{RigClient, SampleError};
use crate::utils::format::FormatUtils;
use futures::future::join_all;
use log::{debug, error};
use std::time::Duration;

const LOG_TARGET: &str = "ethminer::exporter::collector";

/// A target that produced no samples in this scrape
#[derive(Debug)]
pub struct TargetFailure {
    pub target: Target,
    pub error: SampleError,
}

/// Everything one scrape produced
#[derive(Debug, Default)]
pub struct CollectionResult {
    /// Samples of every successful target, in target order
    pub samples: Vec<MetricSample>,

    /// Failed targets, in target order
    pub failures: Vec<TargetFailure>,

    /// Targets polled in this scrape
    pub polled: usize,
}

impl CollectionResult {
    /// Number of targets that answered
    pub fn reachable(&self) -> usize {
        self.polled.saturating_sub(self.failures.len())
    }
}

/// Orchestrates resolver, sampler and mapper for each scrape
pub struct Collector {
    resolver: TargetResolver,
    client: RigClient,
}

impl Collector {
    pub fn new(resolver: TargetResolver, client: RigClient) -> Self {
        Self { resolver, client }
    }

    /// Run one scrape. `explicit` short-circuits discovery when non-empty.
    pub async fn collect(&self, explicit: Option<&str>) -> CollectionResult {
        let targets = self.resolver.resolve(explicit).await;
        self.collect_targets(&targets).await
    }

    /// Sample the given targets; failures are recorded, never fatal
    pub async fn collect_targets(&self, targets: &[Target]) -> CollectionResult {
        let outcomes = join_all(targets.iter().map(|target| self.client.sample(target))).await;
        let now = mapper::unix_now();

        let mut result = CollectionResult {
            polled: targets.len(),
            ..CollectionResult::default()
        };
        for (target, outcome) in targets.iter().zip(outcomes) {
            match outcome {
                Ok(snapshot) => {
                    log_snapshot(target, &snapshot);
                    result
                        .samples
                        .extend(mapper::map_snapshot(target, &snapshot, now));
                }
                Err(error) => {
                    if error.is_routine() {
                        debug!(target: LOG_TARGET, "Skipping {}: {}", target, error);
                    } else {
                        error!(target: LOG_TARGET, "❌ Error sampling {}: {}", target, error);
                    }
                    result.failures.push(TargetFailure {
                        target: target.clone(),
                        error,
                    });
                }
            }
        }

        debug!(
            target: LOG_TARGET,
            "Scrape finished: {}/{} target(s) reachable, {} sample(s)",
            result.reachable(),
            result.polled,
            result.samples.len()
        );
        result
    }
}

fn log_snapshot(target: &Target, snapshot: &RigSnapshot) {
    debug!(
        target: LOG_TARGET,
        "{} ({}, {}): {} device(s), {}, up {}",
        target,
        snapshot.host_name,
        snapshot.software_version,
        snapshot.devices.len(),
        FormatUtils::format_hashrate(snapshot.hashrate()),
        FormatUtils::format_duration(Duration::from_secs(snapshot.started_runtime_secs.max(0) as u64))
    );
}


// Changelog:
// - v1.1.0 (2025-07-14): Concurrent sampling.
//   - Targets are sampled concurrently with join_all; results keep target order.
//   - Unreachable targets are logged at debug, other failures at error.
// - v1.0.0 (2025-07-02): Initial sequential collector.
