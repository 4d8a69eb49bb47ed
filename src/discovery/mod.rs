// Ethminer Exporter - Free and Open Source Software Statement
//
// This project, ethminer-exporter, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/discovery/mod.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements target resolution for one scrape, located in the
// discovery subdirectory. An explicit target always wins; otherwise the local
// rig is polled together with every host the discovery collaborator returns.
//
// Tree Location:
// - src/discovery/mod.rs (HostDiscovery trait and TargetResolver)
// - Submodules: docker

pub mod docker;

use crate::core::snapshot::Target;
use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

pub use docker::DockerDiscovery;

const LOG_TARGET: &str = "ethminer::exporter::discovery";

/// Local rig, always probed when no explicit target is given
pub const LOCAL_HOST: &str = "127.0.0.1";

/// Best-effort source of candidate rig hosts.
///
/// Implementations return bare IP addresses and never fail; any problem is
/// reported as an empty list.
#[async_trait]
pub trait HostDiscovery: Send + Sync {
    async fn discover(&self, port: u16) -> Vec<String>;
}

/// Fixed host list. Empty when discovery is disabled.
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    hosts: Vec<String>,
}

impl StaticDiscovery {
    pub fn new(hosts: Vec<String>) -> Self {
        Self { hosts }
    }
}

#[async_trait]
impl HostDiscovery for StaticDiscovery {
    async fn discover(&self, _port: u16) -> Vec<String> {
        self.hosts.clone()
    }
}

/// Produces the ordered target list for a single collection pass
#[derive(Clone)]
pub struct TargetResolver {
    discovery_port: u16,
    discovery: Arc<dyn HostDiscovery>,
}

impl TargetResolver {
    pub fn new(discovery_port: u16, discovery: Arc<dyn HostDiscovery>) -> Self {
        Self {
            discovery_port,
            discovery,
        }
    }

    /// Resolve the targets to poll.
    ///
    /// Duplicates returned by discovery are kept; each copy is polled.
    pub async fn resolve(&self, explicit: Option<&str>) -> Vec<Target> {
        if let Some(target) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
            return vec![Target::new(target)];
        }

        let discovered = self.discovery.discover(self.discovery_port).await;
        debug!(
            target: LOG_TARGET,
            "Discovery returned {} host(s) for port {}",
            discovered.len(),
            self.discovery_port
        );

        let mut targets = Vec::with_capacity(discovered.len() + 1);
        targets.push(Target::from_host(LOCAL_HOST, self.discovery_port));
        targets.extend(
            discovered
                .iter()
                .map(|host| Target::from_host(host, self.discovery_port)),
        );
        targets
    }
}


// Changelog:
// - v1.1.0 (2025-07-14): Pluggable discovery.
//   - The discovery collaborator is passed in at startup instead of living in
//     a lazily created global, so tests can substitute their own.
// - v1.0.0 (2025-07-02): Initial resolver (explicit target or local rig).
