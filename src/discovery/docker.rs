// Ethminer Exporter - Free and Open Source Software Statement
//
// This project, ethminer-exporter, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/discovery/docker.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements container discovery against the Docker Engine API,
// located in the discovery subdirectory. It lists containers exposing the
// miner port and returns the IP address of each of their networks.
//
// Tree Location:
// - src/discovery/docker.rs (Docker Engine host discovery)
// - Depends on: hyper, hyper-util, http-body-util, serde_json, anyhow, async-trait

use super::HostDiscovery;
use anyhow::{Context, anyhow, bail};
use async_trait::async_trait;
use http_body_util::{BodyExt, Empty, Limited};
use hyper::body::Bytes;
use hyper::{Request, header};
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

const LOG_TARGET: &str = "ethminer::exporter::discovery::docker";

/// Largest container listing accepted from the daemon
pub const MAX_LISTING_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ContainerSummary {
    #[serde(default)]
    network_settings: Option<NetworkSettings>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NetworkSettings {
    // Sorted so the target order is stable between scrapes
    #[serde(default)]
    networks: BTreeMap<String, EndpointSettings>,
}

#[derive(Debug, Deserialize)]
struct EndpointSettings {
    #[serde(rename = "IPAddress", default)]
    ip_address: String,
}

/// Discovers miner containers through the Docker Engine Unix socket
#[derive(Debug, Clone)]
pub struct DockerDiscovery {
    socket_path: PathBuf,
    timeout: Duration,
}

impl DockerDiscovery {
    pub fn new(socket_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            socket_path: socket_path.into(),
            timeout,
        }
    }

    /// List container IPs, surfacing errors to the caller
    pub async fn container_ips(&self, port: u16) -> anyhow::Result<Vec<String>> {
        let path = containers_path(port)?;
        let body = tokio::time::timeout(self.timeout, self.get(&path))
            .await
            .context("Docker API request timed out")??;
        parse_container_ips(&body)
    }

    #[cfg(unix)]
    async fn get(&self, path: &str) -> anyhow::Result<Bytes> {
        use hyper_util::rt::TokioIo;
        use tokio::net::UnixStream;

        let stream = UnixStream::connect(&self.socket_path)
            .await
            .with_context(|| format!("connecting to {}", self.socket_path.display()))?;

        let (mut sender, connection) = hyper::client::conn::http1::handshake::<_, Empty<Bytes>>(TokioIo::new(stream))
            .await
            .context("HTTP handshake with Docker API")?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                debug!(target: LOG_TARGET, "Docker API connection closed: {}", e);
            }
        });

        let request = Request::builder()
            .uri(path)
            .header(header::HOST, "docker")
            .header(header::ACCEPT, "application/json")
            .body(Empty::<Bytes>::new())?;
        let response = sender.send_request(request).await?;

        let status = response.status();
        if !status.is_success() {
            bail!("Docker API answered {}", status);
        }

        let body = Limited::new(response.into_body(), MAX_LISTING_BYTES)
            .collect()
            .await
            .map_err(|e| anyhow!("reading container listing: {}", e))?;
        Ok(body.to_bytes())
    }

    #[cfg(not(unix))]
    async fn get(&self, _path: &str) -> anyhow::Result<Bytes> {
        bail!("Docker discovery needs a Unix socket, which this platform lacks")
    }
}

#[async_trait]
impl HostDiscovery for DockerDiscovery {
    async fn discover(&self, port: u16) -> Vec<String> {
        match self.container_ips(port).await {
            Ok(ips) => ips,
            Err(e) => {
                debug!(target: LOG_TARGET, "Container discovery unavailable: {:#}", e);
                Vec::new()
            }
        }
    }
}

/// `/containers/json` filtered to containers exposing `port`
fn containers_path(port: u16) -> anyhow::Result<String> {
    let filters = serde_json::json!({ "expose": [port.to_string()] }).to_string();
    let query = serde_urlencoded::to_string([("filters", filters)])?;
    Ok(format!("/containers/json?{}", query))
}

fn parse_container_ips(body: &[u8]) -> anyhow::Result<Vec<String>> {
    let containers: Vec<ContainerSummary> =
        serde_json::from_slice(body).context("decoding container list")?;
    Ok(containers
        .into_iter()
        .filter_map(|c| c.network_settings)
        .flat_map(|settings| settings.networks.into_values())
        .map(|endpoint| endpoint.ip_address)
        .filter(|ip| !ip.is_empty())
        .collect())
}


// Changelog:
// - v1.1.0 (2025-07-21): Switched to hyper's HTTP/1 client.
//   - The Engine API is spoken through hyper over the Unix socket.
//   - Query strings are built with serde_urlencoded.
//   - Container listings are capped at 4 MiB.
// - v1.0.0 (2025-07-14): Initial Docker discovery.
//   - Every failure degrades to an empty host list.
