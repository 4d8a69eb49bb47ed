// Ethminer Exporter - Free and Open Source Software Statement
//
// This project, ethminer-exporter, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/types.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file defines the command-line configuration of the exporter, located in
// the core subdirectory. The parsed arguments are set once at startup and are
// read-only for the lifetime of the process.
//
// Tree Location:
// - src/core/types.rs (command-line arguments and validation)
// - Depends on: clap, humantime, log

use clap::Parser;
use log::LevelFilter;
use std::net::SocketAddr;
use std::time::Duration;

/// Command-line arguments for the ethminer exporter
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ethminer_exporter",
    version,
    about = "Exports ethminer rig statistics for a metrics scraper",
    long_about = "Ethminer Exporter polls one or more ethminer processes over their JSON-RPC API\n\
                  and republishes hashrate, shares, temperature and connection status on /metrics.\n\n\
                  SINGLE RIG: scrape /metrics?target=HOST:PORT\n\
                  DISCOVERY: scrape /metrics to poll the local rig plus every Docker container\n\
                  exposing the discovery port\n\n\
                  Examples:\n\
                    ethminer_exporter --listen 0.0.0.0:8555\n\
                    ethminer_exporter --discovery-port 3333 --timeout 500ms\n\
                    ethminer_exporter --no-discovery --log-level debug"
)]
pub struct Args {
    /// Address to listen on for the web interface and telemetry
    #[arg(
        long = "listen",
        default_value = "0.0.0.0:8555",
        value_name = "HOST:PORT",
        help = "Address to listen on for web interface and telemetry"
    )]
    pub listen: String,

    /// Port of the miner API on the local host and on discovered containers
    #[arg(
        long = "discovery-port",
        default_value = "3333",
        value_name = "PORT",
        help = "Miner API port used for the local rig and discovered containers"
    )]
    pub discovery_port: u16,

    /// Network timeout for each rig, applied to connect and to the exchange
    #[arg(
        long = "timeout",
        default_value = "1s",
        value_name = "DURATION",
        value_parser = humantime::parse_duration,
        help = "Per-rig network timeout (e.g. 500ms, 1s, 2s)"
    )]
    pub timeout: Duration,

    /// Docker Engine endpoint used to discover miner containers
    #[arg(
        long = "docker-host",
        env = "DOCKER_HOST",
        default_value = "unix:///var/run/docker.sock",
        value_name = "URL",
        help = "Docker Engine socket used for container discovery"
    )]
    pub docker_host: String,

    /// Only poll the local rig, never ask Docker for containers
    #[arg(
        long = "no-discovery",
        default_value = "false",
        help = "Disable container discovery (poll 127.0.0.1 only)"
    )]
    pub no_discovery: bool,

    /// Log verbosity
    #[arg(
        long = "log-level",
        default_value = "info",
        value_name = "LEVEL",
        help = "Log level [off, error, warn, info, debug, trace]"
    )]
    pub log_level: String,
}

impl Args {
    /// Validate arguments and return helpful errors
    pub fn validate(&self) -> Result<(), String> {
        self.listen_addr()?;

        if self.discovery_port == 0 {
            return Err("Discovery port must be between 1 and 65535".to_string());
        }

        if self.timeout.is_zero() {
            return Err("Timeout must be greater than zero (e.g. --timeout 1s)".to_string());
        }

        if !self.no_discovery {
            self.docker_socket_path()?;
        }

        self.log_level_filter()?;

        Ok(())
    }

    /// Parsed listen address
    pub fn listen_addr(&self) -> Result<SocketAddr, String> {
        self.listen.parse::<SocketAddr>().map_err(|_| {
            format!(
                "Listen address must be in format IP:PORT (e.g. 0.0.0.0:8555), got '{}'",
                self.listen
            )
        })
    }

    /// Socket path of the Docker endpoint (only unix:// endpoints are supported)
    pub fn docker_socket_path(&self) -> Result<String, String> {
        match self.docker_host.strip_prefix("unix://") {
            Some(path) if !path.is_empty() => Ok(path.to_string()),
            _ => Err(format!(
                "Docker host must be a unix:// socket (e.g. unix:///var/run/docker.sock), got '{}'",
                self.docker_host
            )),
        }
    }

    pub fn log_level_filter(&self) -> Result<LevelFilter, String> {
        self.log_level
            .parse::<LevelFilter>()
            .map_err(|_| format!("Unknown log level '{}'", self.log_level))
    }
}


// Changelog:
// - v1.1.0 (2025-07-14): Added discovery configuration.
//   - Added --docker-host (DOCKER_HOST) and --no-discovery.
//   - Switched --timeout to humantime parsing.
// - v1.0.0 (2025-07-02): Initial argument set.
//   - --listen, --discovery-port, --timeout and --log-level with validation.
