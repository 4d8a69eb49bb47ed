// Ethminer Exporter - Free and Open Source Software Statement
//
// File: src/main.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// Process entry point: parse flags, set up logging, wire discovery, sampler
// and collector together, then serve HTTP.

use clap::Parser;
use ethminer_exporter::{
    Args, Collector, DockerDiscovery, HostDiscovery, Result, RigClient, StaticDiscovery,
    TargetResolver, utils::init_logging, web_server,
};
use log::info;
use std::sync::Arc;

const LOG_TARGET: &str = "ethminer::exporter::main";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Validate arguments
    if let Err(err) = args.validate() {
        eprintln!("❌ Error: {}", err);
        std::process::exit(1);
    }

    init_logging(args.log_level_filter()?)?;
    info!(target: LOG_TARGET, "🚀 Starting ethminer exporter v{}", env!("CARGO_PKG_VERSION"));

    let discovery: Arc<dyn HostDiscovery> = if args.no_discovery {
        info!(target: LOG_TARGET, "🔍 Container discovery disabled, polling the local rig only");
        Arc::new(StaticDiscovery::default())
    } else {
        let socket = args.docker_socket_path()?;
        info!(target: LOG_TARGET, "🔍 Discovering rigs through Docker at {}", socket);
        Arc::new(DockerDiscovery::new(socket, args.timeout))
    };

    let resolver = TargetResolver::new(args.discovery_port, discovery);
    let client = RigClient::new(args.timeout);
    info!(
        target: LOG_TARGET,
        "⚙️  Rig port {}, network timeout {}",
        args.discovery_port,
        humantime::format_duration(args.timeout)
    );

    let collector = Arc::new(Collector::new(resolver, client));
    web_server::start_web_server(args.listen_addr()?, collector).await
}

// Changelog:
// - v1.1.0 (2025-07-14): Discovery can be disabled with --no-discovery.
// - v1.0.0 (2025-07-02): Initial entry point.
