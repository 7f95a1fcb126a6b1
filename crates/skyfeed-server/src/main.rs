//! skyfeed-server - Simulated SBS-1 aircraft feed over TCP

mod config;
mod loops;
mod net;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::state::Fleet;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("skyfeed_server=debug".parse()?))
        .init();

    let config = Config::from_env();

    tracing::info!("Starting fake ADS-B (SBS-1) server on port {}...", config.port);
    tracing::info!(
        "Simulating 3-aircraft looping patrol of Ashtabula, OH ({:.4}, {:.4})",
        state::PATROL_LAT,
        state::PATROL_LON
    );

    let fleet = Arc::new(Fleet::standard_patrol());
    for ac in fleet.read().await.iter() {
        tracing::info!(
            "  {} ({}) at ({:.4}, {:.4}), {} ft",
            ac.callsign(),
            ac.icao(),
            ac.latitude(),
            ac.longitude(),
            ac.altitude()
        );
    }

    // Start the one simulation loop that owns all writes
    tokio::spawn(loops::sim_loop::run_sim_loop(fleet.clone(), config.clone()));

    // Bind failure is fatal
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);
    tracing::info!("Connect with: nc localhost {}", config.port);

    net::run_listener(listener, fleet, config).await
}
