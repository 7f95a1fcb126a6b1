//! TCP feed: the accept loop and per-client broadcast sessions.
//!
//! There is no inbound protocol. Every accepted connection immediately
//! starts receiving bursts, one message per aircraft per tick, until the
//! first write failure ends that session.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skyfeed_core::{Aircraft, MessageKind};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::interval;

use crate::config::Config;
use crate::state::Fleet;

/// Accept connections forever, spawning one broadcast session per client.
/// Accept failures are transient and only get logged.
pub async fn run_listener(listener: TcpListener, fleet: Arc<Fleet>, config: Config) -> Result<()> {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                let fleet = fleet.clone();
                let tick_ms = config.broadcast_tick_ms;
                tokio::spawn(serve_client(stream, peer, fleet, tick_ms));
            }
            Err(e) => {
                tracing::warn!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Stream bursts to one client until its socket goes away.
///
/// The fleet read guard is held across the socket writes of each burst, so
/// a burst never straddles a simulation tick. Sessions tick on their own
/// clocks and share nothing but the fleet.
async fn serve_client(mut stream: TcpStream, peer: SocketAddr, fleet: Arc<Fleet>, tick_ms: u64) {
    tracing::info!("Client connected: {}", peer);

    let mut rng = StdRng::from_os_rng();
    let mut ticker = interval(Duration::from_millis(tick_ms));

    loop {
        ticker.tick().await;

        let aircraft = fleet.read().await;
        if let Err(e) = send_burst(&mut stream, &aircraft, &mut rng).await {
            tracing::warn!("Write error for {}: {}", peer, e);
            break;
        }
    }

    tracing::info!("Client disconnected: {}", peer);
}

/// Write one burst: one message per aircraft, in fleet order, with the kind
/// chosen per aircraft against this session's rng. The first write failure
/// aborts the rest of the burst; any announcement flags already set by
/// generated identity messages stay set.
pub async fn send_burst<W, R>(writer: &mut W, aircraft: &[Aircraft], rng: &mut R) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
    R: Rng + ?Sized,
{
    for ac in aircraft {
        let kind = MessageKind::choose(ac.announced(), rng);
        let line = ac.message(kind, Utc::now());
        writer.write_all(line.as_bytes()).await?;
    }
    Ok(())
}
