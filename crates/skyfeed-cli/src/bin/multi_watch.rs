//! CLI tool to fan out many concurrent feed clients.
//!
//! Opens several connections to the same feed and reports per-client
//! message tallies, to exercise the multi-session broadcast path.

use clap::Parser;
use skyfeed_cli::feed::FeedReader;
use skyfeed_core::MessageKind;
use std::time::Duration;
use tokio::time::{timeout, Instant};

/// Open many concurrent clients against one SBS-1 feed
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Feed address
    #[arg(long, default_value = "127.0.0.1:30003")]
    addr: String,

    /// Number of concurrent clients
    #[arg(long, default_value_t = 4)]
    clients: usize,

    /// How long to watch, in seconds
    #[arg(long, default_value_t = 10)]
    seconds: u64,
}

#[derive(Debug, Default)]
struct Tally {
    identity: u64,
    position: u64,
    velocity: u64,
}

impl Tally {
    fn total(&self) -> u64 {
        self.identity + self.position + self.velocity
    }
}

async fn watch_one(addr: String, for_secs: u64) -> anyhow::Result<Tally> {
    let mut reader = FeedReader::connect(&addr).await?;
    let mut tally = Tally::default();
    let deadline = Instant::now() + Duration::from_secs(for_secs);

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        match timeout(remaining, reader.next_message()).await {
            Ok(Ok(Some(msg))) => match msg.kind() {
                MessageKind::Identity => tally.identity += 1,
                MessageKind::Position => tally.position += 1,
                MessageKind::Velocity => tally.velocity += 1,
            },
            Ok(Ok(None)) => break,
            Ok(Err(e)) => return Err(e),
            Err(_) => break,
        }
    }
    Ok(tally)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!(
        "Opening {} clients against {} for {}s...",
        args.clients, args.addr, args.seconds
    );

    let mut handles = Vec::with_capacity(args.clients);
    for i in 0..args.clients {
        handles.push((i, tokio::spawn(watch_one(args.addr.clone(), args.seconds))));
    }

    let mut total = 0u64;
    for (i, handle) in handles {
        match handle.await? {
            Ok(tally) => {
                total += tally.total();
                println!(
                    "[client {:2}] {} messages ({} ident, {} pos, {} vel)",
                    i,
                    tally.total(),
                    tally.identity,
                    tally.position,
                    tally.velocity
                );
            }
            Err(e) => eprintln!("[client {:2}] failed: {}", i, e),
        }
    }

    println!("\nAll clients done. {} messages total.", total);
    Ok(())
}
