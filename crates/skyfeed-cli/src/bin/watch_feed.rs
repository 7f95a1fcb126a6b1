//! CLI tool to watch an SBS-1 feed.
//!
//! Connects to a feed server and prints each message as it arrives,
//! either summarized or as JSON lines for piping.

use clap::Parser;
use skyfeed_cli::feed::FeedReader;

/// Watch a live SBS-1 feed
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Feed address
    #[arg(long, default_value = "127.0.0.1:30003")]
    addr: String,

    /// Print messages as JSON lines instead of summaries
    #[arg(long)]
    json: bool,

    /// Stop after this many messages (0 = run until the feed closes)
    #[arg(long, default_value_t = 0)]
    count: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Status goes to stderr so --json output stays a clean stream.
    eprintln!("Connecting to feed at {}...", args.addr);
    let mut reader = FeedReader::connect(&args.addr).await?;

    let mut seen = 0u64;
    while let Some(msg) = reader.next_message().await? {
        if args.json {
            println!("{}", serde_json::to_string(&msg)?);
        } else {
            println!("{msg}");
        }
        seen += 1;
        if args.count != 0 && seen >= args.count {
            break;
        }
    }

    eprintln!("Watch complete. {} messages received.", seen);
    Ok(())
}
