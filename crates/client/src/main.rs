// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tether Contributors

//! tether: command-line front end for the resilient messaging client.
//!
//! Connects to a relay, keeps the connection alive across failures, and
//! renders status updates as log lines. Messages given with `--send` are
//! queued before the first connection attempt, demonstrating the
//! flush-on-reconnect path; after that, every stdin line is sent as a text
//! payload (queued while disconnected).

use clap::Parser;
use tokio::io::AsyncBufReadExt;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tether_client::{Client, ClientConfig};
use tether_core::Payload;

/// tether: resilient duplex messaging client
#[derive(Parser, Debug)]
#[command(name = "tether")]
#[command(about = "Resilient duplex messaging client with reconnect and heartbeats")]
struct Args {
    /// URL of the relay endpoint
    #[arg(default_value = "ws://localhost:8765")]
    url: String,

    /// Heartbeat interval in milliseconds
    #[arg(long, default_value = "30000")]
    heartbeat_interval: u64,

    /// Initial reconnect delay in milliseconds
    #[arg(long, default_value = "1000")]
    initial_delay: u64,

    /// Maximum reconnect delay in milliseconds
    #[arg(long, default_value = "30000")]
    max_delay: u64,

    /// Bound on the outbound queue (unbounded if omitted)
    #[arg(long)]
    queue_capacity: Option<usize>,

    /// Text message to send once connected (repeatable)
    #[arg(long = "send")]
    messages: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ClientConfig {
        url: args.url.clone(),
        heartbeat_interval_ms: args.heartbeat_interval,
        initial_delay_ms: args.initial_delay,
        max_delay_ms: args.max_delay,
        queue_capacity: args.queue_capacity,
    };

    let mut client = Client::new(config);

    // Queued before the first connect; drained on the open transition.
    for content in &args.messages {
        client.send(Payload::text(content.clone())).await?;
    }

    // Stdin lines become text payloads. EOF closes the channel; the
    // connection keeps running for inbound traffic.
    let (input_tx, input_rx) = tokio::sync::mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if input_tx.send(line).is_err() {
                break;
            }
        }
    });

    info!("connecting to {}", args.url);
    tokio::select! {
        result = client.run_with_input(input_rx) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received, shutting down");
        }
    }
    client.dispose().await?;

    Ok(())
}
