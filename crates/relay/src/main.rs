// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tether Contributors

//! tether-relay: WebSocket acknowledgement server for tether clients.
//!
//! Answers every recognized request kind with the matching `*_ack` reply,
//! echoing heartbeat timestamps and message content so clients can measure
//! latency and confirm delivery.

mod server;

use clap::Parser;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// tether-relay: acknowledgement server for tether clients
#[derive(Parser, Debug)]
#[command(name = "tether-relay")]
#[command(about = "WebSocket acknowledgement server for tether clients")]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "0.0.0.0:8765")]
    bind: SocketAddr,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let listener = TcpListener::bind(args.bind).await?;
    info!("Listening on: {}", args.bind);

    server::run(listener).await?;
    Ok(())
}
