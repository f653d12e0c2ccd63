// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tether Contributors

//! tether-client: resilient duplex messaging over a single WebSocket.
//!
//! Maintains the illusion of a continuously available bidirectional channel
//! to one remote endpoint despite transient network failures:
//!
//! ```text
//! ┌──────────┐     ┌─────────────┐     ┌───────────┐
//! │  Client  │────►│  Transport  │────►│   Relay   │
//! │          │◄────│   (trait)   │◄────│  Server   │
//! └──────────┘     └─────────────┘     └───────────┘
//!      │
//!      ▼
//! ┌──────────┐
//! │  Queue   │  (messages sent while disconnected)
//! └──────────┘
//! ```
//!
//! # Features
//!
//! - Automatic reconnect with exponential backoff and generation-tagged
//!   retry timers
//! - Periodic heartbeat probes with round-trip latency tracking
//! - FIFO outbound queue flushed on reconnect
//! - Inbound dispatch to an injectable status sink
//! - Injectable transport trait for testing

mod client;
mod dispatch;
mod heartbeat;
mod queue;
mod reconnect;
mod transport;

pub use client::{Client, ClientConfig, ClientError, ClientResult};
pub use dispatch::{Router, StatusSink, TracingSink, STATUS_SUCCESS};
pub use heartbeat::HeartbeatMonitor;
pub use queue::{OutboundQueue, QueueError};
pub use reconnect::{Backoff, ConnectionState, ErrorAction, ReconnectController, RetryTimer};
pub use transport::{Transport, TransportError, TransportResult, WebSocketTransport};

#[cfg(test)]
mod test_helpers;



#[cfg(test)]
mod heartbeat_tests;

#[cfg(test)]
mod integration_tests;

#[cfg(test)]
mod queue_tests;
