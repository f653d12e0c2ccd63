// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tether Contributors

//! WebSocket server implementation.
//!
//! One task per connection; each inbound frame is decoded (accepting both
//! the plain and the reversed-transform form) and answered with the
//! matching acknowledgement. Malformed frames are logged and skipped, never
//! fatal to the connection.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use tether_core::{codec, Envelope, Payload};

/// Run the relay on the given listener until the process exits.
pub async fn run(listener: TcpListener) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    loop {
        let (stream, peer_addr) = listener.accept().await?;

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }
}

/// Handle a single WebSocket connection.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    info!("New WebSocket connection from: {}", peer_addr);

    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    loop {
        match ws_stream.next().await {
            Some(Ok(Message::Text(text))) => {
                if let Some(reply) = handle_frame(&text) {
                    ws_sink.send(Message::Text(reply.into())).await?;
                }
            }
            Some(Ok(Message::Close(_))) => {
                info!("Client {} disconnected", peer_addr);
                break;
            }
            Some(Ok(Message::Ping(data))) => {
                ws_sink.send(Message::Pong(data)).await?;
            }
            Some(Ok(_)) => {
                // Ignore other message types (Binary, Pong, Frame)
            }
            Some(Err(e)) => {
                error!("WebSocket error from {}: {}", peer_addr, e);
                break;
            }
            None => {
                info!("Client {} stream ended", peer_addr);
                break;
            }
        }
    }

    info!("Connection closed: {}", peer_addr);
    Ok(())
}

/// Decode one frame and build its acknowledgement, if any.
///
/// Accepts frames from both send paths (plain and reversed). A frame that
/// fails to decode either way is logged and dropped.
pub(crate) fn handle_frame(text: &str) -> Option<String> {
    let envelope = match codec::decode_lenient(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("Received invalid frame: {e}");
            return None;
        }
    };
    debug!("Received message: {:?}", envelope);

    let reply = ack_for(&envelope.payload)?;
    // Echo the correlation id so the client can match the reply.
    let reply = Envelope { id: envelope.id, payload: reply };
    match reply.to_json() {
        Ok(json) => Some(json),
        Err(e) => {
            error!("Failed to serialize reply: {e}");
            None
        }
    }
}

/// Acknowledgement table, mirroring the client's dispatch vocabulary.
fn ack_for(payload: &Payload) -> Option<Payload> {
    match payload {
        Payload::Heartbeat { timestamp } => Some(Payload::HeartbeatAck {
            timestamp: *timestamp,
            status: "heartbeat received".to_string(),
        }),
        Payload::Text { content } => Some(Payload::Ack { content: content.clone() }),
        Payload::Unknown(value) => {
            let kind = value.get("type").and_then(|t| t.as_str())?;
            Some(domain_ack(kind))
        }
        // Reply kinds arriving at the relay get no further acknowledgement.
        _ => None,
    }
}

/// Acknowledgements for the domain request kinds.
///
/// The alert reply keeps its own kind; unlisted kinds fall back to a
/// generic `<kind>_ack` shape so the client's default branch can observe
/// them.
fn domain_ack(kind: &str) -> Payload {
    fn s(status: &str) -> String {
        status.to_string()
    }
    match kind {
        "metrics" => Payload::MetricsAck { status: s("metrics collected") },
        "binary" => Payload::BinaryAck { status: s("binary data received") },
        "alert" => Payload::Alert { status: s("alert triggered") },
        "analytics" => Payload::AnalyticsAck { status: s("real-time analytics provided") },
        "priority" => Payload::PriorityAck { status: s("high-priority message processed") },
        "routing" => Payload::RoutingAck { status: s("message routed intelligently") },
        "api" => Payload::ApiAck { status: s("API abstraction tested") },
        "custom" => Payload::CustomAck { status: s("custom function executed") },
        "qos" => Payload::QosAck { status: s("QoS settings applied") },
        "config" => Payload::ConfigAck { status: s("dynamic configuration updated") },
        "session" => Payload::Unknown(json!({
            "type": "session_ack",
            "status": "session managed successfully",
        })),
        other => Payload::Unknown(json!({
            "type": format!("{other}_ack"),
            "status": "unknown message type",
        })),
    }
}
