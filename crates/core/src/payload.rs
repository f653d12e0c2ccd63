// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tether Contributors

//! Wire payload model for client-relay communication.
//!
//! Every frame on the wire is a single JSON object with a `type`
//! discriminator plus kind-specific fields, optionally carrying a
//! correlation `id`. The known kinds form a closed tagged union; anything
//! else decodes into the `Unknown` fallback variant so that new server-side
//! kinds never break an older client.

use serde::{Deserialize, Serialize};

/// A tagged wire payload.
///
/// Outbound kinds are `heartbeat` and `text`; the remaining variants are
/// acknowledgement/status kinds produced by the relay. The `Unknown` variant
/// absorbs any unrecognized `type` value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Payload {
    /// Liveness probe carrying the sender's wall clock in milliseconds.
    Heartbeat {
        /// Milliseconds since Unix epoch at probe time, echoed by the reply.
        timestamp: u64,
    },

    /// Application text message.
    Text {
        /// Free-form message body.
        content: String,
    },

    /// Reply to a `Heartbeat`, echoing the probe timestamp.
    HeartbeatAck {
        /// Timestamp copied verbatim from the probe.
        timestamp: u64,
        /// Human-readable receipt note.
        status: String,
    },

    /// Generic acknowledgement of an application message.
    Ack {
        /// Content echoed from the acknowledged message.
        content: String,
    },

    /// Metrics channel acknowledgement.
    MetricsAck { status: String },

    /// Binary channel acknowledgement.
    BinaryAck { status: String },

    /// Alerting notification.
    Alert { status: String },

    /// Analytics channel acknowledgement.
    AnalyticsAck { status: String },

    /// Prioritization channel acknowledgement.
    PriorityAck { status: String },

    /// Routing channel acknowledgement.
    RoutingAck { status: String },

    /// API abstraction channel acknowledgement.
    ApiAck { status: String },

    /// Customization channel acknowledgement.
    CustomAck { status: String },

    /// Quality-of-service channel acknowledgement.
    QosAck { status: String },

    /// Dynamic configuration acknowledgement.
    ConfigAck { status: String },

    /// Any payload whose `type` is not in the closed set above.
    ///
    /// Kept as raw JSON so the frame can still be inspected or logged.
    #[serde(untagged)]
    Unknown(serde_json::Value),
}

impl Payload {
    /// Creates a heartbeat probe for the given wall clock reading.
    pub fn heartbeat(timestamp: u64) -> Self {
        Payload::Heartbeat { timestamp }
    }

    /// Creates a text message.
    pub fn text(content: impl Into<String>) -> Self {
        Payload::Text { content: content.into() }
    }
}

/// A payload plus its optional correlation identifier.
///
/// The correlation id associates a reply with the request that caused it.
/// It is absent until assigned at encode time; payloads are immutable once
/// serialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    /// Session-unique correlation identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// The tagged payload body.
    #[serde(flatten)]
    pub payload: Payload,
}

impl Envelope {
    /// Wraps a payload with no correlation id yet assigned.
    pub fn new(payload: Payload) -> Self {
        Envelope { id: None, payload }
    }

    /// Wraps a payload with an explicit correlation id.
    pub fn with_id(id: u64, payload: Payload) -> Self {
        Envelope { id: Some(id), payload }
    }

    /// Serializes the envelope to its wire form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes an envelope from its wire form.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl From<Payload> for Envelope {
    fn from(payload: Payload) -> Self {
        Envelope::new(payload)
    }
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
