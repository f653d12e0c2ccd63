// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tether Contributors

//! Inbound dispatch: project acknowledgement payloads onto status updates.
//!
//! A fixed table maps each recognized inbound kind to a status target id;
//! every match emits exactly one update through the injected [`StatusSink`].
//! Unrecognized kinds are logged at debug and produce no update. The table
//! is a pure projection: nothing here feeds back into the reconnect
//! controller or the queue.

use tether_core::codec::unix_millis;
use tether_core::{Envelope, Payload};
use tracing::debug;

use crate::heartbeat::HeartbeatMonitor;

/// Status tag reported with every successful acknowledgement.
pub const STATUS_SUCCESS: &str = "success";

/// Receiver for status updates keyed by a target id.
///
/// Injected at client construction; the default [`TracingSink`] renders
/// updates as log lines for headless use.
pub trait StatusSink: Send {
    /// Reports `status` with a human-readable `message` for `target`.
    fn update(&self, target: &str, status: &str, message: &str);
}

/// Fallback sink writing status updates to the trace log.
#[derive(Debug, Default)]
pub struct TracingSink;

impl StatusSink for TracingSink {
    fn update(&self, target: &str, status: &str, message: &str) {
        tracing::info!("status [{target}]: {status} - {message}");
    }
}

/// Routes inbound payloads to status updates.
pub struct Router {
    sink: Box<dyn StatusSink>,
}

impl Router {
    /// Creates a router reporting through `sink`.
    pub fn new(sink: Box<dyn StatusSink>) -> Self {
        Router { sink }
    }

    /// Dispatches one inbound envelope.
    pub fn dispatch(&self, envelope: &Envelope, monitor: &mut HeartbeatMonitor) {
        self.dispatch_at(envelope, monitor, unix_millis());
    }

    /// Dispatch with an explicit clock reading, for deterministic tests.
    pub fn dispatch_at(&self, envelope: &Envelope, monitor: &mut HeartbeatMonitor, now_ms: u64) {
        match &envelope.payload {
            Payload::HeartbeatAck { timestamp, .. } => {
                let latency = monitor.observe_reply(*timestamp, now_ms);
                let message = format!("Latency: {} ms", latency.as_millis());
                self.sink.update("heartbeat-status", STATUS_SUCCESS, &message);
            }
            Payload::Ack { content } => {
                let message = format!("Content: {content}");
                self.sink.update("ack-status", STATUS_SUCCESS, &message);
            }
            Payload::MetricsAck { status } => {
                self.sink.update("metrics-status", STATUS_SUCCESS, status);
            }
            Payload::BinaryAck { status } => {
                self.sink.update("binary-data-status", STATUS_SUCCESS, status);
            }
            Payload::Alert { status } => {
                self.sink.update("alerting-status", STATUS_SUCCESS, status);
            }
            Payload::AnalyticsAck { status } => {
                self.sink.update("analytics-status", STATUS_SUCCESS, status);
            }
            Payload::PriorityAck { status } => {
                self.sink.update("prioritization-status", STATUS_SUCCESS, status);
            }
            Payload::RoutingAck { status } => {
                self.sink.update("routing-status", STATUS_SUCCESS, status);
            }
            Payload::ApiAck { status } => {
                self.sink.update("api-abstraction-status", STATUS_SUCCESS, status);
            }
            Payload::CustomAck { status } => {
                self.sink.update("customization-status", STATUS_SUCCESS, status);
            }
            Payload::QosAck { status } => {
                self.sink.update("qos-status", STATUS_SUCCESS, status);
            }
            Payload::ConfigAck { status } => {
                self.sink.update("dynamic-config-status", STATUS_SUCCESS, status);
            }
            // Outbound kinds echoed back, or anything outside the table:
            // observed, never an error, no status update.
            Payload::Heartbeat { .. } | Payload::Text { .. } => {
                debug!("ignoring inbound payload of outbound kind: {:?}", envelope.payload);
            }
            Payload::Unknown(value) => {
                debug!("received message: {value}");
            }
        }
    }
}
