// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tether Contributors

//! Heartbeat liveness probes and round-trip latency tracking.
//!
//! While the connection is open, a probe carrying the current wall clock is
//! sent every interval; the relay echoes the timestamp in its reply and the
//! difference is the measured round trip. Probes are spaced one full
//! interval apart, so there is at most one in flight and replies are matched
//! by kind rather than correlation id. Probe scheduling stops the instant
//! the connection leaves the open state.

use std::time::Duration;

use tether_core::Payload;

/// Tracks probe cadence and the last measured round-trip latency.
#[derive(Debug)]
pub struct HeartbeatMonitor {
    interval: Duration,
    latency: Option<Duration>,
}

impl HeartbeatMonitor {
    /// Creates a monitor probing every `interval`.
    pub fn new(interval: Duration) -> Self {
        HeartbeatMonitor { interval, latency: None }
    }

    /// Probe spacing.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Builds the probe payload for the given wall clock reading.
    pub fn probe(&self, now_ms: u64) -> Payload {
        Payload::heartbeat(now_ms)
    }

    /// Records the round trip for a reply echoing `sent_ms`, observed at
    /// `now_ms`.
    ///
    /// Saturates at zero under clock skew rather than panicking.
    pub fn observe_reply(&mut self, sent_ms: u64, now_ms: u64) -> Duration {
        let latency = Duration::from_millis(now_ms.saturating_sub(sent_ms));
        self.latency = Some(latency);
        latency
    }

    /// Last measured round-trip latency, if any reply has been seen.
    pub fn latency(&self) -> Option<Duration> {
        self.latency
    }
}
