// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tether Contributors

//! Tests for the heartbeat monitor.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use tether_core::Payload;

use super::heartbeat::HeartbeatMonitor;

#[test]
fn probe_embeds_the_clock_reading() {
    let monitor = HeartbeatMonitor::new(Duration::from_secs(30));
    assert_eq!(monitor.probe(1234), Payload::Heartbeat { timestamp: 1234 });
}

#[test]
fn reply_latency_is_now_minus_embedded_time() {
    let mut monitor = HeartbeatMonitor::new(Duration::from_secs(30));
    assert_eq!(monitor.latency(), None);

    // Probe sent at t=0, reply observed at t=120.
    let latency = monitor.observe_reply(0, 120);

    assert_eq!(latency, Duration::from_millis(120));
    assert_eq!(monitor.latency(), Some(Duration::from_millis(120)));
}

#[test]
fn latest_reply_overwrites_previous_latency() {
    let mut monitor = HeartbeatMonitor::new(Duration::from_secs(30));
    monitor.observe_reply(0, 120);
    monitor.observe_reply(1_000, 1_045);

    assert_eq!(monitor.latency(), Some(Duration::from_millis(45)));
}

#[test]
fn clock_skew_saturates_to_zero() {
    let mut monitor = HeartbeatMonitor::new(Duration::from_secs(30));
    let latency = monitor.observe_reply(2_000, 1_000);

    assert_eq!(latency, Duration::ZERO);
}
