// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tether Contributors

//! Shared test helpers for client tests.

#![allow(clippy::unwrap_used)]

use tether_core::Envelope;

use crate::client::ClientConfig;

/// Config with the default delays and a mock URL.
pub fn make_config() -> ClientConfig {
    ClientConfig {
        url: "ws://mock".to_string(),
        heartbeat_interval_ms: 30_000,
        initial_delay_ms: 1_000,
        max_delay_ms: 30_000,
        queue_capacity: None,
    }
}

/// Decode a captured outgoing wire frame.
pub fn decode_frame(frame: &str) -> Envelope {
    Envelope::from_json(frame).unwrap()
}
