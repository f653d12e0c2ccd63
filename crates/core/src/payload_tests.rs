// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tether Contributors

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use super::*;
use yare::parameterized;

#[parameterized(
    heartbeat = { Payload::heartbeat(1234), "heartbeat" },
    text = { Payload::text("hi"), "text" },
    heartbeat_ack = { Payload::HeartbeatAck { timestamp: 1234, status: "heartbeat received".to_string() }, "heartbeat_ack" },
    ack = { Payload::Ack { content: "hi".to_string() }, "ack" },
    metrics_ack = { Payload::MetricsAck { status: "ok".to_string() }, "metrics_ack" },
    alert = { Payload::Alert { status: "alert triggered".to_string() }, "alert" },
    config_ack = { Payload::ConfigAck { status: "updated".to_string() }, "config_ack" },
)]
fn payload_roundtrip_preserves_kind(payload: Payload, kind: &str) {
    let envelope = Envelope::with_id(7, payload.clone());
    let json = envelope.to_json().unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["type"], kind);

    let parsed = Envelope::from_json(&json).unwrap();
    assert_eq!(parsed.id, Some(7));
    assert_eq!(parsed.payload, payload);
}

#[test]
fn envelope_without_id_omits_field() {
    let json = Envelope::new(Payload::text("hi")).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value.get("id").is_none());
}

#[test]
fn unknown_kind_decodes_to_fallback() {
    let envelope = Envelope::from_json(r#"{"type":"unknown_kind","extra":1}"#).unwrap();
    match envelope.payload {
        Payload::Unknown(value) => {
            assert_eq!(value["type"], "unknown_kind");
            assert_eq!(value["extra"], 1);
        }
        other => panic!("expected Unknown, got {other:?}"),
    }
}

#[test]
fn heartbeat_wire_format() {
    let json = Envelope::new(Payload::heartbeat(42)).to_json().unwrap();
    assert_eq!(json, r#"{"type":"heartbeat","timestamp":42}"#);
}

#[test]
fn domain_ack_wire_format_matches_snake_case() {
    let envelope =
        Envelope::from_json(r#"{"type":"qos_ack","status":"QoS settings applied"}"#).unwrap();
    assert_eq!(
        envelope.payload,
        Payload::QosAck { status: "QoS settings applied".to_string() }
    );
}
