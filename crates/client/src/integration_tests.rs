// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tether Contributors

//! Scenario tests driving the whole client through outage/recovery cycles.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use tokio::sync::mpsc;

use tether_core::Payload;

use super::client::Client;
use super::dispatch_tests::RecordingSink;
use super::reconnect::ConnectionState;
use super::test_helpers::{decode_frame, make_config};
use super::transport::Transport;
use super::transport_tests::MockTransport;

fn make_client() -> (Client<MockTransport>, MockTransport, RecordingSink) {
    let transport = MockTransport::new();
    let sink = RecordingSink::new();
    let client =
        Client::with_transport_and_sink(make_config(), transport.clone(), Box::new(sink.clone()));
    (client, transport, sink)
}

#[tokio::test]
async fn test_outage_then_recovery_preserves_messages_and_order() {
    let (mut client, transport, _) = make_client();

    // First connection succeeds and carries one message.
    client.connect().await.unwrap();
    client.send(Payload::text("before-outage")).await.unwrap();

    // The peer drops us; two messages arrive during the outage.
    client.recv().await.unwrap(); // empty script: peer closed
    assert_eq!(client.state(), ConnectionState::Reconnecting);
    client.send(Payload::text("during-1")).await.unwrap();
    client.send(Payload::text("during-2")).await.unwrap();
    assert_eq!(client.pending_messages(), 2);

    // The retry timer fires, the attempt succeeds, the queue drains.
    let timer = client.pending_timer().expect("retry pending");
    assert_eq!(timer.delay, Duration::from_millis(1_000));
    assert!(client.retry_elapsed(timer.generation));
    client.connect().await.unwrap();

    // A post-recovery send lands after the drained entries.
    client.send(Payload::text("after")).await.unwrap();

    let contents: Vec<String> = transport
        .outgoing()
        .iter()
        .map(|frame| match decode_frame(frame).payload {
            Payload::Text { content } => content,
            other => panic!("unexpected payload {other:?}"),
        })
        .collect();
    assert_eq!(contents, vec!["before-outage", "during-1", "during-2", "after"]);
}

#[tokio::test]
async fn test_backoff_resets_after_recovery() {
    let (mut client, transport, _) = make_client();
    transport.fail_next_connects(2);

    // Two failures: 1000 then 2000.
    client.connect().await.unwrap();
    let timer = client.pending_timer().unwrap();
    assert_eq!(timer.delay, Duration::from_millis(1_000));
    client.retry_elapsed(timer.generation);

    client.connect().await.unwrap();
    let timer = client.pending_timer().unwrap();
    assert_eq!(timer.delay, Duration::from_millis(2_000));
    client.retry_elapsed(timer.generation);

    // Recovery, then the next failure starts over at the base delay.
    client.connect().await.unwrap();
    assert_eq!(client.state(), ConnectionState::Open);

    client.recv().await.unwrap(); // peer closes again
    let timer = client.pending_timer().unwrap();
    assert_eq!(timer.delay, Duration::from_millis(1_000));
}

#[tokio::test]
async fn test_full_session_heartbeat_and_acks() {
    let (mut client, transport, sink) = make_client();
    let now = tether_core::codec::unix_millis();
    transport.queue_incoming(format!(
        r#"{{"type":"heartbeat_ack","timestamp":{now},"status":"heartbeat received"}}"#
    ));
    transport.queue_incoming(r#"{"type":"ack","content":"hi"}"#);
    transport.queue_incoming(r#"{"type":"unknown_kind","data":1}"#);

    client.connect().await.unwrap();
    client.send_probe().await.unwrap();
    client.send(Payload::text("hi")).await.unwrap();

    client.recv().await.unwrap();
    client.recv().await.unwrap();
    client.recv().await.unwrap();

    assert!(client.latency().is_some());
    let targets: Vec<String> = sink.updates().into_iter().map(|(t, _, _)| t).collect();
    // Exactly two updates: the unknown kind produced none.
    assert_eq!(targets, vec!["heartbeat-status", "ack-status"]);
}

#[tokio::test]
async fn test_error_storm_during_outage_leaves_single_timer() {
    let (mut client, transport, _) = make_client();
    client.connect().await.unwrap();

    // First error schedules the retry.
    let timer = client.handle_error().await.unwrap();
    assert!(timer.is_some());

    // A storm of further close/error events changes nothing.
    for _ in 0..5 {
        assert!(client.handle_close().is_none());
        assert!(client.handle_error().await.unwrap().is_none());
    }
    assert_eq!(client.pending_timer(), timer);
    // The forced close took the transport down.
    assert!(!transport.is_connected());
}

#[tokio::test(start_paused = true)]
async fn test_run_recovers_after_backoff_and_resumes_traffic() {
    let (mut client, transport, sink) = make_client();
    transport.fail_next_connects(2);
    transport.queue_incoming(r#"{"type":"metrics_ack","status":"ok"}"#);
    client.send(Payload::text("hi")).await.unwrap();

    // Two failed attempts wait 1s then 2s of virtual time; the third
    // connects, drains the queue, and pumps events until the peer closes.
    tokio::select! {
        result = client.run() => result.unwrap(),
        _ = tokio::time::sleep(Duration::from_millis(3_500)) => {}
    }

    let outgoing = transport.outgoing();
    assert_eq!(decode_frame(&outgoing[0]).payload, Payload::text("hi"));
    assert!(outgoing
        .iter()
        .any(|frame| matches!(decode_frame(frame).payload, Payload::Heartbeat { .. })));
    assert!(sink.updates().iter().any(|(target, _, _)| target == "metrics-status"));

    // The peer-close after recovery rescheduled from the base delay again.
    assert_eq!(client.state(), ConnectionState::Reconnecting);
    assert_eq!(client.pending_timer().unwrap().delay, Duration::from_millis(1_000));
}

#[tokio::test(start_paused = true)]
async fn test_run_queues_input_lines_during_outage() {
    let (mut client, transport, _) = make_client();
    transport.fail_next_connects(1);

    let (input_tx, input_rx) = mpsc::unbounded_channel();
    input_tx.send("typed-offline".to_string()).unwrap();

    tokio::select! {
        result = client.run_with_input(input_rx) => result.unwrap(),
        _ = tokio::time::sleep(Duration::from_millis(1_500)) => {}
    }

    // The line entered while disconnected went out on the recovery flush,
    // with a correlation id assigned like any other send.
    let envelope = decode_frame(&transport.outgoing()[0]);
    assert_eq!(envelope.payload, Payload::text("typed-offline"));
    assert!(envelope.id.is_some());
}

#[tokio::test]
async fn test_stale_timer_after_dispose_never_reconnects() {
    let (mut client, _, _) = make_client();
    client.connect().await.unwrap();

    client.handle_close();
    let timer = client.pending_timer().unwrap();

    client.dispose().await.unwrap();

    assert!(!client.retry_elapsed(timer.generation));
    assert_eq!(client.state(), ConnectionState::Closed);
}
