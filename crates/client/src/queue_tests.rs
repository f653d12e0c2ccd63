// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tether Contributors

//! Tests for the outbound queue.

#![allow(clippy::unwrap_used)]

use super::queue::{OutboundQueue, QueueError};

#[test]
fn drains_in_fifo_order() {
    let mut queue = OutboundQueue::new();
    queue.push("a".to_string()).unwrap();
    queue.push("b".to_string()).unwrap();
    queue.push("c".to_string()).unwrap();

    assert_eq!(queue.len(), 3);
    assert_eq!(queue.pop().as_deref(), Some("a"));
    assert_eq!(queue.pop().as_deref(), Some("b"));
    assert_eq!(queue.pop().as_deref(), Some("c"));
    assert_eq!(queue.pop(), None);
    assert!(queue.is_empty());
}

#[test]
fn push_front_restores_order_after_interrupted_drain() {
    let mut queue = OutboundQueue::new();
    queue.push("a".to_string()).unwrap();
    queue.push("b".to_string()).unwrap();

    // Simulate a failed transmission of the head entry.
    let head = queue.pop().unwrap();
    queue.push_front(head);

    assert_eq!(queue.pop().as_deref(), Some("a"));
    assert_eq!(queue.pop().as_deref(), Some("b"));
}

#[test]
fn unbounded_by_default() {
    let mut queue = OutboundQueue::new();
    for i in 0..10_000 {
        queue.push(format!("frame-{i}")).unwrap();
    }
    assert_eq!(queue.len(), 10_000);
}

#[test]
fn bounded_queue_rejects_overflow() {
    let mut queue = OutboundQueue::with_capacity(2);
    queue.push("a".to_string()).unwrap();
    queue.push("b".to_string()).unwrap();

    let err = queue.push("c".to_string()).unwrap_err();
    assert!(matches!(err, QueueError::Full { capacity: 2 }));

    // The rejected entry is not partially enqueued.
    assert_eq!(queue.len(), 2);
}

#[test]
fn bounded_queue_accepts_after_pop() {
    let mut queue = OutboundQueue::with_capacity(1);
    queue.push("a".to_string()).unwrap();
    assert!(queue.push("b".to_string()).is_err());

    queue.pop();
    queue.push("b".to_string()).unwrap();
    assert_eq!(queue.pop().as_deref(), Some("b"));
}
