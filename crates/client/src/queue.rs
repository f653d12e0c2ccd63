// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tether Contributors

//! Outbound queue for messages sent while disconnected.
//!
//! Entries are already-serialized wire frames, held in memory in send-call
//! order and drained FIFO the moment the connection opens. The queue is
//! unbounded by default; deployments expecting prolonged outages can set a
//! capacity, in which case exceeding it is a hard send error rather than a
//! silent drop.

use std::collections::VecDeque;

/// Error type for queue operations.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// The configured capacity bound was reached.
    #[error("outbound queue full ({capacity} entries)")]
    Full {
        /// The configured bound.
        capacity: usize,
    },
}

/// Result type for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// FIFO buffer of serialized frames awaiting transmission.
#[derive(Debug, Default)]
pub struct OutboundQueue {
    entries: VecDeque<String>,
    capacity: Option<usize>,
}

impl OutboundQueue {
    /// Creates an unbounded queue.
    pub fn new() -> Self {
        OutboundQueue { entries: VecDeque::new(), capacity: None }
    }

    /// Creates a queue that rejects pushes beyond `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        OutboundQueue { entries: VecDeque::new(), capacity: Some(capacity) }
    }

    /// Appends a frame in send-call order.
    pub fn push(&mut self, frame: String) -> QueueResult<()> {
        if let Some(capacity) = self.capacity {
            if self.entries.len() >= capacity {
                return Err(QueueError::Full { capacity });
            }
        }
        self.entries.push_back(frame);
        Ok(())
    }

    /// Removes and returns the oldest frame.
    pub fn pop(&mut self) -> Option<String> {
        self.entries.pop_front()
    }

    /// Returns a frame to the head of the queue.
    ///
    /// Used when a drain is interrupted mid-flight so the frame keeps its
    /// position for the next flush.
    pub fn push_front(&mut self, frame: String) {
        self.entries.push_front(frame);
    }

    /// Number of queued frames.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
