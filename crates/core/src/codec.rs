// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tether Contributors

//! Envelope codec: serialization plus correlation-id assignment.
//!
//! The codec is the single place where outbound payloads acquire their
//! correlation id. Ids are drawn from a monotonic counter seeded with the
//! wall clock at session start, which makes them unique within a session
//! without any cross-session coordination.
//!
//! Also hosts the reversible "compression" transform applied by the
//! compressed send path. It is a placeholder that simply reverses the
//! character sequence; it reduces nothing but exercises the same wire path
//! a real codec would.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};
use crate::payload::{Envelope, Payload};

/// Milliseconds since the Unix epoch.
///
/// Clamps to zero if the system clock reads before the epoch.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Stateful encoder assigning session-unique correlation ids.
#[derive(Debug)]
pub struct Codec {
    /// Next correlation id to hand out.
    next_id: u64,
}

impl Codec {
    /// Creates a codec whose id sequence starts at the current wall clock.
    pub fn new() -> Self {
        Codec { next_id: unix_millis() }
    }

    /// Creates a codec with a fixed starting id, for deterministic tests.
    pub fn with_start_id(start: u64) -> Self {
        Codec { next_id: start }
    }

    /// Serializes a payload, assigning a correlation id if none is present.
    ///
    /// Serialization failure is a hard error: the payload is never queued
    /// or transmitted in a partial form.
    pub fn encode(&mut self, envelope: Envelope) -> Result<String> {
        let envelope = match envelope.id {
            Some(_) => envelope,
            None => Envelope { id: Some(self.assign_id()), ..envelope },
        };
        Ok(envelope.to_json()?)
    }

    /// Serializes a payload and applies the reversible transform.
    ///
    /// Shares the id-assignment behavior of [`Codec::encode`].
    pub fn encode_compressed(&mut self, envelope: Envelope) -> Result<String> {
        Ok(compress(&self.encode(envelope)?))
    }

    /// Encodes a payload with no pre-assigned correlation id.
    pub fn encode_payload(&mut self, payload: Payload) -> Result<String> {
        self.encode(Envelope::new(payload))
    }

    fn assign_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::new()
    }
}

/// Deserializes a wire frame into an envelope.
pub fn decode(text: &str) -> Result<Envelope> {
    Ok(Envelope::from_json(text)?)
}

/// Deserializes a frame that may have gone through the compressed path.
///
/// Tries the plain form first, then the reversed form. Used by the relay,
/// which cannot know which send path produced a frame.
pub fn decode_lenient(text: &str) -> Result<Envelope> {
    match Envelope::from_json(text) {
        Ok(envelope) => Ok(envelope),
        Err(_) => Envelope::from_json(&decompress(text))
            .map_err(|_| Error::MalformedFrame(truncate_for_log(text))),
    }
}

/// Reversible placeholder transform for the compressed send path.
pub fn compress(data: &str) -> String {
    data.chars().rev().collect()
}

/// Inverse of [`compress`].
pub fn decompress(data: &str) -> String {
    data.chars().rev().collect()
}

/// First characters of a bad frame, for log lines.
fn truncate_for_log(text: &str) -> String {
    const MAX: usize = 80;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
