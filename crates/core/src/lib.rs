// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tether Contributors

//! tether-core: Shared wire-level library for the tether messaging client.
//!
//! This crate provides the payload model, the envelope/codec layer, and the
//! error types used by both the tether client and the tether-relay server.

pub mod codec;
pub mod error;
pub mod payload;

pub use codec::{compress, decompress, unix_millis, Codec};
pub use error::{Error, Result};
pub use payload::{Envelope, Payload};
