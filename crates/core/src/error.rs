// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tether Contributors

//! Error types for tether-core operations.

use thiserror::Error;

/// All possible errors that can occur at the wire-codec level.
#[derive(Debug, Error)]
pub enum Error {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed frame: {0}")]
    MalformedFrame(String),
}

/// A specialized Result type for tether-core operations.
pub type Result<T> = std::result::Result<T, Error>;
