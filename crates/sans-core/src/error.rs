// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Sans UI.

use thiserror::Error;

/// Top-level error type for all Sans UI operations.
#[derive(Debug, Error)]
pub enum SansError {
    // -- Bridge transport --
    #[error("native transport unavailable: {0}")]
    TransportUnavailable(String),

    #[error("native bridge not initialized (channel handshake has not completed)")]
    NotInitialized,

    /// Error string reported by the native host in a reply message.
    #[error("{0}")]
    Native(String),

    #[error("native channel write failed: {0}")]
    Channel(String),

    #[error("native channel closed before a reply arrived")]
    ChannelClosed,

    #[error("bridge call {id} timed out after {after_ms}ms")]
    Timeout { id: String, after_ms: u64 },

    // -- Adapter layer --
    #[error("adapter not initialized")]
    AdapterNotInitialized,

    #[error("element {0} is not owned by this adapter")]
    UnknownElement(String),

    #[error("unknown event name: {0}")]
    UnknownEvent(String),

    #[error("unknown component type: {0}")]
    UnknownComponent(String),

    #[error("invalid `{property}` shorthand: expected 1 to 4 values, got {tokens}")]
    InvalidShorthand { property: String, tokens: usize },

    // -- Configuration / persistence --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SansError {
    /// Whether this error came back from the native side rather than from the
    /// local transport. Native errors are always recoverable by the caller.
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native(_))
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SansError>;
