// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub channel for processes that are not hosted by a native container.
//
// Every request is refused before anything is written.

use sans_core::error::{Result, SansError};

use crate::message::OutboundMessage;
use crate::traits::OutboundChannel;

/// Channel returned when no native host is present.
#[derive(Debug, Clone)]
pub struct UnavailableChannel {
    reason: String,
}

impl UnavailableChannel {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for UnavailableChannel {
    fn default() -> Self {
        Self::new("not running inside a native container")
    }
}

impl OutboundChannel for UnavailableChannel {
    fn container(&self) -> &'static str {
        "none"
    }

    fn ready(&self) -> Result<()> {
        Err(SansError::TransportUnavailable(self.reason.clone()))
    }

    fn write(&self, message: &OutboundMessage) -> Result<()> {
        tracing::warn!(action = %message.action, "write attempted on stub channel");
        Err(SansError::TransportUnavailable(self.reason.clone()))
    }
}
