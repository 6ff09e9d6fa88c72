// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Host-facing seams of the bridge.
//
// The script side only ever talks to the host through a one-way write. What
// the write looks like differs per container; everything above it (ids,
// pending calls, reply correlation) is shared.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::oneshot;

use sans_core::error::Result;

use crate::message::OutboundMessage;
use crate::pending::InboundSink;

/// Outbound half of a native channel, as seen by `BridgeTransport`.
pub trait OutboundChannel: Send + Sync {
    /// Short container name used in logs.
    fn container(&self) -> &'static str;

    /// Fails when no write may be attempted (not inside the container, or
    /// the channel is not negotiated yet).
    fn ready(&self) -> Result<()>;

    /// Fire-and-forget write of one request.
    fn write(&self, message: &OutboundMessage) -> Result<()>;
}

impl<T: OutboundChannel + ?Sized> OutboundChannel for Arc<T> {
    fn container(&self) -> &'static str {
        (**self).container()
    }

    fn ready(&self) -> Result<()> {
        (**self).ready()
    }

    fn write(&self, message: &OutboundMessage) -> Result<()> {
        (**self).write(message)
    }
}

/// Script message handler registered by the WebView container
/// (`webkit.messageHandlers.<name>`). Receives the message as a structured
/// object.
pub trait ScriptMessageHandler: Send + Sync {
    fn post_message(&self, body: Value) -> Result<()>;
}

/// Object exposed by the WebEngine container on its web channel.
pub trait BridgeObject: Send + Sync {
    /// Receives the message as a JSON string.
    fn send_message(&self, message_json: &str) -> Result<()>;

    /// Route the object's `messageReceived` signal into `sink`.
    fn connect_message_received(&self, sink: InboundSink);
}

/// Objects published on a negotiated web channel, by name.
pub type ChannelObjects = HashMap<String, Arc<dyn BridgeObject>>;

/// Completion handle for a channel negotiation.
pub type ChannelReady = oneshot::Sender<ChannelObjects>;

/// Web channel transport injected by the WebEngine container.
pub trait WebChannelHost: Send + Sync {
    /// Begin negotiation. The host answers through `ready` once the channel
    /// is up; dropping `ready` abandons the handshake.
    fn open_channel(&self, ready: ChannelReady);
}
