// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// WebEngine container channel (Qt WebEngine / QWebChannel style).
//
// Outbound requests are JSON strings handed to the `bridge` object the host
// publishes on its web channel. That object only exists once the channel
// handshake has completed; until then every request fails with
// `NotInitialized` instead of being queued. Replies arrive on the object's
// `messageReceived` signal.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::oneshot;
use tracing::{debug, error, info, instrument};

use sans_core::SansConfig;
use sans_core::error::{Result, SansError};

use crate::message::OutboundMessage;
use crate::traits::{BridgeObject, ChannelObjects, OutboundChannel, WebChannelHost};
use crate::transport::BridgeTransport;

pub struct WebEngineChannel {
    host: Option<Arc<dyn WebChannelHost>>,
    object_name: String,
    bridge: Mutex<Option<Arc<dyn BridgeObject>>>,
}

impl WebEngineChannel {
    fn new(host: Option<Arc<dyn WebChannelHost>>, object_name: String) -> Self {
        Self {
            host,
            object_name,
            bridge: Mutex::new(None),
        }
    }

    fn bridge(&self) -> MutexGuard<'_, Option<Arc<dyn BridgeObject>>> {
        self.bridge.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn connected(&self) -> Result<Arc<dyn BridgeObject>> {
        if self.host.is_none() {
            return Err(SansError::TransportUnavailable(
                "not running in Qt WebEngine".into(),
            ));
        }
        self.bridge().clone().ok_or(SansError::NotInitialized)
    }
}

impl OutboundChannel for WebEngineChannel {
    fn container(&self) -> &'static str {
        "webengine"
    }

    fn ready(&self) -> Result<()> {
        self.connected().map(|_| ())
    }

    fn write(&self, message: &OutboundMessage) -> Result<()> {
        let bridge = self.connected()?;
        let json = serde_json::to_string(message)?;
        bridge.send_message(&json)
    }
}

/// Bridge transport for the WebEngine container, plus its handshake.
pub struct WebEngineTransport {
    transport: BridgeTransport,
    channel: Arc<WebEngineChannel>,
}

impl WebEngineTransport {
    /// `host` is `None` when the process is not inside a WebEngine container.
    pub fn new(host: Option<Arc<dyn WebChannelHost>>, config: &SansConfig) -> Self {
        let channel = Arc::new(WebEngineChannel::new(host, config.channel_object.clone()));
        let transport = BridgeTransport::new(Box::new(Arc::clone(&channel)), config);
        Self { transport, channel }
    }

    /// Negotiate the web channel with the host and wait for it to complete.
    /// Does nothing once the channel is up.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<()> {
        if self.is_initialized() {
            debug!("web channel already initialized");
            return Ok(());
        }
        let host = self.channel.host.clone().ok_or_else(|| {
            SansError::TransportUnavailable("not running in Qt WebEngine".into())
        })?;

        let (ready, objects) = oneshot::channel();
        host.open_channel(ready);
        let objects = objects
            .await
            .map_err(|_| SansError::Channel("web channel negotiation abandoned by host".into()))?;

        self.complete_handshake(objects)
    }

    /// Adopt the objects published by a completed handshake. Fails if the
    /// expected bridge object is not among them. A second handshake keeps the
    /// first bridge object so `messageReceived` is connected only once.
    pub fn complete_handshake(&self, objects: ChannelObjects) -> Result<()> {
        let mut current = self.channel.bridge();
        if current.is_some() {
            debug!("web channel already initialized, ignoring handshake");
            return Ok(());
        }
        let name = &self.channel.object_name;
        let Some(bridge) = objects.get(name).cloned() else {
            error!(object = %name, "bridge object not found in web channel");
            return Err(SansError::Channel(format!(
                "bridge object `{name}` not found in web channel"
            )));
        };

        bridge.connect_message_received(self.transport.inbound());
        *current = Some(bridge);
        info!("Qt WebEngine bridge initialized");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.channel.bridge().is_some()
    }

    pub fn bridge(&self) -> &BridgeTransport {
        &self.transport
    }
}
