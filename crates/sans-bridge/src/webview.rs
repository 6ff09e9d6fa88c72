// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// WebView container channel (iOS WKWebView style).
//
// Outbound requests are posted as structured objects to the script message
// handler the host registered. Replies come back through the inbound global
// the host evaluates (`receiveNativeMessage(json)`), which maps to
// `BridgeTransport::receive_native_message`.

use std::sync::Arc;

use tracing::trace;

use sans_core::error::{Result, SansError};

use crate::message::OutboundMessage;
use crate::traits::{OutboundChannel, ScriptMessageHandler};

pub struct WebViewChannel {
    handler: Option<Arc<dyn ScriptMessageHandler>>,
    handler_name: String,
}

impl WebViewChannel {
    /// `handler` is `None` when the process is not hosted by a WebView
    /// container (no message handler was injected).
    pub fn new(handler: Option<Arc<dyn ScriptMessageHandler>>, handler_name: impl Into<String>) -> Self {
        Self {
            handler,
            handler_name: handler_name.into(),
        }
    }

    fn handler(&self) -> Result<&Arc<dyn ScriptMessageHandler>> {
        self.handler.as_ref().ok_or_else(|| {
            SansError::TransportUnavailable("not running in a native WKWebView".into())
        })
    }
}

impl OutboundChannel for WebViewChannel {
    fn container(&self) -> &'static str {
        "wkwebview"
    }

    fn ready(&self) -> Result<()> {
        self.handler().map(|_| ())
    }

    fn write(&self, message: &OutboundMessage) -> Result<()> {
        let handler = self.handler()?;
        let body = serde_json::to_value(message)?;
        trace!(handler = %self.handler_name, id = %message.id, "posting to script message handler");
        handler.post_message(body)
    }
}
