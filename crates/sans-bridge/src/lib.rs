// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sans UI — Native bridge.
//
// Script code running inside a web view reaches host-native operations
// (navigation, script execution, file dialogs, notifications) through a
// one-way message channel. This crate layers request/response correlation on
// top of that channel and provides the two container flavours: a WebView
// container with a script message handler, and a WebEngine container whose
// channel must be negotiated first.

pub mod message;
pub mod pending;
pub mod session;
pub mod stub;
pub mod traits;
pub mod transport;
pub mod webengine;
pub mod webview;

pub use message::{Action, FileDialogOptions, InboundMessage, NotificationOptions, OutboundMessage};
pub use pending::{DiagnosticsHook, DroppedMessage, InboundSink};
pub use session::{HostBindings, SessionMode, WebViewSession};
pub use transport::{BridgeTransport, PendingReply};
pub use webengine::WebEngineTransport;

use std::sync::Arc;

use sans_core::SansConfig;

/// Build the bridge transport for whatever native container hosts this
/// process. Without a host binding this returns a transport that refuses
/// every request.
pub fn platform_bridge(bindings: &HostBindings, config: &SansConfig) -> NativeBridge {
    if let Some(handler) = &bindings.script_handler {
        NativeBridge::WebView(BridgeTransport::webview(Some(Arc::clone(handler)), config))
    } else if let Some(host) = &bindings.web_channel {
        NativeBridge::WebEngine(WebEngineTransport::new(Some(Arc::clone(host)), config))
    } else {
        NativeBridge::Unavailable(BridgeTransport::unavailable(config))
    }
}

/// Transport chosen by [`platform_bridge`].
pub enum NativeBridge {
    WebView(BridgeTransport),
    /// Needs [`WebEngineTransport::initialize`] before use.
    WebEngine(WebEngineTransport),
    Unavailable(BridgeTransport),
}

impl NativeBridge {
    pub fn transport(&self) -> &BridgeTransport {
        match self {
            Self::WebView(transport) | Self::Unavailable(transport) => transport,
            Self::WebEngine(engine) => engine.bridge(),
        }
    }
}
