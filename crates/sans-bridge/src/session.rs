// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Web view session: one navigation/scripting surface over whichever native
// container hosts the page, or a browser fallback when none does.

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info};

use sans_core::SansConfig;
use sans_core::error::{Result, SansError};

use crate::message::{FileDialogOptions, NotificationOptions};
use crate::traits::{ScriptMessageHandler, WebChannelHost};
use crate::transport::BridgeTransport;
use crate::webengine::WebEngineTransport;

/// What the host process injected into the page environment.
#[derive(Clone, Default)]
pub struct HostBindings {
    /// `webkit.messageHandlers.<name>` when hosted by a WebView container.
    pub script_handler: Option<Arc<dyn ScriptMessageHandler>>,
    /// `qt.webChannelTransport` when hosted by a WebEngine container.
    pub web_channel: Option<Arc<dyn WebChannelHost>>,
    pub user_agent: Option<String>,
}

impl HostBindings {
    fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or("")
    }

    fn looks_like_ios(&self) -> bool {
        let ua = self.user_agent();
        ["iPad", "iPhone", "iPod"].iter().any(|m| ua.contains(m))
    }

    fn looks_like_qt(&self) -> bool {
        self.web_channel.is_some() || self.user_agent().contains("Qt")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Bridged to a WebView container.
    WebView,
    /// Bridged to a WebEngine container.
    WebEngine,
    /// No native host; navigation is tracked locally.
    Fallback,
}

enum Backend {
    WebView(BridgeTransport),
    WebEngine(WebEngineTransport),
    Fallback,
}

pub struct WebViewSession {
    location: String,
    backend: Backend,
}

impl WebViewSession {
    /// Pick a backend the way the host environment dictates: an iOS user
    /// agent uses the WebView container, a Qt environment the WebEngine
    /// container; either degrades to fallback when its binding is missing.
    pub fn select(url: impl Into<String>, bindings: &HostBindings, config: &SansConfig) -> Self {
        let backend = if bindings.looks_like_ios() {
            match &bindings.script_handler {
                Some(handler) => Backend::WebView(BridgeTransport::webview(Some(handler.clone()), config)),
                None => Backend::Fallback,
            }
        } else if bindings.looks_like_qt() {
            match &bindings.web_channel {
                Some(host) => Backend::WebEngine(WebEngineTransport::new(Some(host.clone()), config)),
                None => Backend::Fallback,
            }
        } else {
            Backend::Fallback
        };

        let session = Self {
            location: url.into(),
            backend,
        };
        info!(mode = ?session.mode(), url = %session.location, "web view session selected");
        session
    }

    pub fn with_webview(url: impl Into<String>, transport: BridgeTransport) -> Self {
        Self {
            location: url.into(),
            backend: Backend::WebView(transport),
        }
    }

    pub fn with_webengine(url: impl Into<String>, transport: WebEngineTransport) -> Self {
        Self {
            location: url.into(),
            backend: Backend::WebEngine(transport),
        }
    }

    pub fn fallback(url: impl Into<String>) -> Self {
        Self {
            location: url.into(),
            backend: Backend::Fallback,
        }
    }

    pub fn mode(&self) -> SessionMode {
        match self.backend {
            Backend::WebView(_) => SessionMode::WebView,
            Backend::WebEngine(_) => SessionMode::WebEngine,
            Backend::Fallback => SessionMode::Fallback,
        }
    }

    /// Last location requested through this session.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Bridge transport, if the session is bridged to a native host.
    pub fn transport(&self) -> Option<&BridgeTransport> {
        match &self.backend {
            Backend::WebView(transport) => Some(transport),
            Backend::WebEngine(engine) => Some(engine.bridge()),
            Backend::Fallback => None,
        }
    }

    /// Finish any channel negotiation and load the initial location.
    /// A failed initial navigation is logged, not returned.
    pub async fn start(&self) -> Result<()> {
        if let Backend::WebEngine(engine) = &self.backend {
            engine.initialize().await?;
        }
        if let Some(transport) = self.transport() {
            if let Err(e) = transport.navigate(&self.location)?.await {
                error!(error = %e, url = %self.location, "initial navigation failed");
            }
        }
        Ok(())
    }

    pub async fn navigate(&mut self, url: &str) -> Result<Value> {
        self.location = url.to_string();
        match self.transport() {
            Some(transport) => transport.navigate(url)?.await,
            None => Ok(Value::Null),
        }
    }

    pub async fn reload(&self) -> Result<Value> {
        match self.transport() {
            Some(transport) => transport.reload()?.await,
            None => Ok(Value::Null),
        }
    }

    pub async fn execute_javascript(&self, code: &str) -> Result<Value> {
        match self.transport() {
            Some(transport) => transport.execute_javascript(code)?.await,
            None => Err(fallback_unavailable("script execution")),
        }
    }

    pub async fn open_file_dialog(&self, options: &FileDialogOptions) -> Result<Value> {
        match &self.backend {
            Backend::WebEngine(engine) => engine.bridge().open_file_dialog(options)?.await,
            _ => Err(fallback_unavailable("native file dialog")),
        }
    }

    pub async fn show_notification(&self, options: &NotificationOptions) -> Result<Value> {
        match &self.backend {
            Backend::WebEngine(engine) => engine.bridge().show_notification(options)?.await,
            _ => Err(fallback_unavailable("native notifications")),
        }
    }
}

fn fallback_unavailable(what: &str) -> SansError {
    SansError::TransportUnavailable(format!("{what} not available in fallback mode"))
}
