// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-process stand-in for a native WebView host.
//
// Plays the container's side of the bridge: takes structured requests from
// the script message handler and answers each one on a later scheduler turn,
// the way a real host evaluates the inbound function asynchronously.

use std::sync::Mutex;

use serde_json::{Value, json};
use tracing::{debug, info, trace, warn};

use sans_bridge::traits::ScriptMessageHandler;
use sans_bridge::{InboundMessage, InboundSink, OutboundMessage};
use sans_core::SansConfig;
use sans_core::error::Result;

pub struct LoopbackHost {
    inbound_function: String,
    sink: Mutex<Option<InboundSink>>,
    handled: Mutex<Vec<String>>,
}

impl LoopbackHost {
    pub fn new(config: &SansConfig) -> Self {
        Self {
            inbound_function: config.inbound_function.clone(),
            sink: Mutex::new(None),
            handled: Mutex::new(Vec::new()),
        }
    }

    /// Connect the host's reply path to a transport's inbound entry point.
    pub fn attach(&self, sink: InboundSink) {
        *self.sink.lock().unwrap_or_else(|e| e.into_inner()) = Some(sink);
    }

    /// Actions handled so far, in arrival order.
    pub fn handled(&self) -> Vec<String> {
        self.handled.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Build the host's reply to one request.
    pub fn answer(request: &OutboundMessage) -> InboundMessage {
        let data = &request.data;
        let id = request.id.as_str();
        match request.action.as_str() {
            "navigate" => match non_empty(data, "url") {
                Some(url) => {
                    info!(url, "host: navigate");
                    InboundMessage::success(id, Value::Bool(true))
                }
                None => InboundMessage::failure(id, "Invalid URL"),
            },
            "reload" => InboundMessage::success(id, Value::Bool(true)),
            "executeJavaScript" => match non_empty(data, "code") {
                Some(code) => {
                    debug!(code, "host: execute script");
                    InboundMessage::success(id, json!({ "result": null }))
                }
                None => InboundMessage::failure(id, "Invalid JavaScript code"),
            },
            // No dialog to show; an empty path is what a cancelled dialog returns.
            "openFileDialog" => InboundMessage::success(id, Value::String(String::new())),
            "showNotification" => {
                let title = non_empty(data, "title").unwrap_or("Notification");
                let text = non_empty(data, "text").unwrap_or("");
                info!(title, text, "host: notification");
                InboundMessage::success(id, Value::Bool(true))
            }
            other => InboundMessage::failure(id, format!("Unknown action: {other}")),
        }
    }

    fn reply(&self, message: InboundMessage) -> Result<()> {
        let json = serde_json::to_string(&message)?;
        let script = message.to_script(&self.inbound_function)?;
        trace!(%script, "host: evaluate reply");
        let Some(sink) = self.sink.lock().unwrap_or_else(|e| e.into_inner()).clone() else {
            warn!(id = %message.id, "host has no reply path attached");
            return Ok(());
        };
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    tokio::task::yield_now().await;
                    sink.deliver(&json);
                });
            }
            Err(_) => sink.deliver(&json),
        }
        Ok(())
    }
}

fn non_empty<'a>(data: &'a Value, key: &str) -> Option<&'a str> {
    data.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

impl ScriptMessageHandler for LoopbackHost {
    fn post_message(&self, body: Value) -> Result<()> {
        match serde_json::from_value::<OutboundMessage>(body) {
            Ok(request) => {
                self.handled
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .push(request.action.clone());
                self.reply(Self::answer(&request))
            }
            Err(e) => {
                warn!(error = %e, "host: invalid message format");
                self.reply(InboundMessage::failure("unknown", "Invalid message format"))
            }
        }
    }
}
