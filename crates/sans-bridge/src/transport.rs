// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Request/response transport over a one-way native channel.
//
// `send_message` allocates an id, records a pending call and writes the
// request. The host later pushes a reply into `receive_native_message`, which
// settles the call with the same id. Every native capability (navigate,
// reload, script execution, dialogs, notifications) is an action name on this
// one mechanism.
//
// Known limitation: without `call_timeout_ms` a call whose host never replies
// stays pending until the transport is shut down or the caller drops the
// reply future.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};
use std::time::Duration;

use serde::Serialize;
use serde_json::{Value, json};
use tokio::time::{Instant, Sleep};
use tracing::{debug, instrument, warn};

use sans_core::SansConfig;
use sans_core::error::{Result, SansError};

use crate::message::{
    Action, ExecuteJavaScriptRequest, FileDialogOptions, NavigateRequest, NotificationOptions,
    OutboundMessage,
};
use crate::pending::{CallRegistry, DiagnosticsHook, InboundSink, ReplyReceiver};
use crate::stub::UnavailableChannel;
use crate::traits::{OutboundChannel, ScriptMessageHandler};
use crate::webview::WebViewChannel;

/// Script-side endpoint of the native bridge.
pub struct BridgeTransport {
    registry: Arc<CallRegistry>,
    channel: Box<dyn OutboundChannel>,
    timeout: Option<Duration>,
}

impl BridgeTransport {
    pub fn new(channel: Box<dyn OutboundChannel>, config: &SansConfig) -> Self {
        Self {
            registry: Arc::new(CallRegistry::new(config.id_prefix.clone())),
            channel,
            timeout: config.call_timeout(),
        }
    }

    /// Transport for a WebView container. `handler` is `None` outside one.
    pub fn webview(handler: Option<Arc<dyn ScriptMessageHandler>>, config: &SansConfig) -> Self {
        let channel = WebViewChannel::new(handler, config.message_handler.clone());
        Self::new(Box::new(channel), config)
    }

    /// Transport that refuses every request.
    pub fn unavailable(config: &SansConfig) -> Self {
        Self::new(Box::new(UnavailableChannel::default()), config)
    }

    /// Issue a request. Fails immediately, without writing anything, when
    /// the channel is not usable.
    #[instrument(skip_all, fields(container = self.channel.container()))]
    pub fn send_message(&self, action: impl Into<Action>, data: Value) -> Result<PendingReply> {
        self.channel.ready()?;

        let action = action.into();
        let (id, rx) = self.registry.register();
        let message = OutboundMessage {
            id: id.clone(),
            action: action.as_str().to_string(),
            data,
        };

        if let Err(e) = self.channel.write(&message) {
            self.registry.forget(&id);
            warn!(%id, error = %e, "native channel write failed");
            return Err(e);
        }

        debug!(%id, %action, "bridge call sent");
        let deadline = self.timeout.map(|after| (after, Instant::now() + after));
        Ok(PendingReply::new(id, rx, Arc::downgrade(&self.registry), deadline))
    }

    /// `send_message` and wait for the reply.
    pub async fn call(&self, action: impl Into<Action>, data: Value) -> Result<Value> {
        self.send_message(action, data)?.await
    }

    fn send_payload(&self, action: Action, payload: &impl Serialize) -> Result<PendingReply> {
        let data = serde_json::to_value(payload)?;
        self.send_message(action, data)
    }

    pub fn navigate(&self, url: &str) -> Result<PendingReply> {
        self.send_payload(Action::Navigate, &NavigateRequest { url: url.to_string() })
    }

    pub fn reload(&self) -> Result<PendingReply> {
        self.send_message(Action::Reload, json!({}))
    }

    pub fn execute_javascript(&self, code: &str) -> Result<PendingReply> {
        self.send_payload(
            Action::ExecuteJavaScript,
            &ExecuteJavaScriptRequest {
                code: code.to_string(),
            },
        )
    }

    pub fn open_file_dialog(&self, options: &FileDialogOptions) -> Result<PendingReply> {
        self.send_payload(Action::OpenFileDialog, options)
    }

    pub fn show_notification(&self, options: &NotificationOptions) -> Result<PendingReply> {
        self.send_payload(Action::ShowNotification, options)
    }

    /// Inbound entry point: raw reply JSON from the host.
    pub fn receive_native_message(&self, raw: &str) {
        self.registry.receive(raw);
    }

    /// Cloneable handle the host can keep to deliver replies.
    pub fn inbound(&self) -> InboundSink {
        InboundSink::new(Arc::clone(&self.registry))
    }

    /// Observe inbound messages that were dropped.
    pub fn set_diagnostics(&self, hook: Option<DiagnosticsHook>) {
        self.registry.set_diagnostics(hook);
    }

    pub fn pending_calls(&self) -> usize {
        self.registry.pending()
    }

    pub fn container(&self) -> &'static str {
        self.channel.container()
    }

    /// Reject every pending call with `ChannelClosed`.
    pub fn shutdown(&self) -> usize {
        let rejected = self.registry.reject_all(|| SansError::ChannelClosed);
        if rejected > 0 {
            debug!(rejected, "pending bridge calls rejected on shutdown");
        }
        rejected
    }
}

impl Drop for BridgeTransport {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Reply to one bridge call. Resolves with the host's `data`, or fails
/// with the host's `error`, `ChannelClosed` or `Timeout`.
///
/// The timeout counts from when the request was sent. The call is only
/// removed from the registry once the future is polled past its deadline
/// (or dropped).
///
/// Dropping it before it resolves discards the pending call; a late reply
/// for it is then treated as an unknown id.
pub struct PendingReply {
    id: String,
    rx: ReplyReceiver,
    registry: Weak<CallRegistry>,
    timeout: Option<(Duration, Instant)>,
    sleep: Option<Pin<Box<Sleep>>>,
    done: bool,
}

impl PendingReply {
    fn new(
        id: String,
        rx: ReplyReceiver,
        registry: Weak<CallRegistry>,
        timeout: Option<(Duration, Instant)>,
    ) -> Self {
        Self {
            id,
            rx,
            registry,
            timeout,
            sleep: None,
            done: false,
        }
    }

    /// Wire id of the call (`cb_<n>`).
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Future for PendingReply {
    type Output = Result<Value>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;

        match Pin::new(&mut this.rx).poll(cx) {
            Poll::Ready(Ok(result)) => {
                this.done = true;
                return Poll::Ready(result);
            }
            Poll::Ready(Err(_)) => {
                this.done = true;
                return Poll::Ready(Err(SansError::ChannelClosed));
            }
            Poll::Pending => {}
        }

        if let Some((after, deadline)) = this.timeout {
            // Registered on first poll so the timer lives on the caller's runtime.
            let sleep = this
                .sleep
                .get_or_insert_with(|| Box::pin(tokio::time::sleep_until(deadline)));
            if sleep.as_mut().poll(cx).is_ready() {
                this.done = true;
                if let Some(registry) = this.registry.upgrade() {
                    registry.forget(&this.id);
                }
                warn!(id = %this.id, "bridge call timed out");
                return Poll::Ready(Err(SansError::Timeout {
                    id: this.id.clone(),
                    after_ms: u64::try_from(after.as_millis()).unwrap_or(u64::MAX),
                }));
            }
        }

        Poll::Pending
    }
}

impl Drop for PendingReply {
    fn drop(&mut self) {
        if !self.done {
            if let Some(registry) = self.registry.upgrade() {
                registry.forget(&self.id);
            }
        }
    }
}

impl std::fmt::Debug for PendingReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingReply")
            .field("id", &self.id)
            .field("timeout", &self.timeout.map(|(after, _)| after))
            .field("done", &self.done)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Value>>);

    impl Recorder {
        fn posted(&self) -> Vec<Value> {
            self.0.lock().unwrap().clone()
        }
    }

    impl ScriptMessageHandler for Recorder {
        fn post_message(&self, body: Value) -> Result<()> {
            self.0.lock().unwrap().push(body);
            Ok(())
        }
    }

    struct Refusing;

    impl ScriptMessageHandler for Refusing {
        fn post_message(&self, _body: Value) -> Result<()> {
            Err(SansError::Channel("handler detached".into()))
        }
    }

    fn webview_transport() -> (BridgeTransport, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let transport = BridgeTransport::webview(Some(recorder.clone()), &SansConfig::default());
        (transport, recorder)
    }

    #[tokio::test]
    async fn replies_correlate_by_id_not_arrival_order() {
        let (transport, _) = webview_transport();
        let a = transport.send_message("navigate", json!({ "url": "https://a" })).unwrap();
        let b = transport.send_message("navigate", json!({ "url": "https://b" })).unwrap();
        assert_eq!(a.id(), "cb_1");
        assert_eq!(b.id(), "cb_2");

        transport.receive_native_message(r#"{"id":"cb_2","data":{"page":"b"}}"#);
        let b_value = b.await.unwrap();
        assert_eq!(b_value["page"], "b");
        assert_eq!(transport.pending_calls(), 1);

        transport.receive_native_message(r#"{"id":"cb_1","data":{"page":"a"}}"#);
        let a_value = a.await.unwrap();
        assert_eq!(a_value["page"], "a");
    }

    #[tokio::test]
    async fn unknown_reply_does_not_disturb_pending_calls() {
        let (transport, _) = webview_transport();
        let call = transport.reload().unwrap();

        transport.receive_native_message(r#"{"id":"cb_42","data":{}}"#);
        transport.receive_native_message("garbage");
        assert_eq!(transport.pending_calls(), 1);

        transport.receive_native_message(r#"{"id":"cb_1"}"#);
        assert_eq!(call.await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn native_error_rejects_only_that_call() {
        let (transport, _) = webview_transport();
        let bad = transport.navigate("").unwrap();
        let good = transport.reload().unwrap();

        transport.receive_native_message(r#"{"id":"cb_1","error":"Invalid URL"}"#);
        transport.receive_native_message(r#"{"id":"cb_2","data":{"ok":true}}"#);

        assert!(matches!(bad.await, Err(SansError::Native(msg)) if msg == "Invalid URL"));
        assert_eq!(good.await.unwrap()["ok"], true);
    }

    #[test]
    fn outside_container_rejects_without_writing() {
        let transport = BridgeTransport::webview(None, &SansConfig::default());
        let err = transport.navigate("https://x").unwrap_err();
        assert!(matches!(err, SansError::TransportUnavailable(_)));
        assert!(err.to_string().contains("WKWebView"));
        assert_eq!(transport.pending_calls(), 0);
    }

    #[test]
    fn stub_transport_rejects() {
        let transport = BridgeTransport::unavailable(&SansConfig::default());
        assert!(matches!(
            transport.reload(),
            Err(SansError::TransportUnavailable(_))
        ));
    }

    #[test]
    fn failed_write_discards_pending_call() {
        let transport = BridgeTransport::webview(Some(Arc::new(Refusing)), &SansConfig::default());
        assert!(matches!(transport.reload(), Err(SansError::Channel(_))));
        assert_eq!(transport.pending_calls(), 0);
    }

    #[test]
    fn derived_operations_use_fixed_action_names() {
        let (transport, recorder) = webview_transport();
        let _nav = transport.navigate("https://x").unwrap();
        let _reload = transport.reload().unwrap();
        let _js = transport.execute_javascript("1 + 1").unwrap();
        let _dialog = transport
            .open_file_dialog(&FileDialogOptions {
                title: Some("Pick".into()),
                ..Default::default()
            })
            .unwrap();
        let _note = transport
            .show_notification(&NotificationOptions::new("Hi", "there"))
            .unwrap();

        let posted = recorder.posted();
        let actions: Vec<&str> = posted.iter().map(|m| m["action"].as_str().unwrap()).collect();
        assert_eq!(
            actions,
            ["navigate", "reload", "executeJavaScript", "openFileDialog", "showNotification"]
        );
        assert_eq!(posted[0]["data"], json!({ "url": "https://x" }));
        assert_eq!(posted[1]["data"], json!({}));
        assert_eq!(posted[2]["data"], json!({ "code": "1 + 1" }));
        assert_eq!(posted[3]["data"], json!({ "title": "Pick" }));
        assert_eq!(posted[4]["data"], json!({ "title": "Hi", "text": "there" }));
    }

    #[tokio::test]
    async fn shutdown_rejects_pending_calls() {
        let (transport, _) = webview_transport();
        let call = transport.reload().unwrap();
        assert_eq!(transport.shutdown(), 1);
        assert!(matches!(call.await, Err(SansError::ChannelClosed)));
    }

    #[tokio::test]
    async fn dropping_transport_closes_pending_calls() {
        let (transport, _) = webview_transport();
        let call = transport.reload().unwrap();
        drop(transport);
        assert!(matches!(call.await, Err(SansError::ChannelClosed)));
    }

    #[test]
    fn dropped_reply_future_forgets_its_call() {
        let (transport, _) = webview_transport();
        let call = transport.reload().unwrap();
        assert_eq!(transport.pending_calls(), 1);
        drop(call);
        assert_eq!(transport.pending_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn opt_in_timeout_rejects_and_forgets() {
        let recorder = Arc::new(Recorder::default());
        let config = SansConfig {
            call_timeout_ms: Some(50),
            ..Default::default()
        };
        let transport = BridgeTransport::webview(Some(recorder), &config);
        let call = transport.reload().unwrap();

        let err = call.await.unwrap_err();
        assert!(matches!(err, SansError::Timeout { ref id, after_ms: 50 } if id == "cb_1"));
        assert_eq!(transport.pending_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_counts_from_send() {
        let recorder = Arc::new(Recorder::default());
        let config = SansConfig {
            call_timeout_ms: Some(50),
            ..Default::default()
        };
        let transport = BridgeTransport::webview(Some(recorder), &config);
        let call = transport.reload().unwrap();
        tokio::time::advance(Duration::from_millis(60)).await;

        // Already past its deadline: the first poll settles it.
        let settled = tokio::time::timeout(Duration::ZERO, call).await;
        assert!(matches!(settled, Ok(Err(SansError::Timeout { .. }))));
        assert_eq!(transport.pending_calls(), 0);
    }

    #[tokio::test]
    async fn call_helper_awaits_reply_from_host_task() {
        let (transport, _) = webview_transport();
        let inbound = transport.inbound();
        let host = tokio::spawn(async move {
            tokio::task::yield_now().await;
            inbound.deliver(r#"{"id":"cb_1","data":{"result":2}}"#);
        });

        let value = transport.call("executeJavaScript", json!({ "code": "1 + 1" })).await.unwrap();
        assert_eq!(value["result"], 2);
        host.await.unwrap();
    }
}
