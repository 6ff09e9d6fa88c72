// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pending-call registry.
//
// Replies are correlated purely by id, never by arrival order. Ids increase
// monotonically per registry and are never reused. A reply for an id that is
// not pending (already settled, timed out, or never issued) is dropped and
// reported through the diagnostics hook; it never touches other calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use sans_core::error::{Result, SansError};

use crate::message::InboundMessage;

type ReplySender = oneshot::Sender<Result<Value>>;

/// Receiving half handed back for every registered call.
pub type ReplyReceiver = oneshot::Receiver<Result<Value>>;

/// Inbound message the registry could not deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DroppedMessage {
    /// Not valid JSON, or not shaped like a reply.
    Malformed { raw: String, reason: String },
    /// Well-formed reply whose id is not pending.
    UnknownId { id: String },
}

/// Observer for dropped inbound messages.
pub type DiagnosticsHook = Arc<dyn Fn(&DroppedMessage) + Send + Sync>;

#[derive(Default)]
struct Calls {
    next_id: u64,
    pending: HashMap<String, ReplySender>,
}

/// Shared state for outstanding bridge calls.
pub struct CallRegistry {
    prefix: String,
    calls: Mutex<Calls>,
    diagnostics: Mutex<Option<DiagnosticsHook>>,
}

impl CallRegistry {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            calls: Mutex::new(Calls::default()),
            diagnostics: Mutex::new(None),
        }
    }

    fn calls(&self) -> MutexGuard<'_, Calls> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Allocate a fresh id and record a pending call for it.
    pub fn register(&self) -> (String, ReplyReceiver) {
        let (tx, rx) = oneshot::channel();
        let mut calls = self.calls();
        calls.next_id += 1;
        let id = format!("{}{}", self.prefix, calls.next_id);
        calls.pending.insert(id.clone(), tx);
        (id, rx)
    }

    /// Remove a pending call without settling it.
    pub fn forget(&self, id: &str) -> bool {
        self.calls().pending.remove(id).is_some()
    }

    /// Settle the call with `id`. Returns `false` if nothing was pending.
    pub fn settle(&self, id: &str, result: Result<Value>) -> bool {
        let Some(tx) = self.calls().pending.remove(id) else {
            return false;
        };
        // The caller may have stopped waiting; that is not our concern.
        let _ = tx.send(result);
        true
    }

    /// Single inbound entry point for raw reply JSON from the host.
    pub fn receive(&self, raw: &str) {
        let message: InboundMessage = match serde_json::from_str(raw) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "dropping malformed native message");
                self.report(DroppedMessage::Malformed {
                    raw: raw.to_string(),
                    reason: e.to_string(),
                });
                return;
            }
        };

        let result = match message.error() {
            Some(error) => Err(SansError::Native(error.to_string())),
            None => Ok(message.data.unwrap_or(Value::Null)),
        };

        if self.settle(&message.id, result) {
            debug!(id = %message.id, "bridge call settled");
        } else {
            warn!(id = %message.id, "dropping reply for unknown call id");
            self.report(DroppedMessage::UnknownId { id: message.id });
        }
    }

    /// Settle every pending call with an error produced by `make_error`.
    /// Returns how many calls were rejected.
    pub fn reject_all(&self, make_error: impl Fn() -> SansError) -> usize {
        let drained: Vec<ReplySender> = self.calls().pending.drain().map(|(_, tx)| tx).collect();
        let count = drained.len();
        for tx in drained {
            let _ = tx.send(Err(make_error()));
        }
        count
    }

    pub fn pending(&self) -> usize {
        self.calls().pending.len()
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.calls().pending.contains_key(id)
    }

    pub fn set_diagnostics(&self, hook: Option<DiagnosticsHook>) {
        *self.diagnostics.lock().unwrap_or_else(|e| e.into_inner()) = hook;
    }

    fn report(&self, dropped: DroppedMessage) {
        let hook = self
            .diagnostics
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        if let Some(hook) = hook {
            hook(&dropped);
        }
    }
}

/// Handle the native host calls to deliver replies (the
/// `receiveNativeMessage` global, or a `messageReceived` signal connection).
#[derive(Clone)]
pub struct InboundSink {
    registry: Arc<CallRegistry>,
}

impl InboundSink {
    pub fn new(registry: Arc<CallRegistry>) -> Self {
        Self { registry }
    }

    pub fn deliver(&self, raw: &str) {
        self.registry.receive(raw);
    }
}

impl std::fmt::Debug for InboundSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InboundSink")
            .field("pending", &self.registry.pending())
            .finish()
    }
}
