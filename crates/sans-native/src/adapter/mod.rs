// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform adapters: one element lifecycle contract, three backends.
//
// An adapter whose toolkit is missing still implements the whole contract
// through fallback elements, so callers never branch on availability.

pub mod desktop;
pub mod mobile;
pub mod web;

pub use desktop::DesktopAdapter;
pub use mobile::MobileAdapter;
pub use web::WebAdapter;

use std::sync::Arc;

use tracing::{debug, warn};

use sans_core::error::{Result, SansError};
use sans_core::{ElementKind, EventHandler, EventKind, Platform, Props, UiEvent};

use crate::element::{ElementHandle, ElementRecord, ElementStore, Listener, NativeRef};
use crate::style::{StyleInput, StyleMap, StyleValue, camel_case};
use crate::toolkit::{ListenerId, NativeCallback};

/// Uniform element lifecycle over one backend.
pub trait PlatformAdapter: Send {
    fn platform(&self) -> Platform;

    /// Whether the native toolkit was available at construction.
    fn has_toolkit(&self) -> bool;

    fn store(&self) -> &ElementStore;

    /// Top-level container created at construction, if any.
    fn root(&self) -> Option<ElementHandle>;

    /// Never fails: without a toolkit the element is a fallback element.
    fn create_element(&mut self, kind: ElementKind, props: Props) -> ElementHandle;

    /// Merge `props` into the element and apply the ones the backend
    /// understands. Other scalar props are applied as styles.
    fn update_element(&mut self, handle: &ElementHandle, props: &Props) -> Result<()>;

    fn append_child(&mut self, parent: &ElementHandle, child: &ElementHandle) -> Result<()>;

    /// Detach and destroy `child` with its descendants. A child not
    /// attached to `parent` is left alone.
    fn remove_child(&mut self, parent: &ElementHandle, child: &ElementHandle) -> Result<()>;

    /// Attach `handler` for `event`, replacing any handler already attached
    /// for that event.
    fn set_event_handler(&mut self, handle: &ElementHandle, event: EventKind, handler: EventHandler) -> Result<()>;

    fn apply_styles(&mut self, handle: &ElementHandle, styles: &StyleInput) -> Result<()>;

    /// Release every element.
    fn destroy(&mut self);

    fn element(&self, handle: &ElementHandle) -> Option<&ElementRecord> {
        self.store().get(handle).ok()
    }

    /// Deliver `event` to a fallback element's handler. Native elements
    /// receive events from their toolkit and report `false`.
    fn emit(&self, handle: &ElementHandle, event: &UiEvent) -> Result<bool> {
        self.store().emit(handle, event)
    }
}

/// Props consumed by the adapters themselves and never forwarded as style.
const SEMANTIC_PROPS: [&str; 13] = [
    "text",
    "label",
    "disabled",
    "value",
    "placeholder",
    "src",
    "alt",
    "attributes",
    "style",
    "id",
    "key",
    "class",
    "className",
];

/// Style entries carried by `props`: the `style` prop itself plus every
/// string or number prop without a semantic meaning.
pub(crate) fn styles_from_props(props: &Props) -> StyleMap {
    let mut styles = props
        .get("style")
        .and_then(StyleInput::from_json)
        .map(|input| input.normalize())
        .unwrap_or_default();

    for (key, value) in props.iter() {
        if SEMANTIC_PROPS.contains(&key.as_str()) || !(value.is_string() || value.is_number()) {
            continue;
        }
        if let Some(value) = StyleValue::from_json(value) {
            styles.insert(camel_case(key), value);
        }
    }
    styles
}

/// Wrap a user handler as a toolkit callback that builds the `UiEvent`.
pub(crate) fn event_callback(kind: EventKind, handler: EventHandler) -> NativeCallback {
    Arc::new(move |payload: Option<&str>| {
        let event = UiEvent {
            kind,
            value: payload.map(str::to_string),
        };
        handler(&event);
    })
}

/// Shared `append_child` flow. `attach` returns `false` if the backend
/// refused the child; `detach` undoes a previous attachment.
pub(crate) fn append_child_with(
    store: &mut ElementStore,
    parent: &ElementHandle,
    child: &ElementHandle,
    attach: impl FnOnce(NativeRef, NativeRef) -> bool,
    mut detach: impl FnMut(NativeRef, NativeRef),
) -> Result<()> {
    store.get(parent)?;
    let old_parent = store.get(child)?.parent();

    if store.is_ancestor(child.id(), parent.id()) {
        warn!(parent = %parent.id(), child = %child.id(), "refusing to append an element into itself");
        return Ok(());
    }

    // Re-appending to the same parent moves the child to the end.
    if old_parent == Some(parent.id()) {
        detach(parent.native(), child.native());
        store.unlink(parent.id(), child.id());
    }

    // The old parent keeps the child until the new one has accepted it.
    if !attach(parent.native(), child.native()) {
        warn!(parent = %parent.id(), child = %child.id(), "parent cannot hold children");
        return Ok(());
    }
    if let Some(old) = old_parent.filter(|old| *old != parent.id()) {
        if let Some(old_native) = store.by_id(old).map(ElementRecord::native) {
            detach(old_native, child.native());
        }
        store.unlink(old, child.id());
    }
    store.link(parent.id(), child.id());
    Ok(())
}

/// Shared `remove_child` flow. `release` runs for the child and each of
/// its descendants after they leave the store.
pub(crate) fn remove_child_with(
    store: &mut ElementStore,
    parent: &ElementHandle,
    child: &ElementHandle,
    detach: impl FnOnce(NativeRef, NativeRef),
    mut release: impl FnMut(&ElementRecord),
) -> Result<()> {
    store.get(parent)?;
    if !store.is_child_of(parent.id(), child.id()) {
        debug!(parent = %parent.id(), child = %child.id(), "remove_child: not a child, ignoring");
        return Ok(());
    }

    detach(parent.native(), child.native());
    for record in store.remove_subtree(child.id()) {
        release(&record);
    }
    Ok(())
}

/// Shared `set_event_handler` flow. The previous handler for `event` is
/// disconnected before the new one is connected.
pub(crate) fn set_event_handler_with(
    store: &mut ElementStore,
    handle: &ElementHandle,
    event: EventKind,
    handler: EventHandler,
    native_name: &'static str,
    connect: impl FnOnce(NativeRef, NativeCallback) -> Option<ListenerId>,
    disconnect: impl FnOnce(NativeRef, &'static str, ListenerId),
) -> Result<()> {
    let record = store.get_mut(handle)?;
    let native = record.native();

    if let Some(Listener::Connected { name, listener }) = record.listeners.remove(&event) {
        disconnect(native, name, listener);
    }

    let listener = match native {
        NativeRef::Fallback => Listener::Stored(handler),
        _ => {
            let listener = connect(native, event_callback(event, handler))
                .ok_or_else(|| SansError::UnknownElement(handle.id().to_string()))?;
            Listener::Connected {
                name: native_name,
                listener,
            }
        }
    };
    record.replace_listener(event, listener);
    Ok(())
}

/// Connected listeners of `record`, for release.
pub(crate) fn connected_listeners(record: &ElementRecord) -> impl Iterator<Item = (&'static str, ListenerId)> + '_ {
    record.listeners.values().filter_map(|listener| match listener {
        Listener::Connected { name, listener } => Some((*name, *listener)),
        Listener::Stored(_) => None,
    })
}
