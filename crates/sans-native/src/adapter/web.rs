// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Web adapter over the DOM.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use sans_core::error::Result;
use sans_core::{ElementKind, EventHandler, EventKind, Platform, Props, SansConfig};

use super::{
    PlatformAdapter, append_child_with, connected_listeners, remove_child_with, set_event_handler_with,
    styles_from_props,
};
use crate::element::{ElementHandle, ElementRecord, ElementStore, NativeRef};
use crate::style::{StyleInput, StyleMap};
use crate::toolkit::{DomDocument, DomTag, NativeId};

/// Class carried by the root element.
pub const ROOT_CLASS: &str = "sans-ui-root";

pub fn dom_tag(kind: ElementKind) -> DomTag {
    match kind {
        ElementKind::Button => DomTag::Button,
        ElementKind::Label => DomTag::Span,
        ElementKind::Textbox => DomTag::Input,
        ElementKind::Image => DomTag::Img,
        ElementKind::List => DomTag::Ul,
        ElementKind::Container => DomTag::Div,
    }
}

/// DOM event names match the abstract ones.
pub fn dom_event(event: EventKind) -> &'static str {
    event.as_str()
}

fn attribute_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub struct WebAdapter {
    document: Option<Arc<dyn DomDocument>>,
    store: ElementStore,
    root: Option<ElementHandle>,
}

impl WebAdapter {
    pub fn new(document: Option<Arc<dyn DomDocument>>, config: &SansConfig) -> Self {
        let mut adapter = Self {
            document,
            store: ElementStore::new(),
            root: None,
        };

        match &adapter.document {
            None => warn!("no DOM document available; elements will be fallbacks"),
            Some(document) if config.root_container => {
                let node = document.create_element(DomTag::Div);
                document.set_property(node, "className", ROOT_CLASS);
                document.append_child(document.body(), node);
                adapter.root = Some(adapter.store.insert(
                    ElementKind::Container,
                    NativeRef::Web { tag: DomTag::Div, node },
                    Props::new().with("className", ROOT_CLASS),
                ));
            }
            Some(_) => {}
        }
        adapter
    }

    fn apply_props(document: &dyn DomDocument, tag: DomTag, node: NativeId, props: &Props) {
        match tag {
            DomTag::Button => {
                if let Some(text) = props.text("label").or_else(|| props.text("text")) {
                    document.set_text_content(node, &text);
                }
            }
            DomTag::Span => {
                if let Some(text) = props.text("text") {
                    document.set_text_content(node, &text);
                }
            }
            DomTag::Input => {
                if let Some(value) = props.get_str("value") {
                    document.set_property(node, "value", value);
                }
                if let Some(placeholder) = props.get_str("placeholder") {
                    document.set_property(node, "placeholder", placeholder);
                }
            }
            DomTag::Img => {
                for name in ["src", "alt"] {
                    if let Some(value) = props.get_str(name) {
                        document.set_property(node, name, value);
                    }
                }
            }
            DomTag::Ul | DomTag::Div => {}
        }

        if let Some(disabled) = props.get_bool("disabled") {
            document.set_disabled(node, disabled);
        }
        if let Some(class) = props.get_str("className").or_else(|| props.get_str("class")) {
            document.set_property(node, "className", class);
        }
        if let Some(Value::Object(attributes)) = props.get("attributes") {
            for (name, value) in attributes {
                if let Some(value) = attribute_text(value) {
                    document.set_attribute(node, name, &value);
                }
            }
        }
    }

    fn merge_styles(&mut self, handle: &ElementHandle, styles: StyleMap) -> Result<()> {
        let record = self.store.get_mut(handle)?;
        if let (NativeRef::Web { node, .. }, Some(document)) = (record.native(), &self.document) {
            for (property, value) in &styles {
                document.set_style(node, property, &value.to_css(property));
            }
        }
        record.style.extend(styles);
        Ok(())
    }

    fn release(document: Option<&Arc<dyn DomDocument>>, record: &ElementRecord) {
        let (Some(document), NativeRef::Web { node, .. }) = (document, record.native()) else {
            return;
        };
        for (event, listener) in connected_listeners(record) {
            document.remove_event_listener(node, event, listener);
        }
        document.remove(node);
    }
}

impl PlatformAdapter for WebAdapter {
    fn platform(&self) -> Platform {
        Platform::Web
    }

    fn has_toolkit(&self) -> bool {
        self.document.is_some()
    }

    fn store(&self) -> &ElementStore {
        &self.store
    }

    fn root(&self) -> Option<ElementHandle> {
        self.root
    }

    #[instrument(skip_all, fields(kind = kind.as_str()))]
    fn create_element(&mut self, kind: ElementKind, props: Props) -> ElementHandle {
        let native = match &self.document {
            Some(document) => {
                let tag = dom_tag(kind);
                let node = document.create_element(tag);
                if tag == DomTag::Input {
                    document.set_property(node, "type", "text");
                }
                NativeRef::Web { tag, node }
            }
            None => NativeRef::Fallback,
        };

        let handle = self.store.insert(kind, native, Props::new());
        if let Err(e) = self.update_element(&handle, &props) {
            warn!(error = %e, "initial props not applied");
        }
        debug!(id = %handle.id(), fallback = handle.is_fallback(), "element created");
        handle
    }

    fn update_element(&mut self, handle: &ElementHandle, props: &Props) -> Result<()> {
        let record = self.store.get_mut(handle)?;
        record.props.merge(props);

        let (NativeRef::Web { tag, node }, Some(document)) = (record.native(), &self.document) else {
            return Ok(());
        };
        Self::apply_props(document.as_ref(), tag, node, props);

        let styles = styles_from_props(props);
        if styles.is_empty() {
            return Ok(());
        }
        self.merge_styles(handle, styles)
    }

    fn append_child(&mut self, parent: &ElementHandle, child: &ElementHandle) -> Result<()> {
        let document = &self.document;
        append_child_with(
            &mut self.store,
            parent,
            child,
            |parent, child| match (parent, child, document) {
                (NativeRef::Web { node: p, .. }, NativeRef::Web { node: c, .. }, Some(document)) => {
                    document.append_child(p, c);
                    true
                }
                (NativeRef::Fallback, NativeRef::Fallback, _) => true,
                _ => false,
            },
            // appendChild moves the node itself.
            |_, _| {},
        )
    }

    fn remove_child(&mut self, parent: &ElementHandle, child: &ElementHandle) -> Result<()> {
        let document = &self.document;
        remove_child_with(
            &mut self.store,
            parent,
            child,
            |parent, child| {
                if let (NativeRef::Web { node: p, .. }, NativeRef::Web { node: c, .. }, Some(document)) =
                    (parent, child, document)
                {
                    document.remove_child(p, c);
                }
            },
            |record| Self::release(document.as_ref(), record),
        )
    }

    fn set_event_handler(&mut self, handle: &ElementHandle, event: EventKind, handler: EventHandler) -> Result<()> {
        let document = &self.document;
        let name = dom_event(event);
        set_event_handler_with(
            &mut self.store,
            handle,
            event,
            handler,
            name,
            |native, callback| match (native, document) {
                (NativeRef::Web { node, .. }, Some(document)) => Some(document.add_event_listener(node, name, callback)),
                _ => None,
            },
            |native, name, listener| {
                if let (NativeRef::Web { node, .. }, Some(document)) = (native, document) {
                    document.remove_event_listener(node, name, listener);
                }
            },
        )
    }

    fn apply_styles(&mut self, handle: &ElementHandle, styles: &StyleInput) -> Result<()> {
        self.merge_styles(handle, styles.normalize())
    }

    fn destroy(&mut self) {
        for record in self.store.drain() {
            Self::release(self.document.as_ref(), &record);
        }
        self.root = None;
        debug!("web adapter destroyed");
    }
}
