// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop adapter over a Qt-style widget toolkit.
//
// Styles become a widget stylesheet regenerated from the element's full
// style map on every change; events map onto widget signals.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use sans_core::error::Result;
use sans_core::{ElementKind, EventHandler, EventKind, Platform, Props, SansConfig};

use super::{
    PlatformAdapter, append_child_with, connected_listeners, remove_child_with, set_event_handler_with,
    styles_from_props,
};
use crate::element::{ElementHandle, ElementRecord, ElementStore, NativeRef};
use crate::style::{StyleInput, StyleMap, box_edges, is_box_shorthand, kebab_case};
use crate::toolkit::{DesktopToolkit, NativeId, WidgetKind};

pub fn widget_kind(kind: ElementKind) -> WidgetKind {
    match kind {
        ElementKind::Button => WidgetKind::PushButton,
        ElementKind::Label => WidgetKind::Label,
        ElementKind::Textbox => WidgetKind::LineEdit,
        ElementKind::Image => WidgetKind::ImageLabel,
        ElementKind::List => WidgetKind::ListWidget,
        ElementKind::Container => WidgetKind::Widget,
    }
}

pub fn signal_name(event: EventKind) -> &'static str {
    match event {
        EventKind::Click => "clicked",
        EventKind::Input => "textChanged",
        EventKind::Change => "currentTextChanged",
        EventKind::Focus => "focusInEvent",
        EventKind::Blur => "focusOutEvent",
    }
}

/// Stylesheet selector for a widget class; plain containers match anything.
pub fn selector(kind: WidgetKind) -> &'static str {
    match kind {
        WidgetKind::Widget => "*",
        other => other.class_name(),
    }
}

/// Render a style map as a widget stylesheet. Box shorthands expand to
/// per-side declarations; invalid ones are skipped.
pub fn stylesheet(kind: WidgetKind, styles: &StyleMap) -> String {
    let mut declarations = Vec::with_capacity(styles.len());
    for (property, value) in styles {
        if is_box_shorthand(property) {
            match box_edges(property, value) {
                Ok(edges) => {
                    for (side, value) in edges.into_sides() {
                        let name = format!("{property}{side}");
                        declarations.push(format!("{}: {};", kebab_case(&name), value.to_css(&name)));
                    }
                }
                Err(e) => warn!(property = %property, error = %e, "skipping style"),
            }
            continue;
        }
        declarations.push(format!("{}: {};", kebab_case(property), value.to_css(property)));
    }

    if declarations.is_empty() {
        return String::new();
    }
    format!("{} {{ {} }}", selector(kind), declarations.join(" "))
}

pub struct DesktopAdapter {
    toolkit: Option<Arc<dyn DesktopToolkit>>,
    store: ElementStore,
    root: Option<ElementHandle>,
}

impl DesktopAdapter {
    pub fn new(toolkit: Option<Arc<dyn DesktopToolkit>>, config: &SansConfig) -> Self {
        let mut adapter = Self {
            toolkit,
            store: ElementStore::new(),
            root: None,
        };

        match &adapter.toolkit {
            None => warn!("desktop widget toolkit not available; elements will be fallbacks"),
            Some(toolkit) if config.root_container => {
                let widget = toolkit.create_widget(WidgetKind::Widget);
                toolkit.set_box_layout(widget);
                toolkit.show(widget);
                adapter.root = Some(adapter.store.insert(
                    ElementKind::Container,
                    NativeRef::Desktop {
                        kind: WidgetKind::Widget,
                        widget,
                    },
                    Props::new(),
                ));
            }
            Some(_) => {}
        }
        adapter
    }

    fn apply_props(toolkit: &dyn DesktopToolkit, kind: WidgetKind, widget: NativeId, props: &Props) {
        match kind {
            WidgetKind::PushButton => {
                if let Some(text) = props.text("label").or_else(|| props.text("text")) {
                    toolkit.set_text(widget, &text);
                }
            }
            WidgetKind::Label => {
                if let Some(text) = props.text("text") {
                    toolkit.set_text(widget, &text);
                }
            }
            WidgetKind::LineEdit => {
                if let Some(value) = props.get_str("value") {
                    toolkit.set_text(widget, value);
                }
                if let Some(placeholder) = props.get_str("placeholder") {
                    toolkit.set_placeholder_text(widget, placeholder);
                }
            }
            WidgetKind::ImageLabel => {
                if let Some(src) = props.get_str("src") {
                    toolkit.set_pixmap(widget, src);
                }
            }
            WidgetKind::ListWidget | WidgetKind::Widget => {}
        }
        if let Some(disabled) = props.get_bool("disabled") {
            toolkit.set_enabled(widget, !disabled);
        }
    }

    fn merge_styles(&mut self, handle: &ElementHandle, styles: StyleMap) -> Result<()> {
        let record = self.store.get_mut(handle)?;
        record.style.extend(styles);
        if let (NativeRef::Desktop { kind, widget }, Some(toolkit)) = (record.native(), &self.toolkit) {
            toolkit.set_style_sheet(widget, &stylesheet(kind, &record.style));
        }
        Ok(())
    }

    fn release(toolkit: Option<&Arc<dyn DesktopToolkit>>, record: &ElementRecord) {
        let (Some(toolkit), NativeRef::Desktop { widget, .. }) = (toolkit, record.native()) else {
            return;
        };
        for (signal, listener) in connected_listeners(record) {
            toolkit.disconnect(widget, signal, listener);
        }
        toolkit.close(widget);
    }
}

impl PlatformAdapter for DesktopAdapter {
    fn platform(&self) -> Platform {
        Platform::Desktop
    }

    fn has_toolkit(&self) -> bool {
        self.toolkit.is_some()
    }

    fn store(&self) -> &ElementStore {
        &self.store
    }

    fn root(&self) -> Option<ElementHandle> {
        self.root
    }

    #[instrument(skip_all, fields(kind = kind.as_str()))]
    fn create_element(&mut self, kind: ElementKind, props: Props) -> ElementHandle {
        let native = match &self.toolkit {
            Some(toolkit) => {
                let widget_kind = widget_kind(kind);
                let widget = toolkit.create_widget(widget_kind);
                if widget_kind == WidgetKind::Widget {
                    toolkit.set_box_layout(widget);
                }
                NativeRef::Desktop {
                    kind: widget_kind,
                    widget,
                }
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

        let (NativeRef::Desktop { kind, widget }, Some(toolkit)) = (record.native(), &self.toolkit) else {
            return Ok(());
        };
        Self::apply_props(toolkit.as_ref(), kind, widget, props);

        let styles = styles_from_props(props);
        if styles.is_empty() {
            return Ok(());
        }
        self.merge_styles(handle, styles)
    }

    fn append_child(&mut self, parent: &ElementHandle, child: &ElementHandle) -> Result<()> {
        let toolkit = &self.toolkit;
        append_child_with(
            &mut self.store,
            parent,
            child,
            |parent, child| match (parent, child, toolkit) {
                (NativeRef::Desktop { widget: p, .. }, NativeRef::Desktop { widget: c, .. }, Some(toolkit)) => {
                    toolkit.add_to_layout(p, c)
                }
                (NativeRef::Fallback, NativeRef::Fallback, _) => true,
                _ => false,
            },
            |old, child| {
                if let (NativeRef::Desktop { widget: p, .. }, NativeRef::Desktop { widget: c, .. }, Some(toolkit)) =
                    (old, child, toolkit)
                {
                    toolkit.remove_from_layout(p, c);
                }
            },
        )
    }

    fn remove_child(&mut self, parent: &ElementHandle, child: &ElementHandle) -> Result<()> {
        let toolkit = &self.toolkit;
        remove_child_with(
            &mut self.store,
            parent,
            child,
            |parent, child| {
                if let (NativeRef::Desktop { widget: p, .. }, NativeRef::Desktop { widget: c, .. }, Some(toolkit)) =
                    (parent, child, toolkit)
                {
                    toolkit.remove_from_layout(p, c);
                }
            },
            |record| Self::release(toolkit.as_ref(), record),
        )
    }

    fn set_event_handler(&mut self, handle: &ElementHandle, event: EventKind, handler: EventHandler) -> Result<()> {
        let toolkit = &self.toolkit;
        let signal = signal_name(event);
        set_event_handler_with(
            &mut self.store,
            handle,
            event,
            handler,
            signal,
            |native, callback| match (native, toolkit) {
                (NativeRef::Desktop { widget, .. }, Some(toolkit)) => Some(toolkit.connect(widget, signal, callback)),
                _ => None,
            },
            |native, name, listener| {
                if let (NativeRef::Desktop { widget, .. }, Some(toolkit)) = (native, toolkit) {
                    toolkit.disconnect(widget, name, listener);
                }
            },
        )
    }

    fn apply_styles(&mut self, handle: &ElementHandle, styles: &StyleInput) -> Result<()> {
        self.merge_styles(handle, styles.normalize())
    }

    fn destroy(&mut self) {
        for record in self.store.drain() {
            Self::release(self.toolkit.as_ref(), &record);
        }
        self.root = None;
        debug!("desktop adapter destroyed");
    }
}
