// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Mobile adapter over a NativeScript-style view toolkit.
//
// Views expose individual style properties, so box shorthands are split
// into per-side properties and sizes are coerced to numbers where possible.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use sans_core::error::Result;
use sans_core::{ElementKind, EventHandler, EventKind, Platform, Props, SansConfig};

use super::{
    PlatformAdapter, append_child_with, connected_listeners, remove_child_with, set_event_handler_with,
    styles_from_props,
};
use crate::element::{ElementHandle, ElementRecord, ElementStore, NativeRef};
use crate::style::{StyleInput, StyleMap, StyleValue, box_edges, is_box_shorthand, parse_font_size, parse_size};
use crate::toolkit::{MobileToolkit, NativeId, ViewKind, ViewStyle};

pub fn view_kind(kind: ElementKind) -> ViewKind {
    match kind {
        ElementKind::Button => ViewKind::Button,
        ElementKind::Label => ViewKind::Label,
        ElementKind::Textbox => ViewKind::TextField,
        ElementKind::Image => ViewKind::Image,
        ElementKind::List => ViewKind::ListView,
        ElementKind::Container => ViewKind::StackLayout,
    }
}

pub fn event_name(event: EventKind) -> &'static str {
    match event {
        EventKind::Click => "tap",
        EventKind::Input => "textChange",
        EventKind::Change => "selectedIndexChange",
        EventKind::Focus => "focus",
        EventKind::Blur => "blur",
    }
}

/// Translate one normalized style entry into view properties.
pub fn view_styles(property: &str, value: &StyleValue) -> Result<Vec<(ViewStyle, StyleValue)>> {
    if is_box_shorthand(property) {
        let edges = box_edges(property, value)?;
        return Ok(edges
            .into_sides()
            .into_iter()
            .map(|(side, value)| (ViewStyle::from_property(&format!("{property}{side}")), parse_size(&value)))
            .collect());
    }

    let style = ViewStyle::from_property(property);
    let value = if style == ViewStyle::FontSize {
        StyleValue::Number(parse_font_size(value))
    } else if style.is_size() {
        parse_size(value)
    } else {
        value.clone()
    };
    Ok(vec![(style, value)])
}

pub struct MobileAdapter {
    toolkit: Option<Arc<dyn MobileToolkit>>,
    store: ElementStore,
    root: Option<ElementHandle>,
}

impl MobileAdapter {
    pub fn new(toolkit: Option<Arc<dyn MobileToolkit>>, config: &SansConfig) -> Self {
        let mut adapter = Self {
            toolkit,
            store: ElementStore::new(),
            root: None,
        };

        match &adapter.toolkit {
            None => warn!("mobile view toolkit not available; elements will be fallbacks"),
            Some(toolkit) if config.root_container => {
                let view = toolkit.create_view(ViewKind::StackLayout);
                adapter.root = Some(adapter.store.insert(
                    ElementKind::Container,
                    NativeRef::Mobile {
                        kind: ViewKind::StackLayout,
                        view,
                    },
                    Props::new(),
                ));
            }
            Some(_) => {}
        }
        adapter
    }

    fn apply_props(toolkit: &dyn MobileToolkit, kind: ViewKind, view: NativeId, props: &Props) {
        match kind {
            ViewKind::Button => {
                if let Some(text) = props.text("label").or_else(|| props.text("text")) {
                    toolkit.set_text(view, &text);
                }
            }
            ViewKind::Label => {
                if let Some(text) = props.text("text") {
                    toolkit.set_text(view, &text);
                }
            }
            ViewKind::TextField => {
                if let Some(value) = props.get_str("value") {
                    toolkit.set_text(view, value);
                }
                if let Some(hint) = props.get_str("placeholder") {
                    toolkit.set_hint(view, hint);
                }
            }
            ViewKind::Image => {
                if let Some(src) = props.get_str("src") {
                    toolkit.set_src(view, src);
                }
            }
            ViewKind::ListView | ViewKind::StackLayout => {}
        }
        if let Some(disabled) = props.get_bool("disabled") {
            toolkit.set_enabled(view, !disabled);
        }
    }

    /// Only the entries in `styles` are pushed to the view; earlier ones
    /// are already applied.
    /// Only entries that reached the view are kept on a native element.
    fn merge_styles(&mut self, handle: &ElementHandle, styles: StyleMap) -> Result<()> {
        let record = self.store.get_mut(handle)?;
        let (NativeRef::Mobile { view, .. }, Some(toolkit)) = (record.native(), &self.toolkit) else {
            record.style.extend(styles);
            return Ok(());
        };
        for (property, value) in styles {
            let entries = match view_styles(&property, &value) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(property = %property, error = %e, "skipping style");
                    continue;
                }
            };
            for (style, value) in entries {
                if !toolkit.set_style(view, &style, &value) {
                    debug!(property = %property, "view has no such style property");
                }
            }
            record.style.insert(property, value);
        }
        Ok(())
    }

    fn release(toolkit: Option<&Arc<dyn MobileToolkit>>, record: &ElementRecord) {
        let (Some(toolkit), NativeRef::Mobile { view, .. }) = (toolkit, record.native()) else {
            return;
        };
        for (event, listener) in connected_listeners(record) {
            toolkit.off(view, event, listener);
        }
        toolkit.dispose(view);
    }
}

impl PlatformAdapter for MobileAdapter {
    fn platform(&self) -> Platform {
        Platform::Mobile
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
                let kind = view_kind(kind);
                NativeRef::Mobile {
                    kind,
                    view: toolkit.create_view(kind),
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

        let (NativeRef::Mobile { kind, view }, Some(toolkit)) = (record.native(), &self.toolkit) else {
            return Ok(());
        };
        Self::apply_props(toolkit.as_ref(), kind, view, props);

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
                (NativeRef::Mobile { view: p, .. }, NativeRef::Mobile { view: c, .. }, Some(toolkit)) => {
                    toolkit.add_child(p, c)
                }
                (NativeRef::Fallback, NativeRef::Fallback, _) => true,
                _ => false,
            },
            |old, child| {
                if let (NativeRef::Mobile { view: p, .. }, NativeRef::Mobile { view: c, .. }, Some(toolkit)) =
                    (old, child, toolkit)
                {
                    toolkit.remove_child(p, c);
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
                if let (NativeRef::Mobile { view: p, .. }, NativeRef::Mobile { view: c, .. }, Some(toolkit)) =
                    (parent, child, toolkit)
                {
                    toolkit.remove_child(p, c);
                }
            },
            |record| Self::release(toolkit.as_ref(), record),
        )
    }

    fn set_event_handler(&mut self, handle: &ElementHandle, event: EventKind, handler: EventHandler) -> Result<()> {
        let toolkit = &self.toolkit;
        let name = event_name(event);
        set_event_handler_with(
            &mut self.store,
            handle,
            event,
            handler,
            name,
            |native, callback| match (native, toolkit) {
                (NativeRef::Mobile { view, .. }, Some(toolkit)) => Some(toolkit.on(view, name, callback)),
                _ => None,
            },
            |native, name, listener| {
                if let (NativeRef::Mobile { view, .. }, Some(toolkit)) = (native, toolkit) {
                    toolkit.off(view, name, listener);
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
        debug!("mobile adapter destroyed");
    }
}
