// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recording toolkits for adapter tests. Each one keeps the state a real
// toolkit would show on screen and lets a test fire native events.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use sans_core::{EventHandler, UiEvent};

use crate::style::StyleValue;
use crate::toolkit::{
    DesktopToolkit, DomDocument, DomTag, ListenerId, MobileToolkit, NativeCallback, NativeId, ViewKind,
    ViewStyle, WidgetKind,
};

/// Handler that counts its invocations.
pub fn counting_handler() -> (EventHandler, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let handler: EventHandler = Arc::new(move |_event: &UiEvent| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (handler, hits)
}

pub fn hits(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}

/// Listeners keyed by `(object, native event name)`.
#[derive(Default)]
struct Listeners {
    next: u64,
    by_target: HashMap<(NativeId, String), Vec<(ListenerId, NativeCallback)>>,
}

impl Listeners {
    fn add(&mut self, target: NativeId, name: &str, callback: NativeCallback) -> ListenerId {
        self.next += 1;
        let id = ListenerId(self.next);
        self.by_target
            .entry((target, name.to_string()))
            .or_default()
            .push((id, callback));
        id
    }

    fn remove(&mut self, target: NativeId, name: &str, id: ListenerId) {
        if let Some(list) = self.by_target.get_mut(&(target, name.to_string())) {
            list.retain(|(existing, _)| *existing != id);
        }
    }

    fn count(&self, target: NativeId, name: &str) -> usize {
        self.by_target
            .get(&(target, name.to_string()))
            .map_or(0, Vec::len)
    }

    fn callbacks(&self, target: NativeId, name: &str) -> Vec<NativeCallback> {
        self.by_target
            .get(&(target, name.to_string()))
            .map(|list| list.iter().map(|(_, cb)| cb.clone()).collect())
            .unwrap_or_default()
    }
}

fn fire(callbacks: Vec<NativeCallback>, payload: Option<&str>) -> usize {
    for callback in &callbacks {
        callback(payload);
    }
    callbacks.len()
}

// ---------------------------------------------------------------------------
// Desktop
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Widget {
    pub kind: WidgetKind,
    pub text: Option<String>,
    pub enabled: bool,
    pub placeholder: Option<String>,
    pub pixmap: Option<String>,
    pub style_sheet: String,
    pub has_layout: bool,
    pub layout: Vec<NativeId>,
    pub visible: bool,
    pub closed: bool,
}

#[derive(Default)]
struct DesktopState {
    next: u64,
    widgets: HashMap<NativeId, Widget>,
    listeners: Listeners,
}

#[derive(Default)]
pub struct RecordingDesktop {
    state: Mutex<DesktopState>,
}

impl RecordingDesktop {
    fn state(&self) -> MutexGuard<'_, DesktopState> {
        self.state.lock().unwrap()
    }

    fn with_widget(&self, id: NativeId, f: impl FnOnce(&mut Widget)) {
        if let Some(widget) = self.state().widgets.get_mut(&id) {
            f(widget);
        }
    }

    pub fn widget(&self, id: NativeId) -> Widget {
        self.state().widgets[&id].clone()
    }

    pub fn connections(&self, id: NativeId, signal: &str) -> usize {
        self.state().listeners.count(id, signal)
    }

    /// Emit `signal` on `id`; returns how many slots ran.
    pub fn emit(&self, id: NativeId, signal: &str, payload: Option<&str>) -> usize {
        let callbacks = self.state().listeners.callbacks(id, signal);
        fire(callbacks, payload)
    }
}

impl DesktopToolkit for RecordingDesktop {
    fn create_widget(&self, kind: WidgetKind) -> NativeId {
        let mut state = self.state();
        state.next += 1;
        let id = NativeId(state.next);
        state.widgets.insert(
            id,
            Widget {
                kind,
                text: None,
                enabled: true,
                placeholder: None,
                pixmap: None,
                style_sheet: String::new(),
                has_layout: false,
                layout: Vec::new(),
                visible: false,
                closed: false,
            },
        );
        id
    }

    fn set_box_layout(&self, widget: NativeId) {
        self.with_widget(widget, |w| w.has_layout = true);
    }

    fn set_text(&self, widget: NativeId, text: &str) {
        self.with_widget(widget, |w| w.text = Some(text.to_string()));
    }

    fn set_enabled(&self, widget: NativeId, enabled: bool) {
        self.with_widget(widget, |w| w.enabled = enabled);
    }

    fn set_placeholder_text(&self, widget: NativeId, text: &str) {
        self.with_widget(widget, |w| w.placeholder = Some(text.to_string()));
    }

    fn set_pixmap(&self, widget: NativeId, source: &str) {
        self.with_widget(widget, |w| w.pixmap = Some(source.to_string()));
    }

    fn set_style_sheet(&self, widget: NativeId, sheet: &str) {
        self.with_widget(widget, |w| w.style_sheet = sheet.to_string());
    }

    fn add_to_layout(&self, parent: NativeId, child: NativeId) -> bool {
        let mut state = self.state();
        let Some(widget) = state.widgets.get_mut(&parent) else {
            return false;
        };
        if !widget.has_layout {
            return false;
        }
        widget.layout.retain(|c| *c != child);
        widget.layout.push(child);
        true
    }

    fn remove_from_layout(&self, parent: NativeId, child: NativeId) -> bool {
        let mut state = self.state();
        let Some(widget) = state.widgets.get_mut(&parent) else {
            return false;
        };
        let before = widget.layout.len();
        widget.layout.retain(|c| *c != child);
        widget.layout.len() != before
    }

    fn connect(&self, widget: NativeId, signal: &str, callback: NativeCallback) -> ListenerId {
        self.state().listeners.add(widget, signal, callback)
    }

    fn disconnect(&self, widget: NativeId, signal: &str, listener: ListenerId) {
        self.state().listeners.remove(widget, signal, listener);
    }

    fn show(&self, widget: NativeId) {
        self.with_widget(widget, |w| w.visible = true);
    }

    fn close(&self, widget: NativeId) {
        self.with_widget(widget, |w| {
            w.closed = true;
            w.visible = false;
        });
    }
}

// ---------------------------------------------------------------------------
// Mobile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct View {
    pub kind: ViewKind,
    pub text: Option<String>,
    pub enabled: bool,
    pub hint: Option<String>,
    pub src: Option<String>,
    pub styles: BTreeMap<ViewStyle, StyleValue>,
    pub children: Vec<NativeId>,
    pub disposed: bool,
}

#[derive(Default)]
struct MobileState {
    next: u64,
    views: HashMap<NativeId, View>,
    listeners: Listeners,
}

/// Views accept every named style property and refuse `Other` ones.
#[derive(Default)]
pub struct RecordingMobile {
    state: Mutex<MobileState>,
}

impl RecordingMobile {
    fn state(&self) -> MutexGuard<'_, MobileState> {
        self.state.lock().unwrap()
    }

    fn with_view(&self, id: NativeId, f: impl FnOnce(&mut View)) {
        if let Some(view) = self.state().views.get_mut(&id) {
            f(view);
        }
    }

    pub fn view(&self, id: NativeId) -> View {
        self.state().views[&id].clone()
    }

    pub fn listeners(&self, id: NativeId, event: &str) -> usize {
        self.state().listeners.count(id, event)
    }

    pub fn notify(&self, id: NativeId, event: &str, payload: Option<&str>) -> usize {
        let callbacks = self.state().listeners.callbacks(id, event);
        fire(callbacks, payload)
    }
}

impl MobileToolkit for RecordingMobile {
    fn create_view(&self, kind: ViewKind) -> NativeId {
        let mut state = self.state();
        state.next += 1;
        let id = NativeId(state.next);
        state.views.insert(
            id,
            View {
                kind,
                text: None,
                enabled: true,
                hint: None,
                src: None,
                styles: BTreeMap::new(),
                children: Vec::new(),
                disposed: false,
            },
        );
        id
    }

    fn set_text(&self, view: NativeId, text: &str) {
        self.with_view(view, |v| v.text = Some(text.to_string()));
    }

    fn set_enabled(&self, view: NativeId, enabled: bool) {
        self.with_view(view, |v| v.enabled = enabled);
    }

    fn set_hint(&self, view: NativeId, hint: &str) {
        self.with_view(view, |v| v.hint = Some(hint.to_string()));
    }

    fn set_src(&self, view: NativeId, src: &str) {
        self.with_view(view, |v| v.src = Some(src.to_string()));
    }

    fn set_style(&self, view: NativeId, property: &ViewStyle, value: &StyleValue) -> bool {
        if matches!(property, ViewStyle::Other(_)) {
            return false;
        }
        self.with_view(view, |v| {
            v.styles.insert(property.clone(), value.clone());
        });
        true
    }

    fn add_child(&self, parent: NativeId, child: NativeId) -> bool {
        let mut state = self.state();
        match state.views.get_mut(&parent) {
            Some(view) if view.kind == ViewKind::StackLayout => {
                view.children.push(child);
                true
            }
            _ => false,
        }
    }

    fn remove_child(&self, parent: NativeId, child: NativeId) -> bool {
        let mut state = self.state();
        let Some(view) = state.views.get_mut(&parent) else {
            return false;
        };
        let before = view.children.len();
        view.children.retain(|c| *c != child);
        view.children.len() != before
    }

    fn on(&self, view: NativeId, event: &str, callback: NativeCallback) -> ListenerId {
        self.state().listeners.add(view, event, callback)
    }

    fn off(&self, view: NativeId, event: &str, listener: ListenerId) {
        self.state().listeners.remove(view, event, listener);
    }

    fn dispose(&self, view: NativeId) {
        self.with_view(view, |v| v.disposed = true);
    }
}

// ---------------------------------------------------------------------------
// DOM
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Node {
    pub tag: Option<DomTag>,
    pub text: Option<String>,
    pub properties: HashMap<String, String>,
    pub disabled: bool,
    pub attributes: HashMap<String, String>,
    pub style: HashMap<String, String>,
    pub parent: Option<NativeId>,
    pub children: Vec<NativeId>,
}

impl Node {
    fn new(tag: Option<DomTag>) -> Self {
        Self {
            tag,
            text: None,
            properties: HashMap::new(),
            disabled: false,
            attributes: HashMap::new(),
            style: HashMap::new(),
            parent: None,
            children: Vec::new(),
        }
    }
}

struct DomState {
    next: u64,
    nodes: HashMap<NativeId, Node>,
    listeners: Listeners,
}

const BODY: NativeId = NativeId(0);

pub struct RecordingDom {
    state: Mutex<DomState>,
}

impl Default for RecordingDom {
    fn default() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(BODY, Node::new(None));
        Self {
            state: Mutex::new(DomState {
                next: 0,
                nodes,
                listeners: Listeners::default(),
            }),
        }
    }
}

impl RecordingDom {
    fn state(&self) -> MutexGuard<'_, DomState> {
        self.state.lock().unwrap()
    }

    fn with_node(&self, id: NativeId, f: impl FnOnce(&mut Node)) {
        if let Some(node) = self.state().nodes.get_mut(&id) {
            f(node);
        }
    }

    pub fn node(&self, id: NativeId) -> Node {
        self.state().nodes[&id].clone()
    }

    pub fn listeners(&self, id: NativeId, event: &str) -> usize {
        self.state().listeners.count(id, event)
    }

    pub fn dispatch(&self, id: NativeId, event: &str, payload: Option<&str>) -> usize {
        let callbacks = self.state().listeners.callbacks(id, event);
        fire(callbacks, payload)
    }

    fn detach(state: &mut DomState, node: NativeId) {
        let Some(parent) = state.nodes.get_mut(&node).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = state.nodes.get_mut(&parent) {
            parent.children.retain(|c| *c != node);
        }
    }
}

impl DomDocument for RecordingDom {
    fn create_element(&self, tag: DomTag) -> NativeId {
        let mut state = self.state();
        state.next += 1;
        let id = NativeId(state.next);
        state.nodes.insert(id, Node::new(Some(tag)));
        id
    }

    fn body(&self) -> NativeId {
        BODY
    }

    fn set_text_content(&self, node: NativeId, text: &str) {
        self.with_node(node, |n| n.text = Some(text.to_string()));
    }

    fn set_property(&self, node: NativeId, name: &str, value: &str) {
        self.with_node(node, |n| {
            n.properties.insert(name.to_string(), value.to_string());
        });
    }

    fn set_disabled(&self, node: NativeId, disabled: bool) {
        self.with_node(node, |n| n.disabled = disabled);
    }

    fn set_attribute(&self, node: NativeId, name: &str, value: &str) {
        self.with_node(node, |n| {
            n.attributes.insert(name.to_string(), value.to_string());
        });
    }

    fn set_style(&self, node: NativeId, property: &str, value: &str) {
        self.with_node(node, |n| {
            n.style.insert(property.to_string(), value.to_string());
        });
    }

    fn append_child(&self, parent: NativeId, child: NativeId) {
        let mut state = self.state();
        Self::detach(&mut state, child);
        if let Some(node) = state.nodes.get_mut(&parent) {
            node.children.push(child);
        }
        if let Some(node) = state.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
    }

    fn remove_child(&self, parent: NativeId, child: NativeId) -> bool {
        let mut state = self.state();
        if state.nodes.get(&child).and_then(|n| n.parent) != Some(parent) {
            return false;
        }
        Self::detach(&mut state, child);
        true
    }

    fn remove(&self, node: NativeId) {
        Self::detach(&mut self.state(), node);
    }

    fn add_event_listener(&self, node: NativeId, event: &str, callback: NativeCallback) -> ListenerId {
        self.state().listeners.add(node, event, callback)
    }

    fn remove_event_listener(&self, node: NativeId, event: &str, listener: ListenerId) {
        self.state().listeners.remove(node, event, listener);
    }
}
