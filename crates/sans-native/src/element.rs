// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Element handles and the per-adapter element store.
//
// Every element an adapter creates gets a record here, whether it is backed
// by a native object or is a fallback element. For fallback elements the
// record is the whole element: props, children, style and handlers live
// only in memory.

use std::collections::HashMap;
use std::fmt;

use sans_core::error::{Result, SansError};
use sans_core::{ElementId, ElementKind, EventHandler, EventKind, Props, UiEvent};

use crate::style::StyleMap;
use crate::toolkit::{DomTag, ListenerId, NativeId, ViewKind, WidgetKind};

/// What backs an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeRef {
    Desktop { kind: WidgetKind, widget: NativeId },
    Mobile { kind: ViewKind, view: NativeId },
    Web { tag: DomTag, node: NativeId },
    /// Native toolkit missing; the element exists only in memory.
    Fallback,
}

/// Opaque reference to an element owned by one adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle {
    id: ElementId,
    kind: ElementKind,
    native: NativeRef,
}

impl ElementHandle {
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn native(&self) -> NativeRef {
        self.native
    }

    pub fn is_fallback(&self) -> bool {
        self.native == NativeRef::Fallback
    }
}

/// An attached event handler.
pub(crate) enum Listener {
    /// Fallback elements keep the handler itself.
    Stored(EventHandler),
    /// Native elements keep what is needed to disconnect.
    Connected { name: &'static str, listener: ListenerId },
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stored(_) => f.write_str("Stored(..)"),
            Self::Connected { name, listener } => f
                .debug_struct("Connected")
                .field("name", name)
                .field("listener", listener)
                .finish(),
        }
    }
}

#[derive(Debug)]
pub struct ElementRecord {
    handle: ElementHandle,
    pub(crate) props: Props,
    pub(crate) style: StyleMap,
    pub(crate) children: Vec<ElementId>,
    pub(crate) parent: Option<ElementId>,
    pub(crate) listeners: HashMap<EventKind, Listener>,
}

impl ElementRecord {
    pub fn handle(&self) -> ElementHandle {
        self.handle
    }

    pub fn kind(&self) -> ElementKind {
        self.handle.kind
    }

    pub fn native(&self) -> NativeRef {
        self.handle.native
    }

    pub fn is_fallback(&self) -> bool {
        self.handle.is_fallback()
    }

    /// Merged props from creation and every update.
    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Style applied so far, camelCase keys.
    pub fn style(&self) -> &StyleMap {
        &self.style
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn has_handler(&self, event: EventKind) -> bool {
        self.listeners.contains_key(&event)
    }

    /// Install `listener` for `event`, returning the one it replaces.
    pub(crate) fn replace_listener(&mut self, event: EventKind, listener: Listener) -> Option<Listener> {
        self.listeners.insert(event, listener)
    }
}

#[derive(Debug, Default)]
pub struct ElementStore {
    elements: HashMap<ElementId, ElementRecord>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: ElementKind, native: NativeRef, props: Props) -> ElementHandle {
        let handle = ElementHandle {
            id: ElementId::new(),
            kind,
            native,
        };
        self.elements.insert(
            handle.id,
            ElementRecord {
                handle,
                props,
                style: StyleMap::new(),
                children: Vec::new(),
                parent: None,
                listeners: HashMap::new(),
            },
        );
        handle
    }

    pub fn get(&self, handle: &ElementHandle) -> Result<&ElementRecord> {
        self.elements
            .get(&handle.id)
            .ok_or_else(|| SansError::UnknownElement(handle.id.to_string()))
    }

    pub fn get_mut(&mut self, handle: &ElementHandle) -> Result<&mut ElementRecord> {
        self.elements
            .get_mut(&handle.id)
            .ok_or_else(|| SansError::UnknownElement(handle.id.to_string()))
    }

    pub fn by_id(&self, id: ElementId) -> Option<&ElementRecord> {
        self.elements.get(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn is_child_of(&self, parent: ElementId, child: ElementId) -> bool {
        self.elements
            .get(&child)
            .is_some_and(|record| record.parent == Some(parent))
    }

    /// True if `ancestor` is `node` or one of its ancestors.
    pub fn is_ancestor(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.elements.get(&id).and_then(|r| r.parent);
        }
        false
    }

    /// Record `child` as the last child of `parent`, detaching it from any
    /// previous parent.
    pub(crate) fn link(&mut self, parent: ElementId, child: ElementId) {
        if let Some(old) = self.elements.get(&child).and_then(|r| r.parent) {
            self.unlink(old, child);
        }
        if let Some(record) = self.elements.get_mut(&parent) {
            record.children.push(child);
        }
        if let Some(record) = self.elements.get_mut(&child) {
            record.parent = Some(parent);
        }
    }

    /// Returns `false` if `child` was not a child of `parent`.
    pub(crate) fn unlink(&mut self, parent: ElementId, child: ElementId) -> bool {
        if !self.is_child_of(parent, child) {
            return false;
        }
        if let Some(record) = self.elements.get_mut(&parent) {
            record.children.retain(|c| *c != child);
        }
        if let Some(record) = self.elements.get_mut(&child) {
            record.parent = None;
        }
        true
    }

    /// Remove `id` and all its descendants, children before parents.
    pub(crate) fn remove_subtree(&mut self, id: ElementId) -> Vec<ElementRecord> {
        if let Some(parent) = self.elements.get(&id).and_then(|r| r.parent) {
            self.unlink(parent, id);
        }
        let mut removed = Vec::new();
        self.collect_subtree(id, &mut removed);
        removed
    }

    fn collect_subtree(&mut self, id: ElementId, out: &mut Vec<ElementRecord>) {
        let Some(record) = self.elements.remove(&id) else {
            return;
        };
        for child in &record.children {
            self.collect_subtree(*child, out);
        }
        out.push(record);
    }

    pub(crate) fn drain(&mut self) -> Vec<ElementRecord> {
        self.elements.drain().map(|(_, record)| record).collect()
    }

    /// Invoke the stored handler for `event.kind` on a fallback element.
    /// Returns `false` when none is attached or the element is native.
    pub fn emit(&self, handle: &ElementHandle, event: &UiEvent) -> Result<bool> {
        match self.get(handle)?.listeners.get(&event.kind) {
            Some(Listener::Stored(handler)) => {
                handler(event);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fallback(store: &mut ElementStore, kind: ElementKind) -> ElementHandle {
        store.insert(kind, NativeRef::Fallback, Props::new())
    }

    #[test]
    fn link_moves_between_parents() {
        let mut store = ElementStore::new();
        let a = fallback(&mut store, ElementKind::Container);
        let b = fallback(&mut store, ElementKind::Container);
        let child = fallback(&mut store, ElementKind::Label);

        store.link(a.id(), child.id());
        store.link(b.id(), child.id());

        assert!(store.get(&a).unwrap().children().is_empty());
        assert_eq!(store.get(&b).unwrap().children(), &[child.id()]);
        assert_eq!(store.get(&child).unwrap().parent(), Some(b.id()));
    }

    #[test]
    fn unlink_is_idempotent() {
        let mut store = ElementStore::new();
        let parent = fallback(&mut store, ElementKind::Container);
        let child = fallback(&mut store, ElementKind::Button);
        store.link(parent.id(), child.id());

        assert!(store.unlink(parent.id(), child.id()));
        assert!(!store.unlink(parent.id(), child.id()));
    }

    #[test]
    fn remove_subtree_takes_descendants() {
        let mut store = ElementStore::new();
        let root = fallback(&mut store, ElementKind::Container);
        let mid = fallback(&mut store, ElementKind::Container);
        let leaf = fallback(&mut store, ElementKind::Label);
        store.link(root.id(), mid.id());
        store.link(mid.id(), leaf.id());

        let removed = store.remove_subtree(mid.id());
        assert_eq!(removed.len(), 2);
        assert_eq!(removed[0].handle(), leaf);
        assert!(store.get(&root).unwrap().children().is_empty());
        assert_eq!(store.len(), 1);
        assert!(matches!(store.get(&leaf), Err(SansError::UnknownElement(_))));
    }

    #[test]
    fn ancestry() {
        let mut store = ElementStore::new();
        let root = fallback(&mut store, ElementKind::Container);
        let child = fallback(&mut store, ElementKind::Container);
        store.link(root.id(), child.id());

        assert!(store.is_ancestor(root.id(), child.id()));
        assert!(store.is_ancestor(child.id(), child.id()));
        assert!(!store.is_ancestor(child.id(), root.id()));
    }

    #[test]
    fn emit_runs_stored_handler() {
        let mut store = ElementStore::new();
        let button = fallback(&mut store, ElementKind::Button);
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        store.get_mut(&button).unwrap().replace_listener(
            EventKind::Click,
            Listener::Stored(Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })),
        );

        assert!(store.emit(&button, &UiEvent::new(EventKind::Click)).unwrap());
        assert!(!store.emit(&button, &UiEvent::new(EventKind::Blur)).unwrap());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
