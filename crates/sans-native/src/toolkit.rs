// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native toolkit capabilities.
//
// Each backend's widget library is reached through a trait object handed
// over by a `NativeToolkitProvider` at startup. A provider that returns
// `None` for a backend means the library is not loaded; adapters then hand
// out fallback elements instead of failing.
//
// Toolkits address their objects by `NativeId`. They own the objects; the
// adapters only keep the ids.

use std::sync::Arc;

use crate::style::StyleValue;

/// Toolkit-assigned identifier for a widget, view or DOM node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeId(pub u64);

/// Identifier returned when a listener is connected, used to disconnect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Callback a toolkit invokes when a native signal/event fires. The
/// argument is the signal's text payload, if any.
pub type NativeCallback = Arc<dyn Fn(Option<&str>) + Send + Sync>;

// ---------------------------------------------------------------------------
// Desktop (Qt-style widgets)
// ---------------------------------------------------------------------------

/// Desktop widget classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    PushButton,
    Label,
    LineEdit,
    /// A label showing a pixmap.
    ImageLabel,
    ListWidget,
    Widget,
}

impl WidgetKind {
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::PushButton => "QPushButton",
            Self::Label | Self::ImageLabel => "QLabel",
            Self::LineEdit => "QLineEdit",
            Self::ListWidget => "QListWidget",
            Self::Widget => "QWidget",
        }
    }
}

pub trait DesktopToolkit: Send + Sync {
    fn create_widget(&self, kind: WidgetKind) -> NativeId;

    /// Give `widget` a vertical box layout so it can hold children.
    fn set_box_layout(&self, widget: NativeId);

    fn set_text(&self, widget: NativeId, text: &str);
    fn set_enabled(&self, widget: NativeId, enabled: bool);
    fn set_placeholder_text(&self, widget: NativeId, text: &str);
    fn set_pixmap(&self, widget: NativeId, source: &str);
    fn set_style_sheet(&self, widget: NativeId, sheet: &str);

    /// Add `child` to `parent`'s layout. Returns `false` when `parent` has
    /// no layout.
    fn add_to_layout(&self, parent: NativeId, child: NativeId) -> bool;
    /// Returns `false` when `child` is not in `parent`'s layout.
    fn remove_from_layout(&self, parent: NativeId, child: NativeId) -> bool;

    fn connect(&self, widget: NativeId, signal: &str, callback: NativeCallback) -> ListenerId;
    fn disconnect(&self, widget: NativeId, signal: &str, listener: ListenerId);

    fn show(&self, widget: NativeId);
    /// Close and release the widget.
    fn close(&self, widget: NativeId);
}

// ---------------------------------------------------------------------------
// Mobile (NativeScript-style views)
// ---------------------------------------------------------------------------

/// Mobile view classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Button,
    Label,
    TextField,
    Image,
    ListView,
    StackLayout,
}

impl ViewKind {
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Button => "Button",
            Self::Label => "Label",
            Self::TextField => "TextField",
            Self::Image => "Image",
            Self::ListView => "ListView",
            Self::StackLayout => "StackLayout",
        }
    }
}

/// Style properties a view exposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViewStyle {
    BackgroundColor,
    Color,
    FontSize,
    FontWeight,
    Width,
    Height,
    BorderRadius,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    /// Any other camelCase property, set by name.
    Other(String),
}

impl ViewStyle {
    pub fn from_property(property: &str) -> Self {
        match property {
            "backgroundColor" => Self::BackgroundColor,
            "color" => Self::Color,
            "fontSize" => Self::FontSize,
            "fontWeight" => Self::FontWeight,
            "width" => Self::Width,
            "height" => Self::Height,
            "borderRadius" => Self::BorderRadius,
            "marginTop" => Self::MarginTop,
            "marginRight" => Self::MarginRight,
            "marginBottom" => Self::MarginBottom,
            "marginLeft" => Self::MarginLeft,
            "paddingTop" => Self::PaddingTop,
            "paddingRight" => Self::PaddingRight,
            "paddingBottom" => Self::PaddingBottom,
            "paddingLeft" => Self::PaddingLeft,
            other => Self::Other(other.to_string()),
        }
    }

    /// Property takes a number where one can be parsed.
    pub fn is_size(&self) -> bool {
        matches!(
            self,
            Self::Width
                | Self::Height
                | Self::BorderRadius
                | Self::MarginTop
                | Self::MarginRight
                | Self::MarginBottom
                | Self::MarginLeft
                | Self::PaddingTop
                | Self::PaddingRight
                | Self::PaddingBottom
                | Self::PaddingLeft
        )
    }
}

pub trait MobileToolkit: Send + Sync {
    fn create_view(&self, kind: ViewKind) -> NativeId;

    fn set_text(&self, view: NativeId, text: &str);
    fn set_enabled(&self, view: NativeId, enabled: bool);
    fn set_hint(&self, view: NativeId, hint: &str);
    fn set_src(&self, view: NativeId, src: &str);

    /// Returns `false` when the view has no such property.
    fn set_style(&self, view: NativeId, property: &ViewStyle, value: &StyleValue) -> bool;

    /// Returns `false` when `parent` cannot hold children.
    fn add_child(&self, parent: NativeId, child: NativeId) -> bool;
    /// Returns `false` when `child` is not a child of `parent`.
    fn remove_child(&self, parent: NativeId, child: NativeId) -> bool;

    fn on(&self, view: NativeId, event: &str, callback: NativeCallback) -> ListenerId;
    fn off(&self, view: NativeId, event: &str, listener: ListenerId);

    fn dispose(&self, view: NativeId);
}

// ---------------------------------------------------------------------------
// Web (DOM)
// ---------------------------------------------------------------------------

/// DOM tags for each element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomTag {
    Button,
    Span,
    Input,
    Img,
    Ul,
    Div,
}

impl DomTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Span => "span",
            Self::Input => "input",
            Self::Img => "img",
            Self::Ul => "ul",
            Self::Div => "div",
        }
    }
}

pub trait DomDocument: Send + Sync {
    fn create_element(&self, tag: DomTag) -> NativeId;
    /// The element scripts attach top-level content to.
    fn body(&self) -> NativeId;

    fn set_text_content(&self, node: NativeId, text: &str);
    /// Set a DOM property (`value`, `placeholder`, `src`, `alt`, `type`,
    /// `className`).
    fn set_property(&self, node: NativeId, name: &str, value: &str);
    fn set_disabled(&self, node: NativeId, disabled: bool);
    fn set_attribute(&self, node: NativeId, name: &str, value: &str);
    /// `property` is camelCase, as on `element.style`.
    fn set_style(&self, node: NativeId, property: &str, value: &str);

    fn append_child(&self, parent: NativeId, child: NativeId);
    /// Returns `false` when `child` is not a child of `parent`.
    fn remove_child(&self, parent: NativeId, child: NativeId) -> bool;
    fn remove(&self, node: NativeId);

    fn add_event_listener(&self, node: NativeId, event: &str, callback: NativeCallback) -> ListenerId;
    fn remove_event_listener(&self, node: NativeId, event: &str, listener: ListenerId);
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Resolves the native toolkits available to this process. Consulted once,
/// when the dispatcher binds its adapter.
pub trait NativeToolkitProvider {
    fn desktop(&self) -> Option<Arc<dyn DesktopToolkit>> {
        None
    }

    fn mobile(&self) -> Option<Arc<dyn MobileToolkit>> {
        None
    }

    fn document(&self) -> Option<Arc<dyn DomDocument>> {
        None
    }
}

/// Provider for a process with no native toolkit loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoToolkits;

impl NativeToolkitProvider for NoToolkits {}

/// Provider assembled from explicit bindings.
#[derive(Clone, Default)]
pub struct Toolkits {
    desktop: Option<Arc<dyn DesktopToolkit>>,
    mobile: Option<Arc<dyn MobileToolkit>>,
    document: Option<Arc<dyn DomDocument>>,
}

impl Toolkits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_desktop(mut self, toolkit: Arc<dyn DesktopToolkit>) -> Self {
        self.desktop = Some(toolkit);
        self
    }

    pub fn with_mobile(mut self, toolkit: Arc<dyn MobileToolkit>) -> Self {
        self.mobile = Some(toolkit);
        self
    }

    pub fn with_document(mut self, document: Arc<dyn DomDocument>) -> Self {
        self.document = Some(document);
        self
    }
}

impl NativeToolkitProvider for Toolkits {
    fn desktop(&self) -> Option<Arc<dyn DesktopToolkit>> {
        self.desktop.clone()
    }

    fn mobile(&self) -> Option<Arc<dyn MobileToolkit>> {
        self.mobile.clone()
    }

    fn document(&self) -> Option<Arc<dyn DomDocument>> {
        self.document.clone()
    }
}
