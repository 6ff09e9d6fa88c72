// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Component factory: typed creation helpers over the dispatcher, plus
// named custom components registered at runtime.

use std::collections::HashMap;

use tracing::debug;

use sans_core::error::{Result, SansError};
use sans_core::{ElementKind, PlatformInfo, Props, SansConfig};

use crate::dispatcher::AdapterDispatcher;
use crate::element::ElementHandle;
use crate::platform::PlatformContext;
use crate::toolkit::NativeToolkitProvider;

/// A registered component: an element kind and default props.
#[derive(Debug, Clone)]
struct Template {
    kind: ElementKind,
    defaults: Props,
}

pub struct ComponentFactory {
    ui: AdapterDispatcher,
    components: HashMap<String, Template>,
}

impl ComponentFactory {
    pub fn new(context: &PlatformContext, toolkits: &dyn NativeToolkitProvider, config: &SansConfig) -> Self {
        Self::with_dispatcher(AdapterDispatcher::new(context, toolkits, config))
    }

    pub fn with_dispatcher(ui: AdapterDispatcher) -> Self {
        Self {
            ui,
            components: HashMap::new(),
        }
    }

    pub fn create_button(&mut self, props: Props) -> Result<ElementHandle> {
        self.ui.create_element(ElementKind::Button, props)
    }

    pub fn create_label(&mut self, props: Props) -> Result<ElementHandle> {
        self.ui.create_element(ElementKind::Label, props)
    }

    pub fn create_text_input(&mut self, props: Props) -> Result<ElementHandle> {
        self.ui.create_element(ElementKind::Textbox, props)
    }

    pub fn create_image(&mut self, props: Props) -> Result<ElementHandle> {
        self.ui.create_element(ElementKind::Image, props)
    }

    pub fn create_list(&mut self, props: Props) -> Result<ElementHandle> {
        self.ui.create_element(ElementKind::List, props)
    }

    pub fn create_container(&mut self, props: Props) -> Result<ElementHandle> {
        self.ui.create_element(ElementKind::Container, props)
    }

    /// Register `name` as `kind` with `defaults`. Registering a name again
    /// replaces the earlier definition. Names are case-insensitive.
    pub fn register_component(&mut self, name: &str, kind: ElementKind, defaults: Props) {
        debug!(name, kind = kind.as_str(), "component registered");
        self.components
            .insert(name.to_ascii_lowercase(), Template { kind, defaults });
    }

    /// Create a registered component or a built-in element kind by name.
    /// `props` override a registered component's defaults.
    pub fn create(&mut self, name: &str, props: Props) -> Result<ElementHandle> {
        if let Some(template) = self.components.get(&name.to_ascii_lowercase()) {
            let kind = template.kind;
            let mut merged = template.defaults.clone();
            merged.merge(&props);
            return self.ui.create_element(kind, merged);
        }
        match name.parse::<ElementKind>() {
            Ok(kind) => self.ui.create_element(kind, props),
            Err(_) => Err(SansError::UnknownComponent(name.to_string())),
        }
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.components.contains_key(&name.to_ascii_lowercase())
    }

    /// The dispatcher, for updates, tree changes, events and styles.
    pub fn native_ui(&mut self) -> &mut AdapterDispatcher {
        &mut self.ui
    }

    pub fn platform_info(&self) -> PlatformInfo {
        self.ui.platform_info()
    }
}
