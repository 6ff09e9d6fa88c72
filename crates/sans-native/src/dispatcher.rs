// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Adapter dispatcher: binds one platform adapter for its lifetime and
// forwards every element operation to it.

use std::sync::Arc;

use tracing::{info, instrument};

use sans_core::error::{Result, SansError};
use sans_core::{ElementKind, EventKind, Platform, PlatformInfo, Props, SansConfig, UiEvent};

use crate::adapter::{DesktopAdapter, MobileAdapter, PlatformAdapter, WebAdapter};
use crate::element::{ElementHandle, ElementRecord};
use crate::platform::PlatformContext;
use crate::style::StyleInput;
use crate::toolkit::NativeToolkitProvider;

pub struct AdapterDispatcher {
    platform: PlatformInfo,
    adapter: Option<Box<dyn PlatformAdapter>>,
}

impl AdapterDispatcher {
    /// Bind the adapter for the detected platform, using whichever toolkit
    /// `toolkits` provides for it.
    pub fn new(context: &PlatformContext, toolkits: &dyn NativeToolkitProvider, config: &SansConfig) -> Self {
        let platform = context.info();
        let adapter: Box<dyn PlatformAdapter> = match platform.platform {
            Platform::Desktop => Box::new(DesktopAdapter::new(toolkits.desktop(), config)),
            Platform::Mobile => Box::new(MobileAdapter::new(toolkits.mobile(), config)),
            Platform::Web => Box::new(WebAdapter::new(toolkits.document(), config)),
        };
        info!(
            platform = %platform,
            native = adapter.has_toolkit(),
            "adapter bound"
        );
        Self::with_adapter(platform, adapter)
    }

    pub fn with_adapter(platform: PlatformInfo, adapter: Box<dyn PlatformAdapter>) -> Self {
        Self {
            platform,
            adapter: Some(adapter),
        }
    }

    fn adapter(&self) -> Result<&dyn PlatformAdapter> {
        self.adapter.as_deref().ok_or(SansError::AdapterNotInitialized)
    }

    fn adapter_mut(&mut self) -> Result<&mut (dyn PlatformAdapter + 'static)> {
        self.adapter.as_deref_mut().ok_or(SansError::AdapterNotInitialized)
    }

    pub fn platform_info(&self) -> PlatformInfo {
        self.platform
    }

    pub fn is_bound(&self) -> bool {
        self.adapter.is_some()
    }

    /// Whether the bound adapter found its native toolkit.
    pub fn is_native(&self) -> Result<bool> {
        Ok(self.adapter()?.has_toolkit())
    }

    pub fn root(&self) -> Result<Option<ElementHandle>> {
        Ok(self.adapter()?.root())
    }

    pub fn create_element(&mut self, kind: ElementKind, props: Props) -> Result<ElementHandle> {
        Ok(self.adapter_mut()?.create_element(kind, props))
    }

    /// `create_element` with the kind given by name, as UI components pass it.
    pub fn create_element_named(&mut self, kind: &str, props: Props) -> Result<ElementHandle> {
        let kind = kind.parse::<ElementKind>()?;
        self.create_element(kind, props)
    }

    pub fn update_element(&mut self, handle: &ElementHandle, props: &Props) -> Result<()> {
        self.adapter_mut()?.update_element(handle, props)
    }

    pub fn append_child(&mut self, parent: &ElementHandle, child: &ElementHandle) -> Result<()> {
        self.adapter_mut()?.append_child(parent, child)
    }

    pub fn remove_child(&mut self, parent: &ElementHandle, child: &ElementHandle) -> Result<()> {
        self.adapter_mut()?.remove_child(parent, child)
    }

    pub fn set_event_handler<F>(&mut self, handle: &ElementHandle, event: EventKind, handler: F) -> Result<()>
    where
        F: Fn(&UiEvent) + Send + Sync + 'static,
    {
        self.adapter_mut()?
            .set_event_handler(handle, event, Arc::new(handler))
    }

    /// `set_event_handler` with the event given by name.
    pub fn on<F>(&mut self, handle: &ElementHandle, event: &str, handler: F) -> Result<()>
    where
        F: Fn(&UiEvent) + Send + Sync + 'static,
    {
        let event = event.parse::<EventKind>()?;
        self.set_event_handler(handle, event, handler)
    }

    pub fn apply_styles(&mut self, handle: &ElementHandle, styles: impl Into<StyleInput>) -> Result<()> {
        self.adapter_mut()?.apply_styles(handle, &styles.into())
    }

    pub fn element(&self, handle: &ElementHandle) -> Result<&ElementRecord> {
        self.adapter()?
            .element(handle)
            .ok_or_else(|| SansError::UnknownElement(handle.id().to_string()))
    }

    /// Deliver `event` to a fallback element's stored handler.
    pub fn emit(&self, handle: &ElementHandle, event: &UiEvent) -> Result<bool> {
        self.adapter()?.emit(handle, event)
    }

    /// Release every element and unbind. Every later call fails with
    /// `AdapterNotInitialized`.
    #[instrument(skip(self))]
    pub fn destroy(&mut self) {
        if let Some(mut adapter) = self.adapter.take() {
            adapter.destroy();
            info!("adapter destroyed");
        }
    }
}

impl Drop for AdapterDispatcher {
    fn drop(&mut self) {
        self.destroy();
    }
}
