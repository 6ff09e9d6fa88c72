// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sans UI — Native rendering.
//
// Platform detection, the style/event translation layer, and the three
// platform adapters (desktop widgets, mobile views, DOM) behind one element
// lifecycle. The dispatcher binds one adapter per process; the component
// factory is what UI code talks to.

pub mod adapter;
pub mod dispatcher;
pub mod element;
pub mod factory;
pub mod platform;
pub mod style;
pub mod toolkit;

#[cfg(test)]
mod test_support;

pub use adapter::{DesktopAdapter, MobileAdapter, PlatformAdapter, WebAdapter};
pub use dispatcher::AdapterDispatcher;
pub use element::{ElementHandle, ElementRecord, NativeRef};
pub use factory::ComponentFactory;
pub use platform::{EnvironmentMarkers, PlatformContext, PlatformReport, detect_platform};
pub use style::{StyleInput, StyleMap, StyleValue};
pub use toolkit::{DesktopToolkit, DomDocument, MobileToolkit, NativeToolkitProvider, NoToolkits, Toolkits};
