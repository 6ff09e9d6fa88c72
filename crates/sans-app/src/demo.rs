// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Small sign-in form built through the component factory.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{info, warn};

use sans_core::error::Result;
use sans_core::{ElementKind, EventKind, Props, SansConfig, UiEvent};
use sans_native::{ComponentFactory, ElementHandle, NativeToolkitProvider, PlatformContext};

pub struct Form {
    pub factory: ComponentFactory,
    pub container: ElementHandle,
    pub email: ElementHandle,
    pub submit: ElementHandle,
    pub clicks: Arc<AtomicUsize>,
}

pub fn build(context: &PlatformContext, toolkits: &dyn NativeToolkitProvider, config: &SansConfig) -> Result<Form> {
    let mut factory = ComponentFactory::new(context, toolkits, config);
    factory.register_component(
        "PrimaryButton",
        ElementKind::Button,
        Props::new().with("label", "OK").with("color", "white"),
    );

    let container = factory.create_container(Props::new())?;
    let title = factory.create_label(Props::new().with("text", "Sign in"))?;
    let email = factory.create_text_input(Props::new().with("placeholder", "Email"))?;
    let submit = factory.create("PrimaryButton", Props::new().with("label", "Continue"))?;

    let clicks = Arc::new(AtomicUsize::new(0));
    let ui = factory.native_ui();
    if let Some(root) = ui.root()? {
        ui.append_child(&root, &container)?;
    }
    for child in [&title, &email, &submit] {
        ui.append_child(&container, child)?;
    }

    let counter = clicks.clone();
    ui.set_event_handler(&submit, EventKind::Click, move |_| {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        info!(clicks = n, "continue pressed");
    })?;
    ui.on(&email, "change", |event| {
        info!(value = event.value.as_deref().unwrap_or(""), "email changed");
    })?;

    ui.apply_styles(&container, "padding: 12px 16px; background-color: #fafafa")?;
    ui.apply_styles(&submit, [("backgroundColor", "#3367d6"), ("borderRadius", "4px")])?;
    ui.apply_styles(&title, "margin: 1px 2px 3px; font-size: 18px")?;

    Ok(Form {
        factory,
        container,
        email,
        submit,
        clicks,
    })
}

impl Form {
    /// Deliver synthetic events to elements that have no native backing.
    pub fn simulate(&mut self) -> Result<()> {
        let ui = self.factory.native_ui();
        if !ui.emit(&self.submit, &UiEvent::new(EventKind::Click))? {
            warn!("submit button is native; nothing to simulate");
        }
        ui.emit(&self.email, &UiEvent::with_value(EventKind::Change, "ada@example.org"))?;
        Ok(())
    }

    /// Log the element tree under the form container.
    pub fn log_tree(&mut self) -> Result<()> {
        let ui = self.factory.native_ui();
        let record = ui.element(&self.container)?;
        let children = record.children().to_vec();
        info!(
            id = %self.container.id(),
            kind = self.container.kind().as_str(),
            native = !record.is_fallback(),
            styles = record.style().len(),
            children = children.len(),
            "form container"
        );
        for handle in [&self.email, &self.submit] {
            let record = ui.element(handle)?;
            info!(
                id = %handle.id(),
                kind = handle.kind().as_str(),
                native = !record.is_fallback(),
                props = record.props().len(),
                styles = record.style().len(),
                "  child"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sans_native::{EnvironmentMarkers, NoToolkits};

    #[test]
    fn fallback_form_counts_clicks() {
        let context = PlatformContext::from_markers(&EnvironmentMarkers::browser(
            "Mozilla/5.0 (X11; Linux x86_64) Firefox/121.0",
        ));
        let mut form = build(&context, &NoToolkits, &SansConfig::default()).unwrap();
        form.simulate().unwrap();
        form.simulate().unwrap();
        assert_eq!(form.clicks.load(Ordering::SeqCst), 2);

        let ui = form.factory.native_ui();
        assert_eq!(ui.element(&form.container).unwrap().children().len(), 3);
        let submit = ui.element(&form.submit).unwrap();
        assert_eq!(submit.props().get_str("label"), Some("Continue"));
        assert_eq!(submit.props().get_str("color"), Some("white"));
        form.log_tree().unwrap();
    }
}
