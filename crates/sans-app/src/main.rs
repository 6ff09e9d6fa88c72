// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sans UI — demo host.
//
// Entry point. Initialises logging and configuration, detects the platform,
// builds a component tree through the factory, then drives the native
// bridge against an in-process loopback host.

mod demo;
mod services;

use std::sync::Arc;

use serde_json::json;
use tracing::{error, info, warn};

use sans_bridge::{DroppedMessage, HostBindings, NativeBridge, WebViewSession, platform_bridge};
use sans_core::SansConfig;
use sans_native::{NoToolkits, PlatformContext};

use services::data_dir::config_path;
use services::loopback::LoopbackHost;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Sans UI starting");

    let config = load_config();
    let context = PlatformContext::detect();
    match serde_json::to_string(context.report()) {
        Ok(report) => info!(%report, "platform report"),
        Err(e) => warn!(error = %e, "platform report not serializable"),
    }

    if let Err(e) = run_form(&context, &config) {
        error!(error = %e, "component demo failed");
    }
    if let Err(e) = run_bridge(&config).await {
        error!(error = %e, "bridge demo failed");
    }
}

fn load_config() -> SansConfig {
    let path = config_path();
    if path.exists() {
        return SansConfig::load_or_default(&path);
    }
    let config = SansConfig::default();
    match config.save(&path) {
        Ok(()) => info!(path = %path.display(), "default config written"),
        Err(e) => warn!(path = %path.display(), error = %e, "could not write default config"),
    }
    config
}

fn run_form(context: &PlatformContext, config: &SansConfig) -> sans_core::Result<()> {
    let mut form = demo::build(context, &NoToolkits, config)?;
    form.simulate()?;
    form.log_tree()?;
    form.factory.native_ui().destroy();
    Ok(())
}

async fn run_bridge(config: &SansConfig) -> sans_core::Result<()> {
    let host = Arc::new(LoopbackHost::new(config));
    let bindings = HostBindings {
        script_handler: Some(host.clone()),
        ..HostBindings::default()
    };

    let transport = match platform_bridge(&bindings, config) {
        NativeBridge::WebView(transport) => transport,
        other => {
            warn!(container = other.transport().container(), "unexpected bridge flavour");
            return Ok(());
        }
    };
    host.attach(transport.inbound());
    transport.set_diagnostics(Some(Arc::new(|dropped: &DroppedMessage| {
        warn!(?dropped, "bridge reply dropped");
    })));

    let mut session = WebViewSession::with_webview("about:blank", transport);
    session.start().await?;
    session.navigate("https://example.org/").await?;
    let result = session.execute_javascript("document.title").await?;
    info!(%result, location = session.location(), "script executed");

    if let Some(transport) = session.transport() {
        match transport.send_message("vibrate", json!({ "ms": 50 }))?.await {
            Ok(value) => info!(%value, "vibrate accepted"),
            Err(e) if e.is_native() => info!(error = %e, "host declined custom action"),
            Err(e) => return Err(e),
        }
        // Reply for a call nobody made: reported via diagnostics, then ignored.
        transport.receive_native_message(r#"{"id":"cb_999","data":true}"#);
        info!(pending = transport.pending_calls(), "bridge idle");
    }
    info!(actions = ?host.handled(), "loopback host done");
    Ok(())
}
