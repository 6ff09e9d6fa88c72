// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Runtime configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SansError};

/// Bridge and adapter settings.
///
/// None of these fields influence platform detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SansConfig {
    /// Prefix for bridge call ids (`cb_1`, `cb_2`, ...).
    pub id_prefix: String,
    /// Script message handler registered by the WebView container.
    pub message_handler: String,
    /// Global function the host calls to deliver replies.
    pub inbound_function: String,
    /// Object looked up on the WebEngine channel once the handshake completes.
    pub channel_object: String,
    /// Per-call timeout in milliseconds. `None` waits for the host forever.
    pub call_timeout_ms: Option<u64>,
    /// Create a root container when the native toolkit is available.
    pub root_container: bool,
}

impl Default for SansConfig {
    fn default() -> Self {
        Self {
            id_prefix: "cb_".into(),
            message_handler: "webViewBridge".into(),
            inbound_function: "receiveNativeMessage".into(),
            channel_object: "bridge".into(),
            call_timeout_ms: None,
            root_container: true,
        }
    }
}

impl SansConfig {
    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_ms.map(Duration::from_millis)
    }

    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        debug!(path = %path.as_ref().display(), "config loaded");
        Ok(config)
    }

    /// Read a JSON config file, falling back to defaults when it is missing
    /// or unreadable.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.as_ref().display(), error = %e, "using default config");
                Self::default()
            }
        }
    }

    /// Reject settings the bridge cannot work with: empty wire names or a
    /// zero timeout.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("id_prefix", &self.id_prefix),
            ("message_handler", &self.message_handler),
            ("inbound_function", &self.inbound_function),
            ("channel_object", &self.channel_object),
        ] {
            if value.trim().is_empty() {
                return Err(SansError::Config(format!("`{field}` must not be empty")));
            }
        }
        if self.call_timeout_ms == Some(0) {
            return Err(SansError::Config("`call_timeout_ms` must be positive".into()));
        }
        Ok(())
    }

    /// Write the config as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}
