// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform detection.
//
// Classification is a pure function of a set of environment markers. The
// markers for the running process are gathered once at startup and the
// result lives in a `PlatformContext` that dependents borrow; nothing here
// re-detects.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use sans_core::{Os, Platform, PlatformInfo};

/// Marker left by a mobile native runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MobileRuntime {
    pub version: String,
    /// Android platform globals are present.
    pub android: bool,
    /// iOS platform globals are present.
    pub ios: bool,
}

/// Marker left by a desktop runtime that exposes a process platform field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesktopRuntime {
    /// `win32`/`windows`, `darwin`/`macos`, `linux`, ...
    pub process_platform: String,
    pub version: Option<String>,
}

/// Everything detection looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentMarkers {
    pub mobile_runtime: Option<MobileRuntime>,
    pub desktop_runtime: Option<DesktopRuntime>,
    pub user_agent: Option<String>,
    pub vendor: Option<String>,
}

impl EnvironmentMarkers {
    /// Markers for the compiled target. Mobile targets report a mobile
    /// runtime, wasm reports nothing (a browser host supplies its user
    /// agent through [`EnvironmentMarkers::browser`]), everything else is a
    /// desktop runtime.
    pub fn current() -> Self {
        let mut markers = Self::default();
        if cfg!(any(target_os = "android", target_os = "ios")) {
            markers.mobile_runtime = Some(MobileRuntime {
                version: env!("CARGO_PKG_VERSION").to_string(),
                android: cfg!(target_os = "android"),
                ios: cfg!(target_os = "ios"),
            });
        } else if !cfg!(target_family = "wasm") {
            markers.desktop_runtime = Some(DesktopRuntime {
                process_platform: std::env::consts::OS.to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            });
        }
        markers
    }

    pub fn browser(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: Some(user_agent.into()),
            ..Self::default()
        }
    }

    fn user_agent_lower(&self) -> String {
        self.user_agent.as_deref().unwrap_or("").to_ascii_lowercase()
    }
}

const MOBILE_BROWSER_MARKERS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Classify an environment. Precedence: mobile runtime, then desktop
/// runtime, then the user agent.
pub fn detect_platform(markers: &EnvironmentMarkers) -> PlatformInfo {
    if let Some(runtime) = &markers.mobile_runtime {
        let os = if runtime.android {
            Os::Android
        } else if runtime.ios {
            Os::Ios
        } else {
            Os::Unknown
        };
        return PlatformInfo {
            platform: Platform::Mobile,
            os,
        };
    }

    if let Some(runtime) = &markers.desktop_runtime {
        return PlatformInfo {
            platform: Platform::Desktop,
            os: process_platform_os(&runtime.process_platform),
        };
    }

    let ua = markers.user_agent_lower();
    let platform = if MOBILE_BROWSER_MARKERS.iter().any(|m| ua.contains(m)) {
        Platform::Mobile
    } else {
        Platform::Web
    };
    PlatformInfo {
        platform,
        os: user_agent_os(&ua),
    }
}

fn process_platform_os(process_platform: &str) -> Os {
    match process_platform {
        "win32" | "windows" => Os::Windows,
        "darwin" | "macos" => Os::Macos,
        "linux" => Os::Linux,
        _ => Os::Unknown,
    }
}

/// `ua` must already be lowercase. Mobile systems are checked first since
/// their user agents also mention the desktop system they derive from.
fn user_agent_os(ua: &str) -> Os {
    if ua.contains("android") {
        Os::Android
    } else if ["iphone", "ipad", "ipod"].iter().any(|m| ua.contains(m)) {
        Os::Ios
    } else if ua.contains("windows") {
        Os::Windows
    } else if ua.contains("macintosh") || ua.contains("mac os x") {
        Os::Macos
    } else if ua.contains("linux") {
        Os::Linux
    } else {
        Os::Unknown
    }
}

/// Detection result plus the raw markers it was derived from.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformReport {
    pub info: PlatformInfo,
    pub user_agent: Option<String>,
    pub vendor: Option<String>,
    pub runtime_version: Option<String>,
    pub desktop_version: Option<String>,
    pub detected_at: DateTime<Utc>,
}

/// Platform classification for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct PlatformContext {
    report: PlatformReport,
}

impl PlatformContext {
    /// Detect the running process. Call once at startup.
    pub fn detect() -> Self {
        Self::from_markers(&EnvironmentMarkers::current())
    }

    pub fn from_markers(markers: &EnvironmentMarkers) -> Self {
        let info = detect_platform(markers);
        info!(platform = %info, "platform detected");
        Self {
            report: PlatformReport {
                info,
                user_agent: markers.user_agent.clone(),
                vendor: markers.vendor.clone(),
                runtime_version: markers.mobile_runtime.as_ref().map(|r| r.version.clone()),
                desktop_version: markers
                    .desktop_runtime
                    .as_ref()
                    .and_then(|r| r.version.clone()),
                detected_at: Utc::now(),
            },
        }
    }

    pub fn info(&self) -> PlatformInfo {
        self.report.info
    }

    pub fn report(&self) -> &PlatformReport {
        &self.report
    }
}
