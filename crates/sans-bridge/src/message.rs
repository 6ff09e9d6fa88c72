// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge wire format.
//
// Outbound: { "id": "cb_<n>", "action": "<name>", "data": {...} }
// Inbound:  { "id": "cb_<n>", "error": "<string>"?, "data": {...}? }

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request written to the native channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub id: String,
    pub action: String,
    pub data: Value,
}

/// Reply delivered by the native host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl InboundMessage {
    pub fn success(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            error: None,
            data: Some(data),
        }
    }

    pub fn failure(id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            error: Some(error.into()),
            data: None,
        }
    }

    /// Script a WebView host evaluates to deliver this reply through the
    /// inbound global `function`, with the JSON passed as a string literal.
    pub fn to_script(&self, function: &str) -> serde_json::Result<String> {
        let literal = serde_json::to_string(&serde_json::to_string(self)?)?;
        Ok(format!("{function}({literal})"))
    }

    /// The reported error, if any. An empty error string counts as success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }
}

/// Native capabilities reachable over the bridge.
///
/// Every capability is just an action name on the same request/response
/// plumbing; `Custom` covers actions a host adds later.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    Navigate,
    Reload,
    ExecuteJavaScript,
    OpenFileDialog,
    ShowNotification,
    Custom(String),
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Navigate => "navigate",
            Self::Reload => "reload",
            Self::ExecuteJavaScript => "executeJavaScript",
            Self::OpenFileDialog => "openFileDialog",
            Self::ShowNotification => "showNotification",
            Self::Custom(name) => name,
        }
    }
}

impl From<&str> for Action {
    fn from(name: &str) -> Self {
        match name {
            "navigate" => Self::Navigate,
            "reload" => Self::Reload,
            "executeJavaScript" => Self::ExecuteJavaScript,
            "openFileDialog" => Self::OpenFileDialog,
            "showNotification" => Self::ShowNotification,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `navigate` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigateRequest {
    pub url: String,
}

/// `executeJavaScript` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteJavaScriptRequest {
    pub code: String,
}

/// `openFileDialog` payload. Unset fields are left to the host's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDialogOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_dialog: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

/// `showNotification` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOptions {
    pub title: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<String>,
}

impl NotificationOptions {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            icon_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn outbound_wire_shape() {
        let msg = OutboundMessage {
            id: "cb_1".into(),
            action: Action::Navigate.to_string(),
            data: json!({ "url": "https://x" }),
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({ "id": "cb_1", "action": "navigate", "data": { "url": "https://x" } })
        );
    }

    #[test]
    fn inbound_optional_fields() {
        let ok: InboundMessage = serde_json::from_str(r#"{"id":"cb_2"}"#).unwrap();
        assert_eq!(ok.error(), None);
        assert_eq!(ok.data, None);

        let failed: InboundMessage =
            serde_json::from_str(r#"{"id":"cb_3","error":"Invalid URL"}"#).unwrap();
        assert_eq!(failed.error(), Some("Invalid URL"));

        let empty_error: InboundMessage =
            serde_json::from_str(r#"{"id":"cb_4","error":"","data":{"ok":true}}"#).unwrap();
        assert_eq!(empty_error.error(), None);
    }

    #[test]
    fn reply_script_quotes_the_json() {
        let reply = InboundMessage::success("cb_5", json!("it's \"done\""));
        let script = reply.to_script("receiveNativeMessage").unwrap();
        assert_eq!(
            script,
            r#"receiveNativeMessage("{\"id\":\"cb_5\",\"data\":\"it's \\\"done\\\"\"}")"#
        );
    }

    #[test]
    fn action_names_round_trip_through_str() {
        for action in [
            Action::Navigate,
            Action::Reload,
            Action::ExecuteJavaScript,
            Action::OpenFileDialog,
            Action::ShowNotification,
        ] {
            assert_eq!(Action::from(action.as_str()), action);
        }
        assert_eq!(Action::from("vibrate"), Action::Custom("vibrate".into()));
    }

    #[test]
    fn option_payloads_use_camel_case() {
        let dialog = FileDialogOptions {
            title: Some("Open".into()),
            save_dialog: Some(true),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&dialog).unwrap(),
            json!({ "title": "Open", "saveDialog": true })
        );

        let note = NotificationOptions {
            icon_name: Some("dialog-information".into()),
            ..NotificationOptions::new("Saved", "Done")
        };
        assert_eq!(
            serde_json::to_value(&note).unwrap(),
            json!({ "title": "Saved", "text": "Done", "iconName": "dialog-information" })
        );
    }
}
