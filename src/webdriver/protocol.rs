//! W3C WebDriver wire types
//!
//! Request bodies and response envelopes for the handful of endpoints the
//! harness uses, and the capability rewrite Appium expects.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::core::{CapabilitySet, HarnessError, Result};
use crate::webdriver::ElementRef;

/// W3C element identifier key
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52f-4cbc08ad3a35";

/// JSONWP element identifier key, still sent by older Appium servers
pub const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

/// Capability names defined by W3C WebDriver; everything else needs a vendor prefix
const STANDARD_CAPABILITIES: &[&str] = &[
    "browserName",
    "browserVersion",
    "platformName",
    "acceptInsecureCerts",
    "pageLoadStrategy",
    "proxy",
    "setWindowRect",
    "timeouts",
    "strictFileInteractability",
    "unhandledPromptBehavior",
    "webSocketUrl",
];

const DEFAULT_PLATFORM: &str = "Android";
const DEFAULT_AUTOMATION: &str = "UiAutomator2";

/// Rewrite a flat capability set for a W3C new-session request
///
/// Non-standard names get the `appium:` prefix unless they already carry a
/// vendor prefix; `platformName` and `appium:automationName` default to
/// Android/UiAutomator2.
pub fn to_w3c_capabilities(caps: &CapabilitySet) -> CapabilitySet {
    let mut out = CapabilitySet::new();
    for (key, value) in caps {
        let name = if key.contains(':') || STANDARD_CAPABILITIES.contains(&key.as_str()) {
            key.clone()
        } else {
            format!("appium:{}", key)
        };
        out.insert(name, value.clone());
    }

    out.entry("platformName")
        .or_insert_with(|| Value::String(DEFAULT_PLATFORM.to_string()));
    out.entry("appium:automationName")
        .or_insert_with(|| Value::String(DEFAULT_AUTOMATION.to_string()));
    out
}

/// Body of `POST /session`
pub(crate) fn new_session_body(caps: &CapabilitySet) -> Value {
    json!({
        "capabilities": {
            "alwaysMatch": to_w3c_capabilities(caps),
            "firstMatch": [{}],
        }
    })
}

/// Body of `POST /session/{id}/element/{id}/value`
pub(crate) fn send_keys_body(text: &str) -> Value {
    let chars: Vec<String> = text.chars().map(|c| c.to_string()).collect();
    json!({ "text": text, "value": chars })
}

/// Generic `{"value": ...}` envelope
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub value: Value,
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<String>,
}

/// Error payload carried in `value` on failure
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct ErrorValue {
    pub error: String,
    #[serde(default)]
    pub message: String,
}

/// Turn a failed response body into a WebDriver error
pub(crate) fn error_from_body(status: u16, body: &str) -> HarnessError {
    let parsed = serde_json::from_str::<Envelope>(body)
        .ok()
        .and_then(|env| serde_json::from_value::<ErrorValue>(env.value).ok());

    match parsed {
        Some(err) => HarnessError::WebDriver {
            error: err.error,
            message: err.message,
        },
        None => HarnessError::WebDriver {
            error: format!("http {}", status),
            message: body.chars().take(500).collect(),
        },
    }
}

/// Session id from a new-session response (W3C or legacy shape)
pub(crate) fn session_id_from(envelope: &Envelope) -> Result<String> {
    envelope
        .value
        .get("sessionId")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| envelope.session_id.clone())
        .ok_or_else(|| HarnessError::WebDriver {
            error: "invalid response".to_string(),
            message: "new session response carried no sessionId".to_string(),
        })
}

/// Element reference from a find-element response
pub(crate) fn element_from(value: &Value) -> Result<ElementRef> {
    value
        .get(ELEMENT_KEY)
        .or_else(|| value.get(LEGACY_ELEMENT_KEY))
        .and_then(Value::as_str)
        .map(ElementRef::new)
        .ok_or_else(|| HarnessError::WebDriver {
            error: "invalid response".to_string(),
            message: format!("no element reference in {}", value),
        })
}
