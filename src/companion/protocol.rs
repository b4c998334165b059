//! Companion WebSocket bridge message shapes
//!
//! Requests are `{"id", "method", "params"}`; responses carry `result` or
//! `error`; server pushes are `{"event", "payload"}`.

use serde::Serialize;
use serde_json::Value;

/// Id reserved for the variable snapshot sent on every connect
pub const SNAPSHOT_REQUEST_ID: u64 = 1;

/// First id handed out to regular calls
pub const FIRST_CALL_ID: u64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl Request {
    pub fn call(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            id,
            method: method.into(),
            params: Some(params),
        }
    }

    pub fn snapshot() -> Self {
        Self {
            id: SNAPSHOT_REQUEST_ID,
            method: "queryVariables".to_string(),
            params: None,
        }
    }
}

/// Which kind of button interaction a handler listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonEventKind {
    Down,
    Up,
    Rotate,
}

impl ButtonEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ButtonEventKind::Down => "button_down",
            ButtonEventKind::Up => "button_up",
            ButtonEventKind::Rotate => "rotate",
        }
    }
}

/// A button position on a Companion page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ButtonLocation {
    /// Page number or page name, normalized to text
    pub page: String,
    pub x: i64,
    pub y: i64,
}

impl ButtonLocation {
    pub fn new(page: impl ToString, x: i64, y: i64) -> Self {
        Self {
            page: page.to_string(),
            x,
            y,
        }
    }
}

/// A variable update delivered to change handlers
#[derive(Debug, Clone, PartialEq)]
pub struct VariableChange {
    pub connection: String,
    pub variable: String,
    pub value: Value,
}

/// A button interaction delivered to button handlers
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonEvent {
    pub location: ButtonLocation,
    pub kind: ButtonEventKind,
    /// The raw `interaction` payload, e.g. `direction` for rotations
    pub payload: Value,
}

impl ButtonEvent {
    /// Parse an `interaction` payload. Presses map to down/up by the
    /// truthiness of `value`; unknown interaction types yield `None`.
    pub fn from_interaction(payload: &Value) -> Option<Self> {
        let kind = match payload.get("event").and_then(Value::as_str) {
            Some("press") => {
                if payload.get("value").is_some_and(is_truthy) {
                    ButtonEventKind::Down
                } else {
                    ButtonEventKind::Up
                }
            }
            Some("rotate") => ButtonEventKind::Rotate,
            _ => return None,
        };
        let page = payload.get("page").map(value_key).unwrap_or_default();
        let x = payload.get("x").and_then(Value::as_i64)?;
        let y = payload.get("y").and_then(Value::as_i64)?;
        Some(Self {
            location: ButtonLocation { page, x, y },
            kind,
            payload: payload.clone(),
        })
    }
}

/// Text form of a JSON scalar used as a lookup key (`1` and `"1"` agree).
pub fn value_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// JSON truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Text of an `error` field, which may be a string or a structured value.
pub fn error_message(error: &Value) -> String {
    match error {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
        other => other.to_string(),
    }
}
