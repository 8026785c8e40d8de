//! Helpers for JSON columns written by older deployments, which stored arrays and
//! objects as JSON-encoded strings inside the JSON column.

use serde_json::Value;

/// Unwraps a JSON string holding an encoded array or object; any other value is returned as is.
#[must_use]
pub fn normalize(value: Value) -> Value {
    match value {
        Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(decoded @ (Value::Array(_) | Value::Object(_))) => decoded,
            _ => Value::String(raw),
        },
        other => other,
    }
}

/// Reads a list of option texts, accepting plain strings or `{"text": ...}` objects.
#[must_use]
pub fn string_list(value: &Value) -> Vec<String> {
    let Value::Array(items) = normalize(value.clone()) else {
        return Vec::new();
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::String(text) => text,
            Value::Object(mut map) => match map.remove("text") {
                Some(Value::String(text)) => text,
                Some(other) => other.to_string(),
                None => Value::Object(map).to_string(),
            },
            other => other.to_string(),
        })
        .collect()
}
