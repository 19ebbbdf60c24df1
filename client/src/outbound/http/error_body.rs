//! Message extraction from failure bodies.
//!
//! Priority: a non-blank string `message`, then the values of an object (or
//! array) `message` flattened one level and joined by newlines, then a
//! non-blank string `error`, then the generic fallback.

use serde_json::Value;

use crate::domain::GENERIC_FAILURE_MESSAGE;

/// Resident-facing message for a non-success body.
pub(super) fn server_message(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|parsed| message_from(&parsed))
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_owned())
}

fn message_from(body: &Value) -> Option<String> {
    let fields = body.as_object()?;
    let from_message = match fields.get("message") {
        Some(Value::String(text)) => non_blank(text),
        Some(Value::Object(entries)) => joined(entries.values()),
        Some(Value::Array(entries)) => joined(entries.iter()),
        _ => None,
    };
    from_message.or_else(|| match fields.get("error") {
        Some(Value::String(text)) => non_blank(text),
        _ => None,
    })
}

fn joined<'a>(values: impl Iterator<Item = &'a Value>) -> Option<String> {
    let mut lines = Vec::new();
    for value in values {
        match value {
            Value::Array(items) => lines.extend(items.iter().filter_map(line)),
            other => lines.extend(line(other)),
        }
    }
    (!lines.is_empty()).then(|| lines.join("\n"))
}

fn line(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => non_blank(text),
        other => Some(other.to_string()),
    }
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
