//! GET payload to query string flattening.

use serde_json::{Map, Value};

use crate::domain::GatewayError;

/// Flatten a GET payload into `key=value` pairs.
///
/// Scalars become one pair, arrays repeat the key once per element and
/// `null` values are skipped. A `null` payload yields no pairs.
///
/// # Errors
///
/// Returns [`GatewayError::RequestSetup`] when the payload is not an object
/// or a value nests another object or array.
pub(super) fn query_pairs(payload: &Value) -> Result<Vec<(String, String)>, GatewayError> {
    match payload {
        Value::Null => Ok(Vec::new()),
        Value::Object(fields) => flatten_object(fields),
        other => Err(GatewayError::setup(format!(
            "GET payload must be an object, got {}",
            type_name(other)
        ))),
    }
}

fn flatten_object(fields: &Map<String, Value>) -> Result<Vec<(String, String)>, GatewayError> {
    let mut pairs = Vec::with_capacity(fields.len());
    for (key, value) in fields {
        match value {
            Value::Array(elements) => {
                for element in elements {
                    if let Some(text) = scalar(key, element)? {
                        pairs.push((key.clone(), text));
                    }
                }
            }
            other => {
                if let Some(text) = scalar(key, other)? {
                    pairs.push((key.clone(), text));
                }
            }
        }
    }
    Ok(pairs)
}

fn scalar(key: &str, value: &Value) -> Result<Option<String>, GatewayError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text.clone())),
        Value::Bool(flag) => Ok(Some(flag.to_string())),
        Value::Number(number) => Ok(Some(number.to_string())),
        Value::Array(_) | Value::Object(_) => Err(GatewayError::setup(format!(
            "query parameter `{key}` must not nest {}",
            type_name(value)
        ))),
    }
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
