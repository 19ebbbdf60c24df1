//! Port for issuing portal API calls.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{ApiRequest, GatewayError, Listing};

/// Single choke point for outbound portal calls.
///
/// Implementations attach credentials, dispatch, and normalise every outcome
/// into parsed JSON or a [`GatewayError`]. They never present UI.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// Issue one request and return the parsed success body.
    async fn send(&self, request: ApiRequest) -> Result<Value, GatewayError>;
}

/// Issue `request` and decode the success body, which must be a JSON object,
/// into the record `T`.
///
/// Derived record deserialisers also accept arrays positionally, so other
/// shapes are refused before decoding.
///
/// # Errors
///
/// Returns the gateway's error unchanged, or [`GatewayError::Decode`] when
/// the body is not an object or does not match `T`.
pub async fn request_as<T: DeserializeOwned>(
    gateway: &dyn ApiGateway,
    request: ApiRequest,
) -> Result<T, GatewayError> {
    let path = request.path().to_owned();
    let body = gateway.send(request).await?;
    if !body.is_object() {
        return Err(GatewayError::decode(format!(
            "unexpected response from {path}: expected an object, got {}",
            json_kind(&body)
        )));
    }
    decode(&path, body)
}

/// Issue `request` and decode either a bare array or a paged wrapper of `T`.
///
/// # Errors
///
/// Returns the gateway's error unchanged, or [`GatewayError::Decode`] when
/// the body is neither shape.
pub async fn request_listing<T: DeserializeOwned>(
    gateway: &dyn ApiGateway,
    request: ApiRequest,
) -> Result<Vec<T>, GatewayError> {
    let path = request.path().to_owned();
    let body = gateway.send(request).await?;
    decode::<Listing<T>>(&path, body).map(Listing::into_items)
}

/// Issue `request` and discard the success body.
///
/// # Errors
///
/// Returns the gateway's error unchanged.
pub async fn dispatch(gateway: &dyn ApiGateway, request: ApiRequest) -> Result<(), GatewayError> {
    gateway.send(request).await.map(drop)
}

fn decode<T: DeserializeOwned>(path: &str, body: Value) -> Result<T, GatewayError> {
    serde_json::from_value(body)
        .map_err(|error| GatewayError::decode(format!("unexpected response from {path}: {error}")))
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
