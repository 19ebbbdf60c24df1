//! Request descriptors handed to the gateway port.
//!
//! A descriptor is built per call and dropped once the gateway returns. It
//! carries no transport types so services can construct requests without
//! depending on the HTTP adapter.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::error::GatewayError;

/// HTTP verbs accepted by the portal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Read; payload travels as query parameters.
    Get,
    /// Create; payload travels as a JSON body.
    Post,
    /// Replace; payload travels as a JSON body.
    Put,
    /// Partial update; payload travels as a JSON body.
    Patch,
    /// Remove; payload (if any) travels as a JSON body.
    Delete,
}

impl Method {
    /// Upper-case verb as sent on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Whether the payload belongs in the query string rather than the body.
    pub const fn sends_payload_as_query(self) -> bool {
        matches!(self, Self::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional transport configuration for a single request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestConfig {
    headers: BTreeMap<String, String>,
}

impl RequestConfig {
    /// Add an extra header. Later values replace earlier ones.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Extra headers in name order.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// One outbound call: method, path relative to the base URL, payload and
/// transport configuration.
///
/// # Examples
/// ```
/// use portal_client::domain::{ApiRequest, Method};
/// use serde_json::json;
///
/// let request = ApiRequest::get("/hotlines").with_payload(json!({ "page": 2 }));
/// assert_eq!(request.method(), Method::Get);
/// assert_eq!(request.path(), "/hotlines");
/// assert!(request.payload().is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    payload: Option<Value>,
    config: RequestConfig,
}

impl ApiRequest {
    /// Build a request with no payload and default configuration.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            payload: None,
            config: RequestConfig::default(),
        }
    }

    /// Shorthand for [`Method::Get`].
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Shorthand for [`Method::Post`].
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// Shorthand for [`Method::Put`].
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    /// Shorthand for [`Method::Patch`].
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    /// Shorthand for [`Method::Delete`].
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attach a JSON payload.
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Serialise `payload` and attach it.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RequestSetup`] when `payload` cannot be
    /// represented as JSON, so nothing is sent in its place.
    pub fn with_json<T: Serialize>(self, payload: &T) -> Result<Self, GatewayError> {
        let value = serde_json::to_value(payload).map_err(|error| {
            GatewayError::setup(format!("payload for {} is not valid JSON: {error}", self.path))
        })?;
        Ok(self.with_payload(value))
    }

    /// Replace the transport configuration.
    #[must_use]
    pub fn with_config(mut self, config: RequestConfig) -> Self {
        self.config = config;
        self
    }

    /// HTTP verb.
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Path relative to the configured base URL.
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// Payload, if any.
    pub const fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Transport configuration.
    pub const fn config(&self) -> &RequestConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for request descriptors.

    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(Method::Get, true)]
    #[case(Method::Post, false)]
    #[case(Method::Put, false)]
    #[case(Method::Patch, false)]
    #[case(Method::Delete, false)]
    fn only_get_sends_payload_as_query(#[case] method: Method, #[case] expected: bool) {
        assert_eq!(method.sends_payload_as_query(), expected);
    }

    #[test]
    fn with_json_serialises_payload() {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Payload {
            account_id: &'static str,
        }

        let request = ApiRequest::post("/auth/activate")
            .with_json(&Payload { account_id: "A1B2" })
            .expect("payload serialises");
        assert_eq!(request.payload(), Some(&json!({ "accountId": "A1B2" })));
    }

    #[test]
    fn unserialisable_payload_is_setup_error() {
        let mut payload = BTreeMap::new();
        payload.insert((1, 2), "composite keys have no JSON form");

        let error = ApiRequest::post("complaints")
            .with_json(&payload)
            .expect_err("map keys must be strings");
        assert!(matches!(error, GatewayError::RequestSetup { .. }));
    }

    #[test]
    fn later_headers_replace_earlier_ones() {
        let config = RequestConfig::default()
            .with_header("X-Client", "one")
            .with_header("X-Client", "two");
        let headers: Vec<_> = config.headers().collect();
        assert_eq!(headers, vec![("X-Client", "two")]);
    }
}
