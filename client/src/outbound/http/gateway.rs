//! Reqwest-backed portal gateway.
//!
//! This adapter owns transport details only: URL resolution, bearer
//! attachment, payload placement, the request timeout and the mapping of
//! every outcome into [`GatewayError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::error_body::server_message;
use super::query::query_pairs;
use crate::domain::ports::ApiGateway;
use crate::domain::{ApiRequest, GENERIC_FAILURE_MESSAGE, GatewayError, Method, SessionContext};

/// Timeout applied when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Gateway that issues requests against one portal base URL.
pub struct HttpGateway {
    client: Client,
    base_url: Url,
    session: SessionContext,
}

impl HttpGateway {
    /// Build a gateway using a reqwest client with an explicit timeout.
    ///
    /// Relative request paths resolve beneath `base_url`, whether or not it
    /// ends in a slash.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        timeout: Duration,
        session: SessionContext,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
            session,
        })
    }

    /// Base URL requests resolve against.
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Session context consulted before each request.
    pub const fn session(&self) -> &SessionContext {
        &self.session
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|error| GatewayError::setup(format!("invalid request path {path:?}: {error}")))
    }

    fn build(&self, request: &ApiRequest) -> Result<RequestBuilder, GatewayError> {
        let url = self.endpoint(request.path())?;
        let mut builder = self.client.request(to_reqwest_method(request.method()), url);
        let token = self.session.token().map(Zeroizing::new);

        for (name, value) in request.config().headers() {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|error| GatewayError::setup(format!("invalid header name {name:?}: {error}")))?;
            if token.is_some() && header_name == AUTHORIZATION {
                debug!("session token replaces configured authorization header");
                continue;
            }
            let header_value = HeaderValue::from_str(value)
                .map_err(|error| GatewayError::setup(format!("invalid value for header {name}: {error}")))?;
            builder = builder.header(header_name, header_value);
        }
        if let Some(bearer) = token {
            builder = builder.bearer_auth(bearer.as_str());
        }

        Ok(match request.payload() {
            Some(payload) if request.method().sends_payload_as_query() => {
                builder.query(&query_pairs(payload)?)
            }
            Some(payload) => builder.json(payload),
            None => builder,
        })
    }

    fn expire_session(&self) {
        if let Err(error) = self.session.sign_out() {
            warn!(%error, "failed to clear session after 401");
        }
    }
}

#[async_trait]
impl ApiGateway for HttpGateway {
    async fn send(&self, request: ApiRequest) -> Result<Value, GatewayError> {
        let method = request.method();
        let path = request.path();
        let builder = self.build(&request).inspect_err(|error| {
            warn!(%method, path, %error, "could not build portal request");
        })?;

        debug!(%method, path, "dispatching portal request");
        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!(%method, path, "portal rejected credentials; clearing session");
            self.expire_session();
            return Err(GatewayError::Unauthorized);
        }
        if !status.is_success() {
            let message = match response.bytes().await {
                Ok(body) => server_message(body.as_ref()),
                Err(error) => {
                    warn!(%method, path, %error, "failed to read portal error body");
                    GENERIC_FAILURE_MESSAGE.to_owned()
                }
            };
            warn!(%method, path, status = status.as_u16(), "portal request failed");
            return Err(GatewayError::server(status.as_u16(), message));
        }

        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(%method, path, status = status.as_u16(), bytes = body.len(), "portal request succeeded");
        Ok(parse_success(body.as_ref()))
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

const fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn parse_success(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

fn map_transport_error(error: reqwest::Error) -> GatewayError {
    let mapped = if error.is_builder() {
        GatewayError::setup(error.to_string())
    } else if error.is_timeout() {
        GatewayError::network(format!("request timed out: {error}"))
    } else {
        GatewayError::network(error.to_string())
    };
    warn!(error = %mapped, "portal transport failure");
    mapped
}
