//! Gateway failure taxonomy and the user-facing notices derived from it.
//!
//! The gateway never presents anything itself. It returns a
//! [`GatewayError`]; the caller chooses whether to redirect (for
//! [`GatewayError::Unauthorized`]), show [`GatewayError::notice`], or offer a
//! retry.

use thiserror::Error;

/// Fallback text used when a failure body carries no usable message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Stable category of a gateway failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The server answered 401; the stored session has been cleared.
    Unauthorized,
    /// The server answered any other non-success status.
    Server,
    /// No response arrived (connect failure, timeout, truncated body).
    NetworkUnreachable,
    /// The request could not be built or sent.
    RequestSetup,
    /// A success body did not match the expected shape.
    Decode,
}

/// Normalised failure returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Authentication failed; the session has been wiped.
    #[error("session expired")]
    Unauthorized,
    /// The server rejected the request with a readable message.
    #[error("server responded with status {status}: {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the failure body.
        message: String,
    },
    /// The server could not be reached or did not answer in time.
    #[error("network unreachable: {message}")]
    NetworkUnreachable {
        /// Transport diagnostic, never shown to residents.
        message: String,
    },
    /// The request could not be constructed.
    #[error("request setup failed: {message}")]
    RequestSetup {
        /// Construction diagnostic, never shown to residents.
        message: String,
    },
    /// A success body could not be decoded into the expected type.
    #[error("response decode failed: {message}")]
    Decode {
        /// Decoder diagnostic.
        message: String,
    },
}

impl GatewayError {
    /// Helper for server rejections.
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Helper for transport failures with no response.
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkUnreachable {
            message: message.into(),
        }
    }

    /// Helper for construction failures.
    pub fn setup(message: impl Into<String>) -> Self {
        Self::RequestSetup {
            message: message.into(),
        }
    }

    /// Helper for decode failures.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Category of this failure.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::Server { .. } => ErrorKind::Server,
            Self::NetworkUnreachable { .. } => ErrorKind::NetworkUnreachable,
            Self::RequestSetup { .. } => ErrorKind::RequestSetup,
            Self::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// Whether the caller should send the resident back to the login screen.
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// User-facing notice for this failure.
    ///
    /// # Examples
    /// ```
    /// use portal_client::domain::GatewayError;
    ///
    /// let notice = GatewayError::server(422, "Email already taken").notice();
    /// assert_eq!(notice.title(), "Error");
    /// assert_eq!(notice.message(), "Email already taken");
    /// ```
    pub fn notice(&self) -> Notice {
        match self {
            Self::Unauthorized => Notice::new(
                "Session Expired",
                "Your session has expired. Please log in again.",
            ),
            Self::Server { message, .. } => Notice::new("Error", message.clone()),
            Self::NetworkUnreachable { .. } => Notice::new(
                "Network Error",
                "Unable to reach the server. Please check your internet connection.",
            ),
            Self::RequestSetup { .. } | Self::Decode { .. } => {
                Notice::new("Error", GENERIC_FAILURE_MESSAGE)
            }
        }
    }
}

/// Title and message a screen shows when something fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    title: String,
    message: String,
}

impl Notice {
    /// Build a notice.
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Dialog title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Dialog body.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for error categorisation and notice text.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(GatewayError::Unauthorized, ErrorKind::Unauthorized)]
    #[case(GatewayError::server(500, "boom"), ErrorKind::Server)]
    #[case(GatewayError::network("timed out"), ErrorKind::NetworkUnreachable)]
    #[case(GatewayError::setup("bad url"), ErrorKind::RequestSetup)]
    #[case(GatewayError::decode("missing field"), ErrorKind::Decode)]
    fn kinds_match_variants(#[case] error: GatewayError, #[case] expected: ErrorKind) {
        assert_eq!(error.kind(), expected);
    }

    #[test]
    fn only_unauthorized_requires_login() {
        assert!(GatewayError::Unauthorized.requires_login());
        assert!(!GatewayError::server(403, "forbidden").requires_login());
    }

    #[test]
    fn transport_diagnostics_stay_out_of_notices() {
        let notice = GatewayError::network("dns error: no such host").notice();
        assert_eq!(notice.title(), "Network Error");
        assert!(!notice.message().contains("dns"));

        let notice = GatewayError::setup("relative URL without a base").notice();
        assert_eq!(notice.message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn unauthorized_notice_mentions_expiry() {
        let notice = GatewayError::Unauthorized.notice();
        assert_eq!(notice.title(), "Session Expired");
    }

    #[test]
    fn server_display_includes_status() {
        let error = GatewayError::server(404, "Request not found");
        assert_eq!(
            error.to_string(),
            "server responded with status 404: Request not found"
        );
    }
}
