//! Client configuration loaded via OrthoConfig.

use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://localhost:5000/api/";
const DEFAULT_SESSION_DIR: &str = ".portal";

/// Connection and storage settings for the portal client.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PORTAL")]
pub struct ClientSettings {
    /// Backend base URL; request paths resolve beneath it.
    pub base_url: Option<String>,
    /// Transport timeout per request, in seconds.
    #[ortho_config(default = 10)]
    pub request_timeout_secs: u64,
    /// Directory holding the persisted session blob.
    pub session_dir: Option<Utf8PathBuf>,
    /// Search debounce interval, in milliseconds.
    #[ortho_config(default = 500)]
    pub search_debounce_ms: u64,
}

impl ClientSettings {
    /// Return the configured base URL, falling back to the local backend.
    ///
    /// # Errors
    ///
    /// Returns the parse failure when the configured value is not a URL.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))
    }

    /// Return the configured request timeout.
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Return the configured session directory, falling back to `.portal`.
    pub fn session_dir(&self) -> Utf8PathBuf {
        self.session_dir
            .clone()
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_SESSION_DIR))
    }

    /// Return the configured search debounce interval.
    pub const fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}
