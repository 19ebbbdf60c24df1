//! Persisted resident session and the context object that guards it.
//!
//! The session blob is `{ _id, email, token?, ...profile fields }`. Profile
//! fields the client does not model are kept verbatim so a save after load
//! never drops data the backend sent.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;
use zeroize::Zeroizing;

use super::ports::{SessionStore, SessionStoreError};

/// Logged-in resident as persisted between launches.
///
/// ## Invariants
/// - `id` and `email` are whatever the backend issued; the client does not
///   revalidate them.
/// - `token`, when present, is attached as a bearer credential to every
///   request and is zeroised on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "_id")]
    id: String,
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<SessionToken>,
    #[serde(flatten)]
    profile: Map<String, Value>,
}

impl Session {
    /// Build a session from its identifying fields.
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            token: None,
            profile: Map::new(),
        }
    }

    /// Attach a bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SessionToken::new(token));
        self
    }

    /// Attach an extra profile field.
    #[must_use]
    pub fn with_profile_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.profile.insert(key.into(), value);
        self
    }

    /// Backend identifier of the resident.
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Login email.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Bearer token, if the backend issued one.
    pub fn token(&self) -> Option<&str> {
        self.token.as_ref().map(SessionToken::expose)
    }

    /// Additional profile fields sent by the backend.
    pub const fn profile(&self) -> &Map<String, Value> {
        &self.profile
    }

    /// Look up one profile field.
    pub fn profile_field(&self, key: &str) -> Option<&Value> {
        self.profile.get(key)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("profile_fields", &self.profile.len())
            .finish()
    }
}

/// Bearer token wrapper that wipes memory on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
struct SessionToken(Zeroizing<String>);

impl SessionToken {
    fn new(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    fn expose(&self) -> &str {
        self.0.as_str()
    }
}

/// Shared handle over the session store with controlled read/write/clear.
///
/// Cloning is cheap; all clones observe the same store.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    /// Wrap a store.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Current session, propagating storage failures.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError`] when the store cannot be read.
    pub fn load(&self) -> Result<Option<Session>, SessionStoreError> {
        self.store.load()
    }

    /// Current session, treating unreadable storage as signed out.
    pub fn current(&self) -> Option<Session> {
        match self.store.load() {
            Ok(session) => session,
            Err(error) => {
                warn!(%error, "session store unreadable; treating as signed out");
                None
            }
        }
    }

    /// Bearer token of the current session, if any.
    pub fn token(&self) -> Option<String> {
        self.current()
            .and_then(|session| session.token().map(str::to_owned))
    }

    /// Whether a session is stored.
    pub fn is_signed_in(&self) -> bool {
        self.current().is_some()
    }

    /// Persist a freshly issued session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError`] when the store cannot be written.
    pub fn sign_in(&self, session: &Session) -> Result<(), SessionStoreError> {
        self.store.save(session)
    }

    /// Destroy the stored session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError`] when the store cannot be cleared.
    pub fn sign_out(&self) -> Result<(), SessionStoreError> {
        self.store.clear()
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext").finish_non_exhaustive()
    }
}
