//! Port for the persisted session blob.

use std::sync::Mutex;

use crate::domain::Session;

use super::define_port_error;

define_port_error! {
    /// Errors raised by session store adapters.
    pub enum SessionStoreError {
        /// The backing storage could not be read or written.
        Io {
            /// Diagnostic from the storage layer.
            message: String,
        } => "session storage failed: {message}",
        /// The stored blob is not a valid session.
        Corrupt {
            /// Decoder diagnostic.
            message: String,
        } => "stored session is corrupt: {message}",
    }
}

/// Key-value storage for the single session blob.
///
/// Implementations own exactly one blob; there are no concurrent writers
/// beyond the handles of one process.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// Read the stored session, if any.
    fn load(&self) -> Result<Option<Session>, SessionStoreError>;

    /// Replace the stored session.
    fn save(&self, session: &Session) -> Result<(), SessionStoreError>;

    /// Remove the stored session. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), SessionStoreError>;
}

/// Process-local store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    slot: Mutex<Option<Session>>,
}

impl InMemorySessionStore {
    /// Start with a stored session.
    pub fn with_session(session: Session) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
        }
    }

    fn with_slot<R>(
        &self,
        operation: impl FnOnce(&mut Option<Session>) -> R,
    ) -> Result<R, SessionStoreError> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|_| SessionStoreError::io("in-memory session lock poisoned"))?;
        Ok(operation(&mut guard))
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionStoreError> {
        self.with_slot(|slot| slot.clone())
    }

    fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        self.with_slot(|slot| *slot = Some(session.clone()))
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        self.with_slot(|slot| *slot = None)
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the in-memory store.

    use super::*;

    #[test]
    fn in_memory_store_round_trips() {
        let store = InMemorySessionStore::default();
        assert_eq!(store.load().expect("load"), None);

        let session = Session::new("1", "a@b.co").with_token("t");
        store.save(&session).expect("save");
        assert_eq!(store.load().expect("load"), Some(session));

        store.clear().expect("clear");
        store.clear().expect("clearing twice succeeds");
        assert_eq!(store.load().expect("load"), None);
    }
}
