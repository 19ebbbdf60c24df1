//! File-backed session store.

use std::io;
use std::sync::Mutex;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::debug;

use super::atomic_io::write_atomic;
use crate::domain::Session;
use crate::domain::ports::{SessionStore, SessionStoreError};

/// Fixed storage key of the session blob.
pub const SESSION_FILE: &str = "session.json";

/// Session store holding one JSON blob in a capability-scoped directory.
///
/// A process-wide mutex serialises writers sharing one handle; separate
/// processes are not coordinated.
pub struct FileSessionStore {
    dir: Dir,
    guard: Mutex<()>,
}

impl FileSessionStore {
    /// Open (creating if needed) the session directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError::Io`] when the directory cannot be
    /// created or opened.
    pub fn open(path: &Utf8Path) -> Result<Self, SessionStoreError> {
        Dir::create_ambient_dir_all(path, ambient_authority())
            .and_then(|()| Dir::open_ambient_dir(path, ambient_authority()))
            .map(Self::from_dir)
            .map_err(|error| SessionStoreError::io(format!("open {path}: {error}")))
    }

    /// Use an already opened directory.
    pub fn from_dir(dir: Dir) -> Self {
        Self {
            dir,
            guard: Mutex::new(()),
        }
    }

    fn locked<R>(
        &self,
        operation: impl FnOnce(&Dir) -> Result<R, SessionStoreError>,
    ) -> Result<R, SessionStoreError> {
        let _held = self
            .guard
            .lock()
            .map_err(|_| SessionStoreError::io("session file lock poisoned"))?;
        operation(&self.dir)
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionStoreError> {
        self.locked(|dir| match dir.read_to_string(SESSION_FILE) {
            Ok(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|error| SessionStoreError::corrupt(error.to_string())),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(SessionStoreError::io(format!("read {SESSION_FILE}: {error}"))),
        })
    }

    fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        let encoded = serde_json::to_vec(session)
            .map_err(|error| SessionStoreError::io(format!("encode session: {error}")))?;
        self.locked(|dir| {
            write_atomic(dir, SESSION_FILE, &encoded)
                .map_err(|error| SessionStoreError::io(format!("write {SESSION_FILE}: {error}")))
        })?;
        debug!("session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        self.locked(|dir| match dir.remove_file(SESSION_FILE) {
            Ok(()) => {
                debug!("session cleared");
                Ok(())
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(SessionStoreError::io(format!("remove {SESSION_FILE}: {error}"))),
        })
    }
}
