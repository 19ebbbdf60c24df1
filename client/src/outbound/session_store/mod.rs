//! Session storage adapters.

mod atomic_io;
mod file_store;

pub use file_store::{FileSessionStore, SESSION_FILE};
