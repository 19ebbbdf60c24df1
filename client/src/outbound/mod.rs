//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: reqwest implementation of the `ApiGateway` port.
//! - **session_store**: cap-std file implementation of the `SessionStore`
//!   port.
//!
//! Adapters are thin translators between domain types and transport or
//! storage representations. They contain no business logic.

pub mod http;
pub mod session_store;

pub use self::http::{DEFAULT_REQUEST_TIMEOUT, HttpGateway};
pub use self::session_store::{FileSessionStore, SESSION_FILE};
