//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Ports describe how the domain expects to talk to driven adapters (the
//! HTTP transport and session storage). Each exposes typed errors so
//! adapters map their failures into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod api_gateway;
mod session_store;

#[cfg(test)]
pub use api_gateway::MockApiGateway;
pub use api_gateway::{ApiGateway, dispatch, request_as, request_listing};
#[cfg(test)]
pub use session_store::MockSessionStore;
pub use session_store::{InMemorySessionStore, SessionStore, SessionStoreError};
