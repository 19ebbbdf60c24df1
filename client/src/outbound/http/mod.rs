//! HTTP outbound adapter.
//!
//! This module provides the reqwest implementation of the `ApiGateway`
//! port.

mod error_body;
mod gateway;
mod query;

pub use gateway::{DEFAULT_REQUEST_TIMEOUT, HttpGateway};
