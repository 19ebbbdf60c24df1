//! Client library for the barangay resident services portal.
//!
//! The [`domain`] module holds request descriptors, the gateway error
//! taxonomy, session state and client-side form validation. [`services`]
//! wraps each portal feature area over the gateway port, and [`outbound`]
//! provides the reqwest transport and file-backed session storage.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod services;
