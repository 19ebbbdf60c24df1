//! Domain types and ports.
//!
//! Purpose: describe requests, sessions, records and form rules without
//! reference to a transport or storage technology. Adapters in
//! `outbound` implement the ports declared here; `services` compose them.
//!
//! Public surface:
//! - `ApiRequest`, `Method`, `RequestConfig`: what to send.
//! - `GatewayError`, `ErrorKind`, `Notice`: how a call failed and what to
//!   tell the resident.
//! - `Session`, `SessionContext`: the persisted login.
//! - `validation`, `forms`, `form_state`: client-side checks and submit
//!   state.
//! - `paging`, `sequencer`: list and search bookkeeping.
//! - `Pesos`: fees and budget figures in whole centavos.

pub mod error;
pub mod form_state;
pub mod forms;
pub mod money;
pub mod paging;
pub mod ports;
pub mod records;
pub mod request;
pub mod sequencer;
pub mod session;
pub mod validation;

pub use self::error::{ErrorKind, GENERIC_FAILURE_MESSAGE, GatewayError, Notice};
pub use self::form_state::{FormPhase, FormState, SubmitRejected};
pub use self::money::Pesos;
pub use self::paging::{ListPhase, Listing, Page, PagedList};
pub use self::request::{ApiRequest, Method, RequestConfig};
pub use self::sequencer::{RequestSequencer, Ticket};
pub use self::session::{Session, SessionContext};
pub use self::validation::{Field, FieldError, ValidationErrors, Validator};
