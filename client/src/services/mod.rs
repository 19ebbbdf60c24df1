//! Portal services: typed calls over the gateway port.
//!
//! Each service validates its form (where one is involved) before touching
//! the network, then issues one request through [`ApiGateway`] and decodes
//! the answer. Services hold no state of their own beyond shared handles.

pub mod assets;
pub mod auth;
pub mod budget;
pub mod complaints;
pub mod documents;
pub mod hotlines;
pub mod household;
pub mod notifications;
pub mod profile;
pub mod search;

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use thiserror::Error;

use crate::domain::ports::{ApiGateway, SessionStoreError};
use crate::domain::{GatewayError, Notice, SessionContext, ValidationErrors};

pub use self::assets::AssetService;
pub use self::auth::AuthService;
pub use self::budget::BudgetService;
pub use self::complaints::ComplaintService;
pub use self::documents::DocumentService;
pub use self::hotlines::HotlineService;
pub use self::household::HouseholdService;
pub use self::notifications::NotificationService;
pub use self::profile::ProfileService;
pub use self::search::{AssetSearch, DEFAULT_SEARCH_DEBOUNCE, Debouncer};

/// Failure of a service call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The form was rejected locally; nothing was sent.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
    /// The gateway reported a failure.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    /// The session could not be stored or cleared.
    #[error(transparent)]
    Session(#[from] SessionStoreError),
}

impl ServiceError {
    /// User-facing notice for this failure.
    pub fn notice(&self) -> Notice {
        match self {
            Self::Invalid(errors) => errors.notice(),
            Self::Gateway(error) => error.notice(),
            Self::Session(_) => Notice::new(
                "Error",
                "Unable to save your session on this device. Please try again.",
            ),
        }
    }

    /// Whether the caller should return to the login screen.
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::Gateway(GatewayError::Unauthorized))
    }
}

/// Convenient service result alias.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Shared handles every service draws from.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use mockable::DefaultClock;
/// use portal_client::domain::SessionContext;
/// use portal_client::domain::ports::InMemorySessionStore;
/// use portal_client::outbound::{DEFAULT_REQUEST_TIMEOUT, HttpGateway};
/// use portal_client::services::Portal;
///
/// let session = SessionContext::new(Arc::new(InMemorySessionStore::default()));
/// let base = "https://portal.example.ph/api".parse().expect("valid url");
/// let gateway = HttpGateway::new(base, DEFAULT_REQUEST_TIMEOUT, session.clone())
///     .expect("client builds");
/// let portal = Portal::new(Arc::new(gateway), session, Arc::new(DefaultClock));
/// assert!(!portal.session().is_signed_in());
/// ```
#[derive(Clone)]
pub struct Portal {
    gateway: Arc<dyn ApiGateway>,
    session: SessionContext,
    clock: Arc<dyn Clock>,
    search_debounce: Duration,
}

impl Portal {
    /// Bundle the gateway, session context and clock.
    pub fn new(
        gateway: Arc<dyn ApiGateway>,
        session: SessionContext,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            gateway,
            session,
            clock,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }

    /// Use `delay` as the quiet period for [`Self::asset_search`].
    #[must_use]
    pub const fn with_search_debounce(mut self, delay: Duration) -> Self {
        self.search_debounce = delay;
        self
    }

    /// Session context shared with the gateway.
    pub const fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Login, signup, activation and password flows.
    pub fn auth(&self) -> AuthService {
        AuthService::new(
            Arc::clone(&self.gateway),
            self.session.clone(),
            Arc::clone(&self.clock),
        )
    }

    /// Resident profile.
    pub fn profile(&self) -> ProfileService {
        ProfileService::new(Arc::clone(&self.gateway), Arc::clone(&self.clock))
    }

    /// Household and members.
    pub fn household(&self) -> HouseholdService {
        HouseholdService::new(Arc::clone(&self.gateway), Arc::clone(&self.clock))
    }

    /// Document requests.
    pub fn documents(&self) -> DocumentService {
        DocumentService::new(Arc::clone(&self.gateway))
    }

    /// Complaints.
    pub fn complaints(&self) -> ComplaintService {
        ComplaintService::new(Arc::clone(&self.gateway), Arc::clone(&self.clock))
    }

    /// Asset inventory and borrowing.
    pub fn assets(&self) -> AssetService {
        AssetService::new(Arc::clone(&self.gateway), Arc::clone(&self.clock))
    }

    /// Debounced asset search that drops answers to superseded queries.
    pub fn asset_search(&self) -> AssetSearch {
        AssetSearch::new(self.assets(), self.search_debounce)
    }

    /// Budget transparency.
    pub fn budget(&self) -> BudgetService {
        BudgetService::new(Arc::clone(&self.gateway))
    }

    /// Notifications.
    pub fn notifications(&self) -> NotificationService {
        NotificationService::new(Arc::clone(&self.gateway))
    }

    /// Emergency hotlines.
    pub fn hotlines(&self) -> HotlineService {
        HotlineService::new(Arc::clone(&self.gateway))
    }
}
