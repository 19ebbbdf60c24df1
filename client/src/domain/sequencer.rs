//! Request generation tracking for searches.
//!
//! Each dispatched query takes a ticket. A response is applied only while
//! its ticket is still the latest, so a slow answer to an old query never
//! overwrites the results of a newer one.

use std::sync::atomic::{AtomicU64, Ordering};

/// Generation number handed out per dispatched query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// Raw generation number.
    pub const fn generation(self) -> u64 {
        self.0
    }
}

/// Issues tickets for one query stream.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    /// Stream with no queries issued yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the ticket for a query about to be dispatched. Every earlier
    /// ticket becomes stale.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether `ticket` belongs to the most recent query.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// Pass `response` through when `ticket` is current; drop it otherwise.
    pub fn accept<T>(&self, ticket: Ticket, response: T) -> Option<T> {
        self.is_current(ticket).then_some(response)
    }
}
