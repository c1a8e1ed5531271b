//! Latest-request-wins bookkeeping for list views.
//!
//! Each outgoing list request is tagged with a [`Ticket`]. When responses
//! arrive out of order, only a response whose ticket is newer than every
//! response already applied may update visible state.
//!
//! The server side only echoes the `seq` parameter back (see
//! `dto::list::ListParams::ticket`). [`Sequencer`] is the client-side half:
//! a caller issuing list requests keeps one and drops every response it
//! does not [`accept`](Sequencer::accept).

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Sequence number of one request. Higher is newer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ticket(u64);

impl Ticket {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct Sequencer {
    issued: AtomicU64,
    applied: AtomicU64,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags a new request. Tickets start at 1.
    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Records a completed response. Returns `false` if a newer response
    /// was already applied, in which case the caller must drop this one.
    pub fn accept(&self, ticket: Ticket) -> bool {
        self.applied.fetch_max(ticket.0, Ordering::SeqCst) < ticket.0
    }

    /// Whether `ticket` is still the most recent request issued. Work for a
    /// superseded ticket can be abandoned early.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    /// Most recent ticket whose response was applied, if any.
    pub fn last_applied(&self) -> Option<Ticket> {
        match self.applied.load(Ordering::SeqCst) {
            0 => None,
            value => Some(Ticket(value)),
        }
    }
}
