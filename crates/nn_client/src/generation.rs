use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic request counter. Each request takes a [`Ticket`]; a response is
/// committed only if its ticket is still the latest one issued.
#[derive(Debug, Default)]
pub struct Generation {
    current: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, invalidating every earlier one.
    pub fn next(&self) -> Ticket {
        Ticket(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.current.load(Ordering::SeqCst) == ticket.0
    }
}
