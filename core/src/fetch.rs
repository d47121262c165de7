/// Latest-fetch-wins guard for one kind of data.
///
/// The view only applies a fetch's result if it belongs to the most
/// recently issued request for that data kind; a stale in-flight response
/// arriving after a newer request was issued is discarded. Each data kind
/// (items, categories, stats, ...) owns its own sequence.
#[derive(Debug, Clone, Default)]
pub struct RequestSequence {
    issued: u64,
    applied: u64,
}

/// Proof of a specific issued request, handed back on completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

impl RequestSequence {
    pub fn new() -> Self {
        RequestSequence::default()
    }

    /// Issue a new request. Any ticket from an earlier `begin` becomes
    /// stale immediately.
    pub fn begin(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    /// Whether the result behind `ticket` may be applied. Accepts only the
    /// most recently issued ticket, and only once.
    pub fn admit(&mut self, ticket: FetchTicket) -> bool {
        if ticket.0 == self.issued && ticket.0 > self.applied {
            self.applied = ticket.0;
            true
        } else {
            false
        }
    }

    /// Void every outstanding ticket, e.g. when navigating away from the
    /// view that issued them.
    pub fn invalidate(&mut self) {
        self.issued += 1;
        self.applied = self.issued;
    }
}
