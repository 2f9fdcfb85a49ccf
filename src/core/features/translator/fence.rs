use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out increasing request ids and remembers the newest one.
///
/// A response may only be applied while its id is still the latest
/// issued; anything older lost the race and is dropped.
#[derive(Debug, Default)]
pub struct RequestFence {
    latest: AtomicU64,
}

impl RequestFence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, invalidating every earlier one.
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::Acquire) == ticket
    }

    /// Invalidate everything in flight without starting a new request.
    pub fn invalidate(&self) {
        self.issue();
    }

    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tickets_increase() {
        let fence = RequestFence::new();
        let a = fence.issue();
        let b = fence.issue();
        assert!(b > a);
        assert_eq!(fence.latest(), b);
    }

    #[test]
    fn test_only_latest_is_current() {
        let fence = RequestFence::new();
        let first = fence.issue();
        assert!(fence.is_current(first));
        let second = fence.issue();
        assert!(!fence.is_current(first));
        assert!(fence.is_current(second));
    }

    #[test]
    fn test_invalidate_drops_pending() {
        let fence = RequestFence::new();
        let ticket = fence.issue();
        fence.invalidate();
        assert!(!fence.is_current(ticket));
    }
}
