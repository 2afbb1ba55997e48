use std::collections::HashMap;

/// Identifies one arrow on the board: its row and its position in the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArrowKey {
    pub subject: usize,
    pub arrow: usize,
}

impl ArrowKey {
    pub fn new(subject: usize, arrow: usize) -> Self {
        Self { subject, arrow }
    }
}

/// Receipt for a submitted fit; only the newest ticket per arrow is honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitTicket {
    pub key: ArrowKey,
    generation: u64,
    epoch: u64,
}

/// Serializes fits per arrow: last submitted geometry wins.
///
/// Fits for different arrows are independent. A result computed for a ticket
/// that has since been superseded (a newer submit for the same arrow, or a
/// board-wide invalidation) is rejected by [`accept`](Self::accept) and must
/// be discarded by the caller.
#[derive(Debug, Default)]
pub struct RefitTracker {
    next_generation: u64,
    epoch: u64,
    latest: HashMap<ArrowKey, u64>,
}

impl RefitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, key: ArrowKey) -> FitTicket {
        self.next_generation += 1;
        self.latest.insert(key, self.next_generation);
        FitTicket {
            key,
            generation: self.next_generation,
            epoch: self.epoch,
        }
    }

    /// Whether `ticket` is still the newest for its arrow.
    pub fn is_current(&self, ticket: &FitTicket) -> bool {
        ticket.epoch == self.epoch && self.latest.get(&ticket.key) == Some(&ticket.generation)
    }

    /// Claim the result slot for `ticket`. Returns `false` for stale tickets;
    /// a ticket can be accepted once.
    pub fn accept(&mut self, ticket: &FitTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.latest.remove(&ticket.key);
        true
    }

    /// Drop outstanding fits for one row.
    pub fn forget_subject(&mut self, subject: usize) {
        self.latest.retain(|key, _| key.subject != subject);
    }

    /// Make every outstanding ticket stale, e.g. after rows were reordered.
    pub fn invalidate_all(&mut self) {
        self.epoch += 1;
        self.latest.clear();
    }

    /// Number of fits submitted but not yet accepted.
    pub fn pending(&self) -> usize {
        self.latest.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_submit_supersedes_older() {
        let mut tracker = RefitTracker::new();
        let key = ArrowKey::new(0, 1);
        let first = tracker.submit(key);
        let second = tracker.submit(key);
        assert!(!tracker.accept(&first));
        assert!(tracker.accept(&second));
        assert!(!tracker.accept(&second));
        assert_eq!(tracker.pending(), 0);
    }

    #[test]
    fn arrows_are_independent() {
        let mut tracker = RefitTracker::new();
        let a = tracker.submit(ArrowKey::new(0, 0));
        let b = tracker.submit(ArrowKey::new(0, 1));
        assert!(tracker.accept(&b));
        assert!(tracker.accept(&a));
    }

    #[test]
    fn invalidate_all_rejects_everything() {
        let mut tracker = RefitTracker::new();
        let a = tracker.submit(ArrowKey::new(2, 0));
        tracker.invalidate_all();
        assert!(!tracker.is_current(&a));
        assert!(!tracker.accept(&a));
        let b = tracker.submit(ArrowKey::new(2, 0));
        assert!(tracker.accept(&b));
    }

    #[test]
    fn forget_subject_drops_its_tickets() {
        let mut tracker = RefitTracker::new();
        let gone = tracker.submit(ArrowKey::new(1, 0));
        let kept = tracker.submit(ArrowKey::new(2, 0));
        tracker.forget_subject(1);
        assert!(!tracker.accept(&gone));
        assert!(tracker.accept(&kept));
    }
}
