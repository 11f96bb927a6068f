//! Pending trade sequence tracking.
//!
//! The venue reports an execution as a Trade on the aggressor side,
//! optionally followed by Fill events, terminated by a Cancel on the same
//! order id. Nothing touches the book until the terminator; this table
//! holds the open sequences in the meantime, preserving each Trade's
//! original side tag so the engine can apply the removal to the opposite
//! (resting) side at termination.
//!
//! Each sequence is a two-state machine per order id: opened by Trade,
//! destroyed by `take` on the terminating Cancel. Fills confirm portions of
//! the announced quantity; `remaining_size` counts down what they have not
//! yet confirmed.

use ahash::AHashMap;

use crate::types::Side;

/// State of one open Trade→Fill→Cancel sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingEntry {
    /// Side as carried on the Trade event (the aggressor side).
    pub side: Side,
    /// Price carried on the Trade event.
    pub price: i64,
    /// Quantity announced by the opening Trade. This is what leaves the
    /// book at termination; interleaved fills sum to it on conformant feeds.
    pub size: u32,
    /// Portion of the announced quantity not yet confirmed by fills.
    pub remaining_size: u32,
    /// Venue timestamp of the opening Trade.
    pub ts_event: i64,
}

/// Short-lived table of open trade sequences, keyed by order id.
#[derive(Debug, Clone, Default)]
pub struct PendingTrades {
    entries: AHashMap<u64, PendingEntry>,
}

impl PendingTrades {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a sequence for `order_id`. An existing entry for the same id is
    /// overwritten; the previous sequence is considered abandoned.
    pub fn open(&mut self, order_id: u64, side: Side, price: i64, size: u32, ts_event: i64) {
        let previous = self.entries.insert(
            order_id,
            PendingEntry {
                side,
                price,
                size,
                remaining_size: size,
                ts_event,
            },
        );
        if previous.is_some() {
            log::debug!("trade sequence for order {order_id} reopened, abandoning previous");
        }
    }

    /// Record a fill against an open sequence, clamping `remaining_size`
    /// at zero. No-op if no sequence is open for the id.
    pub fn fill(&mut self, order_id: u64, size: u32) {
        if let Some(entry) = self.entries.get_mut(&order_id) {
            entry.remaining_size = entry.remaining_size.saturating_sub(size);
        }
    }

    /// Remove and return the sequence for `order_id`, if one is open.
    /// Called on the terminating Cancel.
    pub fn take(&mut self, order_id: u64) -> Option<PendingEntry> {
        self.entries.remove(&order_id)
    }

    /// Check whether a sequence is open for the id.
    #[inline]
    pub fn contains(&self, order_id: u64) -> bool {
        self.entries.contains_key(&order_id)
    }

    /// Number of open sequences.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no sequences are open.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all open sequences.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_take() {
        let mut pending = PendingTrades::new();
        pending.open(42, Side::Ask, 1_000_000, 40, 1_000);

        assert!(pending.contains(42));
        let entry = pending.take(42).expect("entry should exist");
        assert_eq!(entry.side, Side::Ask);
        assert_eq!(entry.price, 1_000_000);
        assert_eq!(entry.size, 40);
        assert_eq!(entry.remaining_size, 40);
        assert_eq!(entry.ts_event, 1_000);
        assert!(pending.is_empty());
    }

    #[test]
    fn test_take_absent() {
        let mut pending = PendingTrades::new();
        assert_eq!(pending.take(42), None);
    }

    #[test]
    fn test_fill_decrements_remaining_only() {
        let mut pending = PendingTrades::new();
        pending.open(42, Side::Ask, 1_000_000, 100, 0);
        pending.fill(42, 30);
        pending.fill(42, 20);

        let entry = pending.take(42).unwrap();
        assert_eq!(entry.size, 100);
        assert_eq!(entry.remaining_size, 50);
    }

    #[test]
    fn test_fill_clamps_at_zero() {
        let mut pending = PendingTrades::new();
        pending.open(42, Side::Ask, 1_000_000, 40, 0);
        pending.fill(42, 100);

        assert_eq!(pending.take(42).unwrap().remaining_size, 0);
    }

    #[test]
    fn test_fill_unknown_is_noop() {
        let mut pending = PendingTrades::new();
        pending.fill(42, 100);
        assert!(pending.is_empty());
    }

    #[test]
    fn test_reopen_overwrites() {
        let mut pending = PendingTrades::new();
        pending.open(42, Side::Ask, 1_000_000, 40, 1_000);
        pending.fill(42, 10);
        pending.open(42, Side::Bid, 2_000_000, 70, 2_000);

        assert_eq!(pending.len(), 1);
        let entry = pending.take(42).unwrap();
        assert_eq!(entry.side, Side::Bid);
        assert_eq!(entry.price, 2_000_000);
        assert_eq!(entry.size, 70);
        assert_eq!(entry.remaining_size, 70);
    }
}
