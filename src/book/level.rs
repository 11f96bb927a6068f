//! Price level with cached aggregate size.
//!
//! A [`PriceLevel`] holds the individual resting orders at one price and a
//! cached total, so the snapshot projection reads aggregates in O(1) instead
//! of re-summing the order map on every event.
//!
//! # Invariant
//!
//! `total_size` MUST always equal `orders.values().sum()` and the level must
//! never be left empty inside a side's level map (the side removes drained
//! levels eagerly). The invariant is enforced through the mutation methods
//! and verified in debug builds via `verify_invariant()`.

use ahash::AHashMap;

/// A single price level: `order_id → resting size` plus cached aggregate.
#[derive(Debug, Clone, Default)]
pub struct PriceLevel {
    /// Individual orders at this price: order_id → size
    orders: AHashMap<u64, u32>,
    /// Cached total size (invariant: == orders.values().sum())
    total_size: u32,
}

impl PriceLevel {
    /// Create a new empty price level.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new order at this level.
    ///
    /// Returns false (and changes nothing) if the order id is already
    /// present; resting orders never change size in place on this venue.
    #[inline]
    pub fn insert(&mut self, order_id: u64, size: u32) -> bool {
        if self.orders.contains_key(&order_id) {
            return false;
        }
        self.orders.insert(order_id, size);
        self.total_size = self.total_size.saturating_add(size);

        #[cfg(debug_assertions)]
        self.verify_invariant();

        true
    }

    /// Remove an order entirely, returning its resting size.
    #[inline]
    pub fn remove(&mut self, order_id: u64) -> Option<u32> {
        let size = self.orders.remove(&order_id)?;
        self.total_size = self.total_size.saturating_sub(size);

        #[cfg(debug_assertions)]
        self.verify_invariant();

        Some(size)
    }

    /// Reduce an order's resting size by `delta`, clamped to the resting
    /// size. Returns the new resting size, or None if the order is unknown.
    ///
    /// A reduction to zero leaves a zero-size entry; callers that want the
    /// order gone at zero should use [`PriceLevel::remove`] instead (the
    /// book side routes full consumptions there).
    #[inline]
    pub fn reduce(&mut self, order_id: u64, delta: u32) -> Option<u32> {
        let size = self.orders.get_mut(&order_id)?;
        let applied = delta.min(*size);
        *size -= applied;
        self.total_size = self.total_size.saturating_sub(applied);
        let remaining = *size;

        #[cfg(debug_assertions)]
        self.verify_invariant();

        Some(remaining)
    }

    /// Cached total resting size (O(1)).
    #[inline]
    pub fn total_size(&self) -> u32 {
        self.total_size
    }

    /// Number of resting orders at this level.
    #[inline]
    pub fn order_count(&self) -> u32 {
        self.orders.len() as u32
    }

    /// True if no orders rest at this level.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Resting size of one order.
    #[inline]
    pub fn order_size(&self, order_id: u64) -> Option<u32> {
        self.orders.get(&order_id).copied()
    }

    /// Check whether an order rests at this level.
    #[inline]
    pub fn contains(&self, order_id: u64) -> bool {
        self.orders.contains_key(&order_id)
    }

    /// Recompute the total by summation (O(n), diagnostics only).
    pub fn compute_actual_total(&self) -> u32 {
        self.orders
            .values()
            .fold(0u32, |acc, &v| acc.saturating_add(v))
    }

    /// Verify the size invariant holds.
    #[cfg(debug_assertions)]
    #[inline]
    pub fn verify_invariant(&self) {
        debug_assert_eq!(
            self.compute_actual_total(),
            self.total_size,
            "price level invariant violated: actual={}, cached={}",
            self.compute_actual_total(),
            self.total_size
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_level_is_empty() {
        let level = PriceLevel::new();
        assert!(level.is_empty());
        assert_eq!(level.total_size(), 0);
        assert_eq!(level.order_count(), 0);
    }

    #[test]
    fn test_insert_accumulates() {
        let mut level = PriceLevel::new();
        assert!(level.insert(1, 100));
        assert!(level.insert(2, 200));
        assert!(level.insert(3, 150));
        assert_eq!(level.total_size(), 450);
        assert_eq!(level.order_count(), 3);
    }

    #[test]
    fn test_duplicate_insert_is_noop() {
        let mut level = PriceLevel::new();
        assert!(level.insert(1, 100));
        assert!(!level.insert(1, 500));
        assert_eq!(level.total_size(), 100);
        assert_eq!(level.order_size(1), Some(100));
    }

    #[test]
    fn test_remove_existing() {
        let mut level = PriceLevel::new();
        level.insert(1, 100);
        level.insert(2, 200);
        assert_eq!(level.remove(1), Some(100));
        assert_eq!(level.total_size(), 200);
        assert_eq!(level.order_count(), 1);
    }

    #[test]
    fn test_remove_unknown() {
        let mut level = PriceLevel::new();
        level.insert(1, 100);
        assert_eq!(level.remove(999), None);
        assert_eq!(level.total_size(), 100);
    }

    #[test]
    fn test_reduce_partial() {
        let mut level = PriceLevel::new();
        level.insert(1, 100);
        assert_eq!(level.reduce(1, 30), Some(70));
        assert_eq!(level.total_size(), 70);
        assert_eq!(level.order_count(), 1);
    }

    #[test]
    fn test_reduce_clamps_to_resting_size() {
        let mut level = PriceLevel::new();
        level.insert(1, 100);
        assert_eq!(level.reduce(1, 150), Some(0));
        assert_eq!(level.total_size(), 0);
    }

    #[test]
    fn test_reduce_unknown() {
        let mut level = PriceLevel::new();
        level.insert(1, 100);
        assert_eq!(level.reduce(999, 50), None);
        assert_eq!(level.total_size(), 100);
    }

    #[test]
    fn test_invariant_after_mixed_operations() {
        let mut level = PriceLevel::new();
        level.insert(1, 100);
        level.insert(2, 200);
        level.insert(3, 150);
        level.reduce(1, 30);
        level.remove(2);
        level.insert(4, 75);
        assert_eq!(level.compute_actual_total(), level.total_size());
    }

    #[test]
    fn test_saturating_total() {
        let mut level = PriceLevel::new();
        level.insert(1, u32::MAX);
        level.insert(2, 1);
        assert_eq!(level.total_size(), u32::MAX);
    }
}
