//! One side of the order book.
//!
//! A [`BookSide`] keeps a price-ordered map of aggregated [`PriceLevel`]s
//! plus an order-id index locating each resting order. The index is a pure
//! `(price, size)` locator; the level map is the authoritative store.
//!
//! Performance targets on the per-event path:
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | `add` | O(log L) |
//! | `cancel` / `trade` | O(log L), O(1) order lookup |
//! | `top_levels` | O(N) over the first N levels |
//!
//! where L is the number of active price levels (typically ≤ hundreds).
//!
//! A side never fails: unknown order ids and oversized reductions are
//! absorbed per the venue's cleanup-event semantics.

use std::collections::BTreeMap;

use ahash::AHashMap;

use super::level::PriceLevel;
use crate::types::{BookLevel, Side, DEPTH};

/// Locator for one resting order: the price level it rests at and its
/// current resting size. Kept strictly consistent with the level map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OrderRef {
    price: i64,
    size: u32,
}

/// A single side (bid or ask) of the book.
#[derive(Debug, Clone)]
pub struct BookSide {
    /// Which half of the book this is; controls projection order.
    side: Side,
    /// Aggregated price levels. BTreeMap iterates ascending; the bid
    /// projection walks it in reverse for best-first order.
    levels: BTreeMap<i64, PriceLevel>,
    /// order_id → (price, size) locator for O(1) cancel/trade targeting.
    orders: AHashMap<u64, OrderRef>,
}

impl BookSide {
    /// Create an empty side.
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            orders: AHashMap::new(),
        }
    }

    /// Which side this is.
    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Add a new resting order.
    ///
    /// Zero-size adds and duplicate order ids are silent no-ops; the venue
    /// does not reuse a live id, so a duplicate means upstream cleanup noise
    /// rather than a resize.
    pub fn add(&mut self, order_id: u64, price: i64, size: u32) {
        if size == 0 {
            return;
        }
        if self.orders.contains_key(&order_id) {
            log::debug!("duplicate add for live order {order_id}, ignoring");
            return;
        }

        self.levels.entry(price).or_default().insert(order_id, size);
        self.orders.insert(order_id, OrderRef { price, size });
    }

    /// Reduce a resting order by `size` on behalf of a cancel, removing it
    /// when the reduction consumes it fully.
    ///
    /// Targeting uses the order index rather than any event-carried price,
    /// to tolerate venues that echo a stale price on cancel. Unknown order
    /// ids are silent no-ops; oversized cancels clamp to the resting size.
    pub fn cancel(&mut self, order_id: u64, size: u32) {
        self.reduce(order_id, size);
    }

    /// Reduce a resting order by `size` on behalf of a completed trade
    /// sequence. Identical decrement semantics to [`BookSide::cancel`]; kept
    /// separate because callers route it to the side opposite the aggressor.
    pub fn trade(&mut self, order_id: u64, size: u32) {
        self.reduce(order_id, size);
    }

    /// Shared decrement path for cancel and trade.
    fn reduce(&mut self, order_id: u64, size: u32) {
        let Some(order) = self.orders.get_mut(&order_id) else {
            return;
        };
        let price = order.price;

        if size >= order.size {
            // Full consumption: drop the order and any drained level.
            self.orders.remove(&order_id);
            if let Some(level) = self.levels.get_mut(&price) {
                level.remove(order_id);
                if level.is_empty() {
                    self.levels.remove(&price);
                }
            }
        } else {
            order.size -= size;
            if let Some(level) = self.levels.get_mut(&price) {
                level.reduce(order_id, size);
            }
        }
    }

    /// Project the top [`DEPTH`] levels in best-to-worst order.
    ///
    /// Bids walk prices descending, asks ascending. Trailing slots are
    /// zero-filled; a projection never contains an empty level.
    pub fn top_levels(&self) -> [BookLevel; DEPTH] {
        let mut out = [BookLevel::empty(); DEPTH];

        if self.side.is_bid() {
            for (slot, (&price, level)) in out.iter_mut().zip(self.levels.iter().rev()) {
                *slot = BookLevel::new(price, level.total_size(), level.order_count());
            }
        } else {
            for (slot, (&price, level)) in out.iter_mut().zip(self.levels.iter()) {
                *slot = BookLevel::new(price, level.total_size(), level.order_count());
            }
        }

        out
    }

    /// Best (top-of-book) price, if any.
    #[inline]
    pub fn best_price(&self) -> Option<i64> {
        if self.side.is_bid() {
            self.levels.keys().next_back().copied()
        } else {
            self.levels.keys().next().copied()
        }
    }

    /// Number of active price levels.
    #[inline]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Number of resting orders.
    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// True if the side holds no orders.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Current resting size of an order, if present.
    #[inline]
    pub fn order_size(&self, order_id: u64) -> Option<u32> {
        self.orders.get(&order_id).map(|o| o.size)
    }

    /// Check whether an order rests on this side.
    #[inline]
    pub fn has_order(&self, order_id: u64) -> bool {
        self.orders.contains_key(&order_id)
    }

    /// Drop all levels and orders.
    pub fn clear(&mut self) {
        self.levels.clear();
        self.orders.clear();
    }

    /// Verify side-wide invariants: every index entry matches the level map,
    /// sizes are positive, and no level is stored empty. Debug builds only.
    #[cfg(debug_assertions)]
    pub fn verify_invariants(&self) {
        for (order_id, order) in &self.orders {
            let level = self
                .levels
                .get(&order.price)
                .expect("order index points at missing level");
            assert_eq!(
                level.order_size(*order_id),
                Some(order.size),
                "order index size disagrees with level for order {order_id}"
            );
            assert!(order.size > 0, "zero-size order {order_id} in index");
        }
        for (price, level) in &self.levels {
            assert!(!level.is_empty(), "empty level stored at {price}");
            assert_eq!(level.compute_actual_total(), level.total_size());
        }
    }
}
