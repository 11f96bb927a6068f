//! Core data types for MBO events and MBP snapshots.
//!
//! These types are designed to be:
//! - Memory efficient (fixed-size integer fields throughout)
//! - Compatible with the venue's MBO CSV schema
//! - Cheap to copy on the per-event hot path (the `symbol` string is the
//!   only heap-backed field)
//!
//! Prices are signed 64-bit fixed-point with six implied decimals
//! ([`PRICE_SCALE`]); no floating point is used anywhere in the book.

use serde::{Deserialize, Serialize};

/// Number of price levels carried in an MBP snapshot per side.
pub const DEPTH: usize = 10;

/// Fixed-point price scale: six implied decimal places.
pub const PRICE_SCALE: i64 = 1_000_000;

/// Record type tag for MBO (order-level) records.
pub const RTYPE_MBO: u16 = 160;

/// Record type tag for MBP (price-level) records.
pub const RTYPE_MBP: u16 = 10;

/// MBO action type (what happened to the order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    /// Add a new order to the book
    Add = b'A',
    /// Cancel/remove an order (also terminates a pending trade sequence)
    Cancel = b'C',
    /// Trade execution opener (carries the aggressor side)
    Trade = b'T',
    /// Fill within a trade sequence
    Fill = b'F',
    /// Replace glyph; at sequence 0 this is the venue's initial clear
    Replace = b'R',
}

impl Action {
    /// Parse an action from its single-letter encoding.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'A' => Some(Action::Add),
            b'C' => Some(Action::Cancel),
            b'T' => Some(Action::Trade),
            b'F' => Some(Action::Fill),
            b'R' => Some(Action::Replace),
            _ => None,
        }
    }

    /// Convert to the single-letter encoding.
    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

/// Order side (bid, ask, or non-directional).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    /// Buy order (bid)
    Bid = b'B',
    /// Sell order (ask)
    Ask = b'A',
    /// Non-directional (used by some venue event types)
    Neutral = b'N',
}

impl Side {
    /// Parse a side from its single-letter encoding.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'B' => Some(Side::Bid),
            b'A' => Some(Side::Ask),
            b'N' => Some(Side::Neutral),
            _ => None,
        }
    }

    /// Convert to the single-letter encoding.
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Check if this is a bid.
    #[inline(always)]
    pub fn is_bid(self) -> bool {
        matches!(self, Side::Bid)
    }

    /// Check if this is an ask.
    #[inline(always)]
    pub fn is_ask(self) -> bool {
        matches!(self, Side::Ask)
    }

    /// The opposite book side. Neutral has no opposite and maps to itself.
    #[inline(always)]
    pub fn opposite(self) -> Side {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
            Side::Neutral => Side::Neutral,
        }
    }
}

/// Market By Order (MBO) event.
///
/// One record per order action as published by the venue. All fields except
/// `action`, `side`, `price`, `size`, and `order_id` are opaque to the book
/// engine and forwarded unchanged into the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MboEvent {
    /// Capture-server receive timestamp (ns since epoch)
    pub ts_recv: i64,
    /// Venue event timestamp (ns since epoch)
    pub ts_event: i64,
    /// Record type tag (forwarded; MBO input carries [`RTYPE_MBO`])
    pub rtype: u16,
    pub publisher_id: u16,
    pub instrument_id: u32,
    /// Order action
    pub action: Action,
    /// Order side
    pub side: Side,
    /// Price in fixed-point (×10⁶)
    pub price: i64,
    /// Order quantity
    pub size: u32,
    pub channel_id: u16,
    /// Unique order identifier
    pub order_id: u64,
    pub flags: u32,
    pub ts_in_delta: u32,
    /// Venue sequence number
    pub sequence: u64,
    pub symbol: String,
}

impl MboEvent {
    /// Create an event with the book-relevant fields set and everything else
    /// zeroed. Mostly useful in tests and benchmarks.
    pub fn new(action: Action, side: Side, price: i64, size: u32, order_id: u64) -> Self {
        Self {
            ts_recv: 0,
            ts_event: 0,
            rtype: RTYPE_MBO,
            publisher_id: 0,
            instrument_id: 0,
            action,
            side,
            price,
            size,
            channel_id: 0,
            order_id,
            flags: 0,
            ts_in_delta: 0,
            sequence: 0,
            symbol: String::new(),
        }
    }

    /// Set the venue sequence number.
    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    /// Set the venue event timestamp.
    pub fn with_ts_event(mut self, ts_event: i64) -> Self {
        self.ts_event = ts_event;
        self
    }

    /// Set the instrument id.
    pub fn with_instrument(mut self, instrument_id: u32) -> Self {
        self.instrument_id = instrument_id;
        self
    }
}

/// One aggregated price level slot in an MBP snapshot.
///
/// Unused trailing slots are all-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLevel {
    /// Price in fixed-point (×10⁶)
    pub price: i64,
    /// Sum of resting sizes at this price
    pub size: u32,
    /// Number of resting orders at this price
    pub count: u32,
}

impl BookLevel {
    pub const fn new(price: i64, size: u32, count: u32) -> Self {
        Self { price, size, count }
    }

    /// An empty (padding) slot.
    pub const fn empty() -> Self {
        Self {
            price: 0,
            size: 0,
            count: 0,
        }
    }

    /// True if this slot is padding.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// Market By Price (MBP) snapshot record.
///
/// One per input event, reflecting the book state immediately after that
/// event was applied. Carries all event-forwarded fields plus the top
/// [`DEPTH`] levels of each side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MbpRecord {
    pub ts_recv: i64,
    pub ts_event: i64,
    /// Always [`RTYPE_MBP`]
    pub rtype: u16,
    pub publisher_id: u16,
    pub instrument_id: u32,
    /// Action of the event that produced this snapshot
    pub action: Action,
    /// Side of the event that produced this snapshot
    pub side: Side,
    pub depth: u8,
    pub price: i64,
    pub size: u32,
    pub flags: u32,
    pub ts_in_delta: u32,
    pub sequence: u64,
    /// Top bid levels, best (highest) first
    pub bid_levels: [BookLevel; DEPTH],
    /// Top ask levels, best (lowest) first
    pub ask_levels: [BookLevel; DEPTH],
    pub symbol: String,
    pub order_id: u64,
}

impl MbpRecord {
    /// Best bid slot, if the bid side is non-empty.
    #[inline]
    pub fn best_bid(&self) -> Option<&BookLevel> {
        let slot = &self.bid_levels[0];
        (!slot.is_empty()).then_some(slot)
    }

    /// Best ask slot, if the ask side is non-empty.
    #[inline]
    pub fn best_ask(&self) -> Option<&BookLevel> {
        let slot = &self.ask_levels[0];
        (!slot.is_empty()).then_some(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_from_byte() {
        assert_eq!(Action::from_byte(b'A'), Some(Action::Add));
        assert_eq!(Action::from_byte(b'C'), Some(Action::Cancel));
        assert_eq!(Action::from_byte(b'T'), Some(Action::Trade));
        assert_eq!(Action::from_byte(b'F'), Some(Action::Fill));
        assert_eq!(Action::from_byte(b'R'), Some(Action::Replace));
        assert_eq!(Action::from_byte(b'X'), None);
    }

    #[test]
    fn test_action_byte_round_trip() {
        for action in [
            Action::Add,
            Action::Cancel,
            Action::Trade,
            Action::Fill,
            Action::Replace,
        ] {
            assert_eq!(Action::from_byte(action.to_byte()), Some(action));
        }
    }

    #[test]
    fn test_side_from_byte() {
        assert_eq!(Side::from_byte(b'B'), Some(Side::Bid));
        assert_eq!(Side::from_byte(b'A'), Some(Side::Ask));
        assert_eq!(Side::from_byte(b'N'), Some(Side::Neutral));
        assert_eq!(Side::from_byte(b'?'), None);
    }

    #[test]
    fn test_side_checks() {
        assert!(Side::Bid.is_bid());
        assert!(!Side::Ask.is_bid());
        assert!(Side::Ask.is_ask());
        assert!(!Side::Neutral.is_bid());
        assert!(!Side::Neutral.is_ask());
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Bid.opposite(), Side::Ask);
        assert_eq!(Side::Ask.opposite(), Side::Bid);
        assert_eq!(Side::Neutral.opposite(), Side::Neutral);
    }

    #[test]
    fn test_event_builder() {
        let event = MboEvent::new(Action::Add, Side::Bid, 1_000_000, 100, 42)
            .with_sequence(7)
            .with_ts_event(1_234)
            .with_instrument(99);

        assert_eq!(event.action, Action::Add);
        assert_eq!(event.price, 1_000_000);
        assert_eq!(event.sequence, 7);
        assert_eq!(event.ts_event, 1_234);
        assert_eq!(event.instrument_id, 99);
        assert_eq!(event.rtype, RTYPE_MBO);
    }

    #[test]
    fn test_book_level_empty() {
        let slot = BookLevel::empty();
        assert!(slot.is_empty());
        assert_eq!(slot, BookLevel::default());

        let filled = BookLevel::new(1_000_000, 100, 1);
        assert!(!filled.is_empty());
    }
}
