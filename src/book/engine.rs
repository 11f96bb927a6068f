//! The MBO → MBP book engine.
//!
//! [`BookEngine`] owns one bid side, one ask side, and the pending-trade
//! table. It accepts MBO events one at a time and emits one depth-10 MBP
//! snapshot per event, reflecting the book state immediately after that
//! event was applied.
//!
//! The engine is total over business input: semantic no-ops (cancel for an
//! unknown order, fill with no open sequence) are absorbed silently and the
//! per-record counters still advance. The only event that produces no
//! snapshot is the venue's initial clear sentinel (action `R` at sequence 0),
//! which is dropped before dispatch.
//!
//! One engine handles one instrument on one thread. There is no internal
//! locking; shard by instrument (see [`EngineShards`](super::EngineShards))
//! instead of sharing an engine across threads.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::pending::PendingTrades;
use super::side::BookSide;
use crate::error::Result;
use crate::types::{Action, MboEvent, MbpRecord, Side, RTYPE_MBP};

/// Configuration for engine behavior.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Whether to log semantic no-ops worth seeing (duplicate adds,
    /// abandoned trade sequences).
    pub log_warnings: bool,

    /// Whether to measure per-event processing time into the stats block.
    pub time_events: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_warnings: true,
            time_events: true,
        }
    }
}

impl EngineConfig {
    /// Enable/disable warning logs.
    pub fn with_logging(mut self, log: bool) -> Self {
        self.log_warnings = log;
        self
    }

    /// Enable/disable per-event timing.
    pub fn with_timing(mut self, time: bool) -> Self {
        self.time_events = time;
        self
    }
}

/// Processing counters, advanced by action kind on every dispatched event.
///
/// Plain data mutated on the single-threaded event path; read by value.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EngineStats {
    /// Every dispatched event (the suppressed initial clear advances nothing)
    pub records_processed: u64,
    /// Trade openers
    pub trades_processed: u64,
    /// Add events
    pub orders_added: u64,
    /// Cancel events, whether or not they terminated a pending sequence
    pub orders_cancelled: u64,
    /// Total per-event processing time in nanoseconds (zero when timing
    /// is disabled)
    pub total_processing_ns: u64,
}

impl EngineStats {
    /// Running average per-event processing time in nanoseconds.
    pub fn average_processing_ns(&self) -> u64 {
        if self.records_processed == 0 {
            0
        } else {
            self.total_processing_ns / self.records_processed
        }
    }

    /// Write the counters as pretty JSON to `path`.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}

/// Single-instrument MBO → MBP reconstruction engine.
#[derive(Debug, Clone)]
pub struct BookEngine {
    config: EngineConfig,
    bids: BookSide,
    asks: BookSide,
    pending: PendingTrades,
    stats: EngineStats,
}

impl Default for BookEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BookEngine {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with custom configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            bids: BookSide::new(Side::Bid),
            asks: BookSide::new(Side::Ask),
            pending: PendingTrades::new(),
            stats: EngineStats::default(),
        }
    }

    /// Apply one MBO event and return the MBP snapshot taken after it.
    ///
    /// Returns `None` only for the venue's initial clear sentinel (action
    /// `R` at sequence 0), which is suppressed entirely: no mutation, no
    /// counters, no snapshot. Every other event — including semantic
    /// no-ops — produces a snapshot.
    pub fn apply(&mut self, event: &MboEvent) -> Option<MbpRecord> {
        // Initial clear sentinel: the 'R' glyph doubles as clear at the
        // start of the feed. Dropped before dispatch.
        if event.action == Action::Replace && event.sequence == 0 {
            return None;
        }

        let start = self.config.time_events.then(Instant::now);

        match event.action {
            Action::Add => self.handle_add(event),
            Action::Cancel => self.handle_cancel(event),
            Action::Trade => {
                self.pending.open(
                    event.order_id,
                    event.side,
                    event.price,
                    event.size,
                    event.ts_event,
                );
            }
            Action::Fill => self.pending.fill(event.order_id, event.size),
            // Replace past sequence 0 is not part of the supported input;
            // dispatch is a no-op but the event is still counted and
            // snapshotted.
            Action::Replace => {
                if self.config.log_warnings {
                    log::warn!(
                        "replace event at sequence {} ignored (order {})",
                        event.sequence,
                        event.order_id
                    );
                }
            }
        }

        self.update_stats(event, start);

        Some(self.snapshot(event))
    }

    fn handle_add(&mut self, event: &MboEvent) {
        match event.side {
            Side::Bid => self.bids.add(event.order_id, event.price, event.size),
            Side::Ask => self.asks.add(event.order_id, event.price, event.size),
            Side::Neutral => {}
        }
    }

    /// A Cancel either terminates an open trade sequence or removes resting
    /// liquidity directly; presence in the pending table at arrival decides.
    fn handle_cancel(&mut self, event: &MboEvent) {
        if let Some(entry) = self.pending.take(event.order_id) {
            // Terminator of a Trade→Fill→Cancel sequence. The Trade carried
            // the aggressor side; the liquidity that actually leaves the book
            // rests on the opposite side. The announced trade quantity is
            // what comes off; interleaved fills only confirm portions of it.
            match entry.side.opposite() {
                Side::Bid => self.bids.trade(event.order_id, entry.size),
                Side::Ask => self.asks.trade(event.order_id, entry.size),
                Side::Neutral => {
                    if self.config.log_warnings {
                        log::debug!(
                            "neutral-sided trade sequence for order {} discarded",
                            event.order_id
                        );
                    }
                }
            }
        } else {
            match event.side {
                Side::Bid => self.bids.cancel(event.order_id, event.size),
                Side::Ask => self.asks.cancel(event.order_id, event.size),
                Side::Neutral => {}
            }
        }
    }

    fn update_stats(&mut self, event: &MboEvent, start: Option<Instant>) {
        self.stats.records_processed += 1;
        match event.action {
            Action::Trade => self.stats.trades_processed += 1,
            Action::Add => self.stats.orders_added += 1,
            Action::Cancel => self.stats.orders_cancelled += 1,
            _ => {}
        }
        if let Some(start) = start {
            self.stats.total_processing_ns = self
                .stats
                .total_processing_ns
                .saturating_add(start.elapsed().as_nanos() as u64);
        }
    }

    /// Project the current book state into an MBP record, forwarding the
    /// event's non-book fields unchanged.
    fn snapshot(&self, event: &MboEvent) -> MbpRecord {
        MbpRecord {
            ts_recv: event.ts_recv,
            ts_event: event.ts_event,
            rtype: RTYPE_MBP,
            publisher_id: event.publisher_id,
            instrument_id: event.instrument_id,
            action: event.action,
            side: event.side,
            depth: 0,
            price: event.price,
            size: event.size,
            flags: event.flags,
            ts_in_delta: event.ts_in_delta,
            sequence: event.sequence,
            bid_levels: self.bids.top_levels(),
            ask_levels: self.asks.top_levels(),
            symbol: event.symbol.clone(),
            order_id: event.order_id,
        }
    }

    /// Current statistics, by value.
    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// The bid side, read-only.
    pub fn bid_side(&self) -> &BookSide {
        &self.bids
    }

    /// The ask side, read-only.
    pub fn ask_side(&self) -> &BookSide {
        &self.asks
    }

    /// Number of trade sequences currently open.
    pub fn pending_trades(&self) -> usize {
        self.pending.len()
    }

    /// Reset the engine to its freshly-constructed state.
    pub fn reset(&mut self) {
        self.bids.clear();
        self.asks.clear();
        self.pending.clear();
        self.stats = EngineStats::default();
    }
}
