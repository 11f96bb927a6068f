//! Engine-per-instrument sharding.
//!
//! A [`BookEngine`] handles exactly one instrument. [`EngineShards`] routes
//! a mixed-instrument event stream to a set of engines keyed by
//! `instrument_id`, creating engines lazily on first sight of an id. Each
//! engine stays single-threaded and unshared; parallelism, when wanted, is
//! one shard router (or one engine) per thread, never a shared engine.

use ahash::AHashMap;

use super::engine::{BookEngine, EngineConfig, EngineStats};
use crate::types::{MboEvent, MbpRecord};

/// Routes events to one [`BookEngine`] per instrument id.
#[derive(Debug, Clone, Default)]
pub struct EngineShards {
    config: EngineConfig,
    engines: AHashMap<u32, BookEngine>,
}

impl EngineShards {
    /// Create a router whose engines use the default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create a router whose engines use `config`.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            engines: AHashMap::new(),
        }
    }

    /// Route one event to its instrument's engine, creating the engine on
    /// first sight of the instrument id.
    pub fn apply(&mut self, event: &MboEvent) -> Option<MbpRecord> {
        self.engines
            .entry(event.instrument_id)
            .or_insert_with(|| BookEngine::with_config(self.config.clone()))
            .apply(event)
    }

    /// The engine for an instrument, if one has been created.
    pub fn engine(&self, instrument_id: u32) -> Option<&BookEngine> {
        self.engines.get(&instrument_id)
    }

    /// Instrument ids seen so far.
    pub fn instruments(&self) -> Vec<u32> {
        self.engines.keys().copied().collect()
    }

    /// Number of instruments seen so far.
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    /// True if no instrument has been seen yet.
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// Counters summed across all shards.
    pub fn combined_stats(&self) -> EngineStats {
        let mut combined = EngineStats::default();
        for engine in self.engines.values() {
            let stats = engine.stats();
            combined.records_processed += stats.records_processed;
            combined.trades_processed += stats.trades_processed;
            combined.orders_added += stats.orders_added;
            combined.orders_cancelled += stats.orders_cancelled;
            combined.total_processing_ns += stats.total_processing_ns;
        }
        combined
    }

    /// Reset every shard.
    pub fn reset_all(&mut self) {
        for engine in self.engines.values_mut() {
            engine.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Action, BookLevel, Side};

    fn add(instrument_id: u32, price: i64, size: u32, id: u64) -> MboEvent {
        MboEvent::new(Action::Add, Side::Bid, price, size, id)
            .with_sequence(1)
            .with_instrument(instrument_id)
    }

    #[test]
    fn test_events_route_by_instrument() {
        let mut shards = EngineShards::new();
        shards.apply(&add(1, 1_000_000, 100, 10));
        shards.apply(&add(2, 2_000_000, 200, 20));

        assert_eq!(shards.len(), 2);
        let one = shards.engine(1).expect("engine for instrument 1");
        let two = shards.engine(2).expect("engine for instrument 2");
        assert_eq!(one.bid_side().best_price(), Some(1_000_000));
        assert_eq!(two.bid_side().best_price(), Some(2_000_000));
    }

    #[test]
    fn test_snapshots_are_per_instrument() {
        let mut shards = EngineShards::new();
        shards.apply(&add(1, 1_000_000, 100, 10));
        let snap = shards.apply(&add(2, 2_000_000, 200, 20)).expect("snapshot");

        // Instrument 2's book does not see instrument 1's order.
        assert_eq!(snap.bid_levels[0], BookLevel::new(2_000_000, 200, 1));
        assert!(snap.bid_levels[1..].iter().all(BookLevel::is_empty));
    }

    #[test]
    fn test_combined_stats() {
        let mut shards = EngineShards::new();
        shards.apply(&add(1, 1_000_000, 100, 10));
        shards.apply(&add(2, 2_000_000, 200, 20));
        shards.apply(&add(2, 2_010_000, 300, 21));

        let stats = shards.combined_stats();
        assert_eq!(stats.records_processed, 3);
        assert_eq!(stats.orders_added, 3);
    }

    #[test]
    fn test_reset_all() {
        let mut shards = EngineShards::new();
        shards.apply(&add(1, 1_000_000, 100, 10));
        shards.reset_all();

        assert_eq!(shards.len(), 1);
        assert!(shards.engine(1).unwrap().bid_side().is_empty());
        assert_eq!(shards.combined_stats().records_processed, 0);
    }
}
