//! Order book reconstruction: sides, pending trade sequences, and the engine.

mod engine;
mod level;
mod pending;
mod shards;
mod side;

pub use engine::{BookEngine, EngineConfig, EngineStats};
pub use level::PriceLevel;
pub use pending::{PendingEntry, PendingTrades};
pub use shards::EngineShards;
pub use side::BookSide;
