//! # MBP Reconstructor
//!
//! High-performance reconstruction of a depth-limited Market-By-Price (MBP)
//! book from a stream of Market-By-Order (MBO) events, emitting one MBP
//! snapshot row per input event.
//!
//! ## Features
//!
//! - **MBO → MBP-10**: order-level events in, aggregated price levels out
//! - **Trade sequence handling**: the venue's Trade→Fill→Cancel pattern,
//!   including the aggressor side rewrite
//! - **Total over input**: venue cleanup noise (unknown cancels, stray
//!   fills) is absorbed as no-ops, never as errors
//! - **Single-thread hot path**: no locks, no I/O, no allocation beyond
//!   amortized container growth; shard by instrument for parallelism
//!
//! ## Quick Start
//!
//! ```rust
//! use mbp_reconstructor::{Action, BookEngine, MboEvent, Side};
//!
//! let mut engine = BookEngine::new();
//!
//! // A resting bid arrives: $5.51 for 100.
//! let event = MboEvent::new(Action::Add, Side::Bid, 5_510_000, 100, 817_593)
//!     .with_sequence(851_012);
//!
//! let snapshot = engine.apply(&event).expect("not a clear sentinel");
//! assert_eq!(snapshot.bid_levels[0].price, 5_510_000);
//! assert_eq!(snapshot.bid_levels[0].size, 100);
//! ```
//!
//! ## Processing a file
//!
//! ```no_run
//! use mbp_reconstructor::CsvPipeline;
//!
//! let mut pipeline = CsvPipeline::new();
//! let summary = pipeline.process_file("mbo.csv", "output_mbp.csv")?;
//! println!("{} rows at {:.0} rows/s", summary.rows_written, summary.throughput());
//! # Ok::<(), mbp_reconstructor::BookError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Core types: `MboEvent`, `MbpRecord`, `Action`, `Side` |
//! | [`book`] | Reconstruction: `BookEngine`, `BookSide`, `PendingTrades` |
//! | [`parser`] | MBO CSV line parsing |
//! | [`writer`] | MBP CSV row formatting |
//! | [`pipeline`] | Buffered file driver |

pub mod book;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod types;
pub mod writer;

// Re-exports - Core types
pub use error::{BookError, Result};
pub use types::{
    Action, BookLevel, MboEvent, MbpRecord, Side, DEPTH, PRICE_SCALE, RTYPE_MBO, RTYPE_MBP,
};

// Re-exports - Book reconstruction
pub use book::{BookEngine, BookSide, EngineConfig, EngineShards, EngineStats, PendingTrades};

// Re-exports - CSV boundary
pub use parser::parse_mbo_line;
pub use pipeline::{CsvPipeline, PipelineConfig, PipelineSummary};
