//! Function-call metering for Rust programs.
//!
//! `callmeter` measures individual calls: how long each one took and how much
//! heap it allocated at peak, keyed by a caller-supplied function name. The
//! accumulated samples feed outlier-filtered summary statistics, pretty JSON
//! run exports, and execution-time trend charts that line up the most recent
//! runs side by side.
//!
//! Timing always works. Peak-memory readings need the [`track::TallyAllocator`]
//! installed as the global allocator; without it every sample reports a flat
//! `0.0` KB.
pub mod charts;
pub mod config;
pub mod error;
pub mod logger;
pub mod recorder;
pub mod report;
pub mod stats;
pub mod store;
pub mod track;
