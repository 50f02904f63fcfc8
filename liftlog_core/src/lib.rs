#![forbid(unsafe_code)]

//! Core engine for live workout sessions.
//!
//! This crate provides:
//! - Domain types (routines, planned sets, summaries, records)
//! - Set plan generation
//! - The session state machine and its elapsed-time clock
//! - Summary production and aggregates
//! - Host-side helpers (config, routine files, summary log, CSV rollup)

pub mod types;
pub mod error;
pub mod plan;
pub mod session;
pub mod clock;
pub mod summary;
pub mod routine;
pub mod config;
pub mod logging;
pub mod wal;
pub mod csv_rollup;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use plan::generate;
pub use session::WorkoutSession;
pub use clock::Ticker;
pub use summary::summarize;
pub use routine::default_routine;
pub use config::Config;
pub use wal::{JsonlSink, SummarySink};
