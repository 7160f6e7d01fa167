//! Position aggregation engine.
//!
//! This crate turns pool configuration and live reads into position views:
//! - Concurrent batched reads joined on an explicit read barrier
//! - Position valuation and filtering
//! - An owned polling task refreshing on a timer and on wallet activity
//! - Engine configuration

/// Prelude module for convenient imports.
pub mod prelude;

/// Reads, barrier and join.
pub mod aggregate;
/// Engine configuration.
pub mod config;
/// Error types.
pub mod error;
/// Polling task.
pub mod poller;

#[cfg(test)]
pub(crate) mod testing;

pub use error::EngineError;
