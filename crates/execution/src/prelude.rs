//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use farmview_execution::prelude::*;
//! ```

// Aggregation
pub use crate::aggregate::{
    FarmPartition, JoinInputs, PositionAggregator, ReadBarrier, ReadSource, ReadStatus,
    RefreshOutcome, collect_staked, join_positions, partition_by_farm,
};

// Configuration
pub use crate::config::{ChainConfig, EngineConfig};
pub use crate::error::EngineError;

// Polling
pub use crate::poller::{PollerCommand, PollerHandle, PositionPoller, RefreshReason};
