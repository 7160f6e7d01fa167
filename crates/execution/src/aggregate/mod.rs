//! Position aggregation.
//!
//! One refresh issues every read concurrently, waits for all of them on a
//! `ReadBarrier`, then joins the results into positions.

mod aggregator;
mod barrier;
mod join;

pub use aggregator::*;
pub use barrier::*;
pub use join::*;
