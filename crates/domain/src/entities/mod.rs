pub mod metrics;
pub mod pool;
pub mod position;
pub mod staked;

// Re-export for easier access
pub use metrics::PoolMetrics;
pub use pool::PoolDescriptor;
pub use position::{Position, PositionView};
pub use staked::StakedAmount;
