//! Off-chain pool metrics.
//!
//! Pool TVL and LP supply come from an aggregation service rather than from
//! the chain. This crate defines the lookup interface and an HTTP client for it.

/// Error types.
pub mod error;
/// Metrics provider implementations.
pub mod providers;

pub use error::DataError;

use async_trait::async_trait;
use farmview_domain::entities::PoolMetrics;
use std::collections::HashMap;

/// Pool metrics keyed by lowercase pool address.
pub type MetricsByPool = HashMap<String, PoolMetrics>;

/// Source of pool-level USD metrics.
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    /// Fetches metrics for every pool the service knows on `chain_id`.
    async fn fetch_pool_metrics(&self, chain_id: u64) -> Result<MetricsByPool, DataError>;
}
