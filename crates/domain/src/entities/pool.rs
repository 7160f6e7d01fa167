use crate::value_objects::Address;
use serde::{Deserialize, Serialize};

/// Static description of a liquidity pool and where its stake is registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolDescriptor {
    pub address: Address,
    pub token0: Address,
    pub token1: Address,
    /// Index of the farm (staking) contract; unset means the first one.
    pub farm_index: Option<usize>,
    /// Pool id inside the farm contract.
    pub pid: Option<u64>,
}

impl PoolDescriptor {
    pub fn new(address: Address, token0: Address, token1: Address) -> Self {
        Self {
            address,
            token0,
            token1,
            farm_index: None,
            pid: None,
        }
    }

    /// Registers the pool under a farm contract.
    #[must_use]
    pub fn with_farm(mut self, farm_index: usize, pid: u64) -> Self {
        self.farm_index = Some(farm_index);
        self.pid = Some(pid);
        self
    }

    pub fn farm_index(&self) -> usize {
        self.farm_index.unwrap_or(0)
    }

    /// Key under which the metrics service publishes this pool.
    pub fn metrics_key(&self) -> String {
        self.address.to_lowercase_hex()
    }
}
