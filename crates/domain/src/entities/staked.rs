use crate::value_objects::{Address, Amount};
use serde::{Deserialize, Serialize};

/// Amount of a pool's LP token the account has staked in a farm contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakedAmount {
    pub pool: Address,
    pub pid: u64,
    pub farm_index: usize,
    pub amount: Amount,
}
