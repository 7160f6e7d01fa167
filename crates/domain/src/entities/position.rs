use crate::value_objects::Address;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A wallet's holding in one pool, rebuilt on every refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub pair_address: Address,
    pub token0_address: Address,
    pub token1_address: Address,
    /// Wallet balance plus staked balance, in whole LP tokens.
    pub lp_amount: Decimal,
    pub balance_usd: Decimal,
    /// Raw pool holdings of token0 (`getTotalAmounts` word 0).
    pub total_amount0: Option<U256>,
    /// Raw pool holdings of token1 (`getTotalAmounts` word 1).
    pub total_amount1: Option<U256>,
    /// On-chain LP supply in whole tokens.
    pub total_supply: Decimal,
    /// Whether part of the amount is staked.
    pub farming: bool,
}

/// What a consumer renders: a loading gate and the settled positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionView {
    pub loading: bool,
    pub positions: Vec<Position>,
}

impl PositionView {
    /// A view waiting on outstanding reads. Never carries positions.
    pub fn loading() -> Self {
        Self {
            loading: true,
            positions: Vec::new(),
        }
    }

    pub fn ready(positions: Vec<Position>) -> Self {
        Self {
            loading: false,
            positions,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sum of the USD value of every position.
    pub fn total_usd(&self) -> Decimal {
        self.positions.iter().map(|p| p.balance_usd).sum()
    }
}
