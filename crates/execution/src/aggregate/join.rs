//! Joins the per-refresh reads into positions.

use farmview_data::MetricsByPool;
use farmview_domain::entities::{PoolDescriptor, Position, StakedAmount};
use farmview_domain::math::valuation::{lp_token_price, position_value_usd};
use farmview_domain::value_objects::{Address, Amount};
use farmview_protocols::call::CallState;
use primitive_types::U256;
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Pools whose stake lives in one farm contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmPartition {
    pub farm_index: usize,
    pub contract: Address,
    /// `(pool index, pid)` in pool order.
    pub members: Vec<(usize, u64)>,
}

/// Groups pools by farm index.
///
/// Every configured farm contract gets a partition, empty or not. Pools
/// without a pid, or whose farm index has no contract, have nothing to read
/// and stake zero.
pub fn partition_by_farm(pools: &[PoolDescriptor], farm_contracts: &[Address]) -> Vec<FarmPartition> {
    let mut partitions: Vec<FarmPartition> = farm_contracts
        .iter()
        .enumerate()
        .map(|(farm_index, contract)| FarmPartition {
            farm_index,
            contract: *contract,
            members: Vec::new(),
        })
        .collect();

    for (index, pool) in pools.iter().enumerate() {
        let Some(pid) = pool.pid else {
            continue;
        };
        match partitions.get_mut(pool.farm_index()) {
            Some(partition) => partition.members.push((index, pid)),
            None => debug!(
                pool = %pool.address,
                farm_index = pool.farm_index(),
                "No farm contract for pool"
            ),
        }
    }
    partitions
}

/// Reads word `index` of a call as an 18-decimal LP amount; anything missing
/// or unrepresentable counts as zero.
pub(crate) fn lp_word(state: Option<&CallState>, index: usize) -> Decimal {
    let Some(raw) = state.and_then(|s| s.word(index)) else {
        return Decimal::ZERO;
    };
    match Amount::lp(raw).to_decimal() {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "LP amount out of range, counting as zero");
            Decimal::ZERO
        }
    }
}

/// Staked amount per partition member, in partition order.
pub fn collect_staked(
    pools: &[PoolDescriptor],
    partitions: &[FarmPartition],
    results: &[Vec<CallState>],
) -> Vec<StakedAmount> {
    partitions
        .iter()
        .enumerate()
        .flat_map(|(i, partition)| {
            let states = results.get(i);
            partition
                .members
                .iter()
                .enumerate()
                .filter_map(move |(j, &(pool_index, pid))| {
                    let pool = pools.get(pool_index)?;
                    let raw = states
                        .and_then(|s| s.get(j))
                        .and_then(|s| s.word(0))
                        .unwrap_or_else(U256::zero);
                    Some(StakedAmount {
                        pool: pool.address,
                        pid,
                        farm_index: partition.farm_index,
                        amount: Amount::lp(raw),
                    })
                })
        })
        .collect()
}

/// Settled inputs of one refresh, indexed like `pools`.
#[derive(Debug, Clone, Copy)]
pub struct JoinInputs<'a> {
    pub pools: &'a [PoolDescriptor],
    pub staked: &'a [StakedAmount],
    pub balances: &'a [CallState],
    pub total_amounts: &'a [CallState],
    pub total_supply: &'a [CallState],
    pub metrics: &'a MetricsByPool,
    /// Decimals of the metrics service's `total_supply`.
    pub supply_decimals: u32,
}

/// Builds the non-zero positions.
pub fn join_positions(inputs: &JoinInputs<'_>) -> Vec<Position> {
    inputs
        .pools
        .iter()
        .enumerate()
        .filter_map(|(i, pool)| {
            let staked = inputs
                .staked
                .iter()
                .find(|s| s.pool == pool.address)
                .map(|s| match s.amount.to_decimal() {
                    Ok(value) => value,
                    Err(e) => {
                        warn!(pool = %pool.address, error = %e, "Staked amount out of range");
                        Decimal::ZERO
                    }
                })
                .unwrap_or(Decimal::ZERO);
            let wallet = lp_word(inputs.balances.get(i), 0);
            let lp_amount = wallet + staked;
            if lp_amount <= Decimal::ZERO {
                return None;
            }

            let totals = inputs.total_amounts.get(i);
            let lp_price = lp_token_price(inputs.metrics.get(&pool.metrics_key()), inputs.supply_decimals);
            let balance_usd = position_value_usd(lp_amount, lp_price).unwrap_or_else(|| {
                warn!(pool = %pool.address, %lp_amount, %lp_price, "USD value out of range, counting as zero");
                Decimal::ZERO
            });

            Some(Position {
                pair_address: pool.address,
                token0_address: pool.token0,
                token1_address: pool.token1,
                lp_amount,
                balance_usd,
                total_amount0: totals.and_then(|s| s.word(0)),
                total_amount1: totals.and_then(|s| s.word(1)),
                total_supply: lp_word(inputs.total_supply.get(i), 0),
                farming: staked > Decimal::ZERO,
            })
        })
        .collect()
}
