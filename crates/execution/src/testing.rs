//! Test doubles for the chain reader and metrics provider.

use crate::config::ChainConfig;
use async_trait::async_trait;
use farmview_data::{DataError, MetricsByPool, MetricsProvider};
use farmview_domain::entities::{PoolDescriptor, PoolMetrics};
use farmview_domain::value_objects::{Address, Amount};
use farmview_protocols::call::{Call, CallState, ContractCall};
use farmview_protocols::reader::ChainReader;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn addr(byte: u8) -> Address {
    Address::new([byte; 20])
}

/// A resolved read of `units` whole LP tokens.
pub fn lp(units: u64) -> CallState {
    CallState::Value(vec![Amount::from_units(units, 18).raw])
}

/// Chain 137 with one farm contract, a farmed pool and an unfarmed pool.
pub fn chain() -> ChainConfig {
    let mut chain = ChainConfig::new(137);
    chain.farm_contracts = vec![addr(0xf0)];
    chain.pools = vec![
        PoolDescriptor::new(addr(1), addr(11), addr(12)).with_farm(0, 0),
        PoolDescriptor::new(addr(2), addr(21), addr(22)),
    ];
    chain
}

/// Answers reads from fixed tables; anything unset is empty.
#[derive(Default)]
pub struct MockReader {
    balances: HashMap<Address, CallState>,
    totals: HashMap<Address, CallState>,
    supplies: HashMap<Address, CallState>,
    stakes: HashMap<(Address, u64), CallState>,
    calls: AtomicUsize,
}

impl MockReader {
    pub fn with_balance(mut self, pool: Address, state: CallState) -> Self {
        self.balances.insert(pool, state);
        self
    }

    pub fn with_totals(mut self, pool: Address, state: CallState) -> Self {
        self.totals.insert(pool, state);
        self
    }

    pub fn with_supply(mut self, pool: Address, state: CallState) -> Self {
        self.supplies.insert(pool, state);
        self
    }

    pub fn with_stake(mut self, farm: Address, pid: u64, state: CallState) -> Self {
        self.stakes.insert((farm, pid), state);
        self
    }

    /// Number of batches served.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn answer(&self, call: &Call) -> CallState {
        let state = match call.call {
            ContractCall::BalanceOf { .. } => self.balances.get(&call.contract),
            ContractCall::GetTotalAmounts => self.totals.get(&call.contract),
            ContractCall::TotalSupply => self.supplies.get(&call.contract),
            ContractCall::UserInfo { pid, .. } => self.stakes.get(&(call.contract, pid)),
        };
        state.cloned().unwrap_or(CallState::Empty)
    }
}

#[async_trait]
impl ChainReader for MockReader {
    async fn call_many(&self, _chain_id: u64, calls: Vec<Call>) -> Vec<CallState> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        calls.iter().map(|call| self.answer(call)).collect()
    }
}

#[derive(Default)]
pub struct MockMetrics {
    metrics: MetricsByPool,
    fail: bool,
    first_fetch_delay: Option<Duration>,
    fetches: AtomicUsize,
}

impl MockMetrics {
    pub fn with_pool(pool: Address, total_value_usd: Decimal, total_supply: Decimal) -> Self {
        let key = pool.to_lowercase_hex();
        Self {
            metrics: MetricsByPool::from([(
                key.clone(),
                PoolMetrics::new(key, total_value_usd, total_supply),
            )]),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Makes only the first fetch slow.
    pub fn with_first_fetch_delay(mut self, delay: Duration) -> Self {
        self.first_fetch_delay = Some(delay);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetricsProvider for MockMetrics {
    async fn fetch_pool_metrics(&self, chain_id: u64) -> Result<MetricsByPool, DataError> {
        let previous = self.fetches.fetch_add(1, Ordering::SeqCst);
        if let (0, Some(delay)) = (previous, self.first_fetch_delay) {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(DataError::UnknownChain(chain_id));
        }
        Ok(self.metrics.clone())
    }
}
