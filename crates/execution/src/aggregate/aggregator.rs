//! Aggregator issuing the reads of one refresh.

use super::barrier::{ReadBarrier, ReadSource, ReadStatus};
use super::join::{FarmPartition, JoinInputs, collect_staked, join_positions, partition_by_farm};
use crate::config::{ChainConfig, EngineConfig};
use crate::error::EngineError;
use farmview_data::providers::HttpMetricsProvider;
use farmview_data::{DataError, MetricsByPool, MetricsProvider};
use farmview_domain::entities::PositionView;
use farmview_domain::value_objects::Address;
use farmview_protocols::call::{CallState, ContractCall};
use farmview_protocols::reader::ChainReader;
use farmview_protocols::rpc::JsonRpcReader;
use futures::future::{BoxFuture, FutureExt, join_all};
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of one refresh.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    /// What the consumer should render.
    pub view: PositionView,
    /// Final state of every read.
    pub barrier: ReadBarrier,
}

enum ReadOutput {
    Staked(Vec<Vec<CallState>>),
    Balances(Vec<CallState>),
    TotalAmounts(Vec<CallState>),
    TotalSupply(Vec<CallState>),
    Metrics(Result<MetricsByPool, DataError>),
}

#[derive(Default)]
struct ReadData {
    staked: Vec<Vec<CallState>>,
    balances: Vec<CallState>,
    total_amounts: Vec<CallState>,
    total_supply: Vec<CallState>,
    metrics: MetricsByPool,
}

impl ReadData {
    fn store(&mut self, output: ReadOutput) -> (ReadSource, ReadStatus) {
        match output {
            ReadOutput::Staked(states) => {
                let status = ReadStatus::from_calls(states.iter().flatten());
                self.staked = states;
                (ReadSource::StakedAmounts, status)
            }
            ReadOutput::Balances(states) => {
                let status = ReadStatus::from_calls(&states);
                self.balances = states;
                (ReadSource::Balances, status)
            }
            ReadOutput::TotalAmounts(states) => {
                let status = ReadStatus::from_calls(&states);
                self.total_amounts = states;
                (ReadSource::TotalAmounts, status)
            }
            ReadOutput::TotalSupply(states) => {
                let status = ReadStatus::from_calls(&states);
                self.total_supply = states;
                (ReadSource::TotalSupply, status)
            }
            ReadOutput::Metrics(Ok(metrics)) => {
                self.metrics = metrics;
                (ReadSource::Metrics, ReadStatus::Ready)
            }
            ReadOutput::Metrics(Err(e)) => (ReadSource::Metrics, ReadStatus::Failed(e.to_string())),
        }
    }
}

/// Computes a wallet's liquidity positions from chain and metrics reads.
///
/// Holds no state between refreshes: every call rebuilds the full position
/// list from fresh reads.
pub struct PositionAggregator {
    reader: Arc<dyn ChainReader>,
    metrics: Arc<dyn MetricsProvider>,
    supply_decimals: u32,
}

impl PositionAggregator {
    /// Creates a new aggregator.
    pub fn new(reader: Arc<dyn ChainReader>, metrics: Arc<dyn MetricsProvider>) -> Self {
        Self {
            reader,
            metrics,
            supply_decimals: 0,
        }
    }

    /// Sets the decimals the metrics service uses for LP supply.
    #[must_use]
    pub fn with_supply_decimals(mut self, supply_decimals: u32) -> Self {
        self.supply_decimals = supply_decimals;
        self
    }

    /// Builds an aggregator backed by JSON-RPC and the HTTP metrics service.
    ///
    /// # Errors
    /// Returns an error if either HTTP client cannot be built.
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        let reader = JsonRpcReader::new(config.rpc_reader_config())?;
        let metrics = HttpMetricsProvider::new(config.metrics_config())?;
        Ok(Self::new(Arc::new(reader), Arc::new(metrics))
            .with_supply_decimals(config.metrics_supply_decimals))
    }

    /// Runs one refresh for `account` on `chain`.
    ///
    /// Without an account nothing is read and the view is ready and empty.
    /// If any read is still pending once every request returned, the view
    /// stays loading and carries no positions.
    pub async fn refresh(&self, chain: &ChainConfig, account: Option<Address>) -> RefreshOutcome {
        let Some(account) = account else {
            debug!(chain_id = chain.chain_id, "No account connected");
            return RefreshOutcome {
                view: PositionView::ready(Vec::new()),
                barrier: ReadBarrier::settled(),
            };
        };

        let chain_id = chain.chain_id;
        let partitions = partition_by_farm(&chain.pools, &chain.farm_contracts);
        let addresses: Vec<Address> = chain.pools.iter().map(|p| p.address).collect();

        let mut reads: FuturesUnordered<BoxFuture<'_, ReadOutput>> = FuturesUnordered::new();
        reads.push(
            self.read_staked(chain_id, &partitions, account)
                .map(ReadOutput::Staked)
                .boxed(),
        );
        reads.push(
            self.reader
                .call_each(chain_id, &addresses, ContractCall::BalanceOf { owner: account })
                .map(ReadOutput::Balances)
                .boxed(),
        );
        reads.push(
            self.reader
                .call_each(chain_id, &addresses, ContractCall::GetTotalAmounts)
                .map(ReadOutput::TotalAmounts)
                .boxed(),
        );
        reads.push(
            self.reader
                .call_each(chain_id, &addresses, ContractCall::TotalSupply)
                .map(ReadOutput::TotalSupply)
                .boxed(),
        );
        reads.push(
            self.metrics
                .fetch_pool_metrics(chain_id)
                .map(ReadOutput::Metrics)
                .boxed(),
        );

        let mut barrier = ReadBarrier::new(ReadSource::ALL);
        let mut data = ReadData::default();
        while let Some(output) = reads.next().await {
            let (source, status) = data.store(output);
            barrier.settle(source, status);
            debug!(
                chain_id,
                source = %source,
                remaining = barrier.pending().len(),
                "Read settled"
            );
        }

        if !barrier.is_settled() {
            debug!(chain_id, pending = ?barrier.pending(), "Reads still pending");
            return RefreshOutcome {
                view: PositionView::loading(),
                barrier,
            };
        }
        for (source, reason) in barrier.degraded() {
            warn!(chain_id, source = %source, reason, "Read failed, using zero values");
        }

        let staked = collect_staked(&chain.pools, &partitions, &data.staked);
        let positions = join_positions(&JoinInputs {
            pools: &chain.pools,
            staked: &staked,
            balances: &data.balances,
            total_amounts: &data.total_amounts,
            total_supply: &data.total_supply,
            metrics: &data.metrics,
            supply_decimals: self.supply_decimals,
        });

        info!(
            chain_id,
            account = %account,
            pools = chain.pools.len(),
            positions = positions.len(),
            "Positions refreshed"
        );

        RefreshOutcome {
            view: PositionView::ready(positions),
            barrier,
        }
    }

    /// One batched `userInfo` read per farm contract.
    async fn read_staked(
        &self,
        chain_id: u64,
        partitions: &[FarmPartition],
        account: Address,
    ) -> Vec<Vec<CallState>> {
        let reads = partitions.iter().map(|partition| {
            let calls = partition
                .members
                .iter()
                .map(|&(_, pid)| ContractCall::UserInfo { pid, account })
                .collect();
            self.reader.call_contract(chain_id, partition.contract, calls)
        });
        join_all(reads).await
    }
}
