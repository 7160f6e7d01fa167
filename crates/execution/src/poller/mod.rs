//! Owned polling task for a position view.
//!
//! One task per view. It refreshes:
//! - on a fixed interval (first tick immediately)
//! - when a new transaction hash is reported
//! - when the account or chain changes
//!
//! A command that triggers a refresh drops the one in flight, so its
//! stale result is never published. The task lives as long as its
//! `PollerHandle`.

use crate::aggregate::PositionAggregator;
use crate::config::{ChainConfig, EngineConfig};
use farmview_domain::entities::PositionView;
use farmview_domain::value_objects::Address;
use futures::future::{BoxFuture, FutureExt};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

/// Control messages accepted by the polling task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollerCommand {
    /// The user submitted a transaction with this hash.
    TransactionSubmitted(String),
    /// The connected wallet changed.
    SetAccount(Option<Address>),
    /// The active chain changed.
    SetChain(u64),
    /// Refresh now.
    Refresh,
}

/// Why a refresh ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshReason {
    /// The interval elapsed.
    Timer,
    /// A new transaction hash was reported.
    Transaction,
    /// The wallet changed.
    AccountChanged,
    /// The chain changed.
    ChainChanged,
    /// Requested through `refresh_now`.
    Manual,
}

impl fmt::Display for RefreshReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RefreshReason::Timer => "timer",
            RefreshReason::Transaction => "transaction",
            RefreshReason::AccountChanged => "account_changed",
            RefreshReason::ChainChanged => "chain_changed",
            RefreshReason::Manual => "manual",
        };
        f.write_str(name)
    }
}

/// Inputs that select what the task reads.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PollState {
    chain_id: u64,
    account: Option<Address>,
    last_tx_hash: Option<String>,
}

impl PollState {
    /// Applies a command, returning the refresh it triggers, if any.
    fn apply(&mut self, command: PollerCommand) -> Option<RefreshReason> {
        match command {
            PollerCommand::TransactionSubmitted(hash) => {
                if self.last_tx_hash.as_deref() == Some(hash.as_str()) {
                    return None;
                }
                self.last_tx_hash = Some(hash);
                Some(RefreshReason::Transaction)
            }
            PollerCommand::SetAccount(account) => {
                if self.account == account {
                    return None;
                }
                self.account = account;
                Some(RefreshReason::AccountChanged)
            }
            PollerCommand::SetChain(chain_id) => {
                if self.chain_id == chain_id {
                    return None;
                }
                self.chain_id = chain_id;
                Some(RefreshReason::ChainChanged)
            }
            PollerCommand::Refresh => Some(RefreshReason::Manual),
        }
    }
}

/// Spawns and drives polling tasks.
pub struct PositionPoller {
    aggregator: Arc<PositionAggregator>,
    chains: HashMap<u64, ChainConfig>,
    refresh_interval: Duration,
}

impl PositionPoller {
    /// Creates a poller over the chains in `config`.
    pub fn new(aggregator: Arc<PositionAggregator>, config: &EngineConfig) -> Self {
        Self {
            aggregator,
            chains: config
                .chains
                .iter()
                .map(|c| (c.chain_id, c.clone()))
                .collect(),
            refresh_interval: config.refresh_interval(),
        }
    }

    /// Overrides the timer interval.
    #[must_use]
    pub fn with_refresh_interval(mut self, refresh_interval: Duration) -> Self {
        self.refresh_interval = refresh_interval;
        self
    }

    /// Starts the polling task for `account` on `chain_id`.
    pub fn spawn(self, chain_id: u64, account: Option<Address>) -> PollerHandle {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (view_tx, view_rx) = watch::channel(PositionView::loading());
        let state = PollState {
            chain_id,
            account,
            last_tx_hash: None,
        };

        info!(
            chain_id,
            interval_secs = self.refresh_interval.as_secs(),
            "Starting position poller"
        );
        let task = tokio::spawn(self.run(state, command_rx, view_tx));

        PollerHandle {
            commands: command_tx,
            view: view_rx,
            task: Some(task),
        }
    }

    async fn run(
        self,
        mut state: PollState,
        mut commands: mpsc::Receiver<PollerCommand>,
        view_tx: watch::Sender<PositionView>,
    ) {
        let mut ticker = interval(self.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut in_flight: Option<BoxFuture<'static, PositionView>> = None;

        loop {
            let reason = tokio::select! {
                view = settle(&mut in_flight) => {
                    in_flight = None;
                    view_tx.send_replace(view);
                    continue;
                }
                _ = ticker.tick() => {
                    // the running refresh already serves this tick
                    if in_flight.is_some() {
                        continue;
                    }
                    RefreshReason::Timer
                }
                command = commands.recv() => match command {
                    Some(command) => match state.apply(command) {
                        Some(reason) => reason,
                        None => continue,
                    },
                    None => break,
                },
            };

            if in_flight.take().is_some() {
                debug!(reason = %reason, "Dropping in-flight refresh");
            }
            in_flight = self.start_refresh(&state, reason, &view_tx);
        }

        info!("Position poller stopped");
    }

    /// Publishes the loading view and returns the pending refresh, or `None`
    /// when the chain is not configured.
    fn start_refresh(
        &self,
        state: &PollState,
        reason: RefreshReason,
        view_tx: &watch::Sender<PositionView>,
    ) -> Option<BoxFuture<'static, PositionView>> {
        debug!(chain_id = state.chain_id, reason = %reason, "Refreshing positions");

        let Some(chain) = self.chains.get(&state.chain_id) else {
            warn!(chain_id = state.chain_id, "Chain not configured, showing no positions");
            view_tx.send_replace(PositionView::ready(Vec::new()));
            return None;
        };

        view_tx.send_replace(PositionView::loading());
        let aggregator = Arc::clone(&self.aggregator);
        let chain = chain.clone();
        let account = state.account;
        Some(async move { aggregator.refresh(&chain, account).await.view }.boxed())
    }
}

/// Resolves with the running refresh's view; never resolves when idle.
async fn settle(in_flight: &mut Option<BoxFuture<'static, PositionView>>) -> PositionView {
    match in_flight {
        Some(refresh) => refresh.await,
        None => std::future::pending().await,
    }
}

/// Handle to a running polling task. Dropping it stops the task.
pub struct PollerHandle {
    commands: mpsc::Sender<PollerCommand>,
    view: watch::Receiver<PositionView>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// The latest published view.
    pub fn view(&self) -> PositionView {
        self.view.borrow().clone()
    }

    /// A receiver notified on every published view.
    pub fn subscribe(&self) -> watch::Receiver<PositionView> {
        self.view.clone()
    }

    /// Reports a submitted transaction; a new hash refreshes immediately.
    pub async fn transaction_submitted(&self, hash: impl Into<String>) {
        self.send(PollerCommand::TransactionSubmitted(hash.into())).await;
    }

    /// Switches the wallet; a different account refreshes immediately.
    pub async fn set_account(&self, account: Option<Address>) {
        self.send(PollerCommand::SetAccount(account)).await;
    }

    /// Switches the chain; a different chain refreshes immediately.
    pub async fn set_chain(&self, chain_id: u64) {
        self.send(PollerCommand::SetChain(chain_id)).await;
    }

    /// Refreshes immediately.
    pub async fn refresh_now(&self) {
        self.send(PollerCommand::Refresh).await;
    }

    async fn send(&self, command: PollerCommand) {
        if let Err(e) = self.commands.send(command).await {
            warn!(error = %e, "Position poller is no longer running");
        }
    }

    /// Stops the task and waits for it to finish.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockMetrics, MockReader, addr, chain, lp};
    use rust_decimal_macros::dec;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(2);

    async fn next_ready(rx: &mut watch::Receiver<PositionView>) -> PositionView {
        timeout(WAIT, async {
            loop {
                rx.changed().await.expect("poller stopped");
                let view = rx.borrow_and_update().clone();
                if !view.loading {
                    return view;
                }
            }
        })
        .await
        .expect("no ready view in time")
    }

    fn poller(reader: Arc<MockReader>, metrics: Arc<MockMetrics>) -> PositionPoller {
        let config = EngineConfig {
            chains: vec![chain()],
            ..Default::default()
        };
        PositionPoller::new(Arc::new(PositionAggregator::new(reader, metrics)), &config)
    }

    #[test]
    fn test_state_ignores_repeated_inputs() {
        let mut state = PollState {
            chain_id: 137,
            account: None,
            last_tx_hash: None,
        };
        let hash = || PollerCommand::TransactionSubmitted("0xabc".to_string());

        assert_eq!(state.apply(hash()), Some(RefreshReason::Transaction));
        assert_eq!(state.apply(hash()), None);
        assert_eq!(state.apply(PollerCommand::SetAccount(None)), None);
        assert_eq!(
            state.apply(PollerCommand::SetAccount(Some(addr(1)))),
            Some(RefreshReason::AccountChanged)
        );
        assert_eq!(state.apply(PollerCommand::SetChain(137)), None);
        assert_eq!(
            state.apply(PollerCommand::SetChain(1)),
            Some(RefreshReason::ChainChanged)
        );
        assert_eq!(state.apply(PollerCommand::Refresh), Some(RefreshReason::Manual));
    }

    #[tokio::test]
    async fn test_first_refresh_runs_immediately() {
        let pool = chain().pools[0].address;
        let reader = Arc::new(MockReader::default().with_balance(pool, lp(10)));
        let metrics = Arc::new(MockMetrics::with_pool(pool, dec!(1000), dec!(100)));

        let handle = poller(reader, metrics).spawn(137, Some(addr(0xaa)));
        let mut rx = handle.subscribe();
        let view = next_ready(&mut rx).await;

        assert_eq!(view.positions.len(), 1);
        assert_eq!(view.positions[0].balance_usd, dec!(100));
        assert_eq!(handle.view(), view);
    }

    #[tokio::test]
    async fn test_transaction_hash_change_refreshes_before_timer() {
        let reader = Arc::new(MockReader::default());
        let metrics = Arc::new(MockMetrics::default());
        let handle = poller(reader, metrics.clone()).spawn(137, Some(addr(0xaa)));
        let mut rx = handle.subscribe();

        next_ready(&mut rx).await;
        assert_eq!(metrics.fetch_count(), 1);

        handle.transaction_submitted("0x01").await;
        next_ready(&mut rx).await;
        assert_eq!(metrics.fetch_count(), 2);

        // same hash again: no refresh
        handle.transaction_submitted("0x01").await;
        handle.transaction_submitted("0x02").await;
        next_ready(&mut rx).await;
        assert_eq!(metrics.fetch_count(), 3);
    }

    #[tokio::test]
    async fn test_transaction_hash_supersedes_slow_refresh() {
        let pool = chain().pools[0].address;
        let reader = Arc::new(MockReader::default().with_balance(pool, lp(10)));
        let metrics = Arc::new(
            MockMetrics::with_pool(pool, dec!(1000), dec!(100))
                .with_first_fetch_delay(Duration::from_millis(800)),
        );
        let started = tokio::time::Instant::now();
        let handle = poller(reader, metrics.clone()).spawn(137, Some(addr(0xaa)));
        let mut rx = handle.subscribe();

        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.transaction_submitted("0x01").await;
        let view = next_ready(&mut rx).await;

        assert!(started.elapsed() < Duration::from_millis(600));
        assert_eq!(metrics.fetch_count(), 2);
        assert_eq!(view.positions[0].balance_usd, dec!(100));

        // the dropped refresh never publishes
        assert!(timeout(Duration::from_secs(1), rx.changed()).await.is_err());
        assert_eq!(metrics.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_account_change_refreshes() {
        let pool = chain().pools[0].address;
        let reader = Arc::new(MockReader::default().with_balance(pool, lp(1)));
        let metrics = Arc::new(MockMetrics::default());
        let handle = poller(reader, metrics).spawn(137, None);
        let mut rx = handle.subscribe();

        let view = next_ready(&mut rx).await;
        assert!(view.positions.is_empty());

        handle.set_account(Some(addr(0xaa))).await;
        let view = next_ready(&mut rx).await;
        assert_eq!(view.positions.len(), 1);
    }

    #[tokio::test]
    async fn test_unconfigured_chain_shows_nothing() {
        let reader = Arc::new(MockReader::default());
        let handle = poller(reader.clone(), Arc::new(MockMetrics::default())).spawn(5, Some(addr(0xaa)));
        let mut rx = handle.subscribe();

        let view = next_ready(&mut rx).await;
        assert!(view.positions.is_empty());
        assert_eq!(reader.call_count(), 0);
    }

    #[tokio::test]
    async fn test_timer_refreshes() {
        let metrics = Arc::new(MockMetrics::default());
        let handle = poller(Arc::new(MockReader::default()), metrics.clone())
            .with_refresh_interval(Duration::from_millis(50))
            .spawn(137, Some(addr(0xaa)));
        let mut rx = handle.subscribe();

        next_ready(&mut rx).await;
        next_ready(&mut rx).await;
        assert!(metrics.fetch_count() >= 2);
    }

    #[tokio::test]
    async fn test_shutdown_stops_publishing() {
        let metrics = Arc::new(MockMetrics::default());
        let handle = poller(Arc::new(MockReader::default()), metrics.clone())
            .with_refresh_interval(Duration::from_millis(20))
            .spawn(137, Some(addr(0xaa)));
        let mut rx = handle.subscribe();
        next_ready(&mut rx).await;

        handle.shutdown().await;
        rx.borrow_and_update();
        let fetched = metrics.fetch_count();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(metrics.fetch_count(), fetched);
        assert!(rx.changed().await.is_err());
    }
}
