//! Join point for the independent reads of one refresh.

use farmview_protocols::call::CallState;
use std::collections::BTreeMap;
use std::fmt;

/// One of the reads a refresh waits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReadSource {
    /// `userInfo` reads on the farm contracts.
    StakedAmounts,
    /// `balanceOf` reads on the LP tokens.
    Balances,
    /// `getTotalAmounts` reads on the pools.
    TotalAmounts,
    /// `totalSupply` reads on the LP tokens.
    TotalSupply,
    /// Off-chain pool metrics lookup.
    Metrics,
}

impl ReadSource {
    /// Every source, in settle order.
    pub const ALL: [ReadSource; 5] = [
        ReadSource::StakedAmounts,
        ReadSource::Balances,
        ReadSource::TotalAmounts,
        ReadSource::TotalSupply,
        ReadSource::Metrics,
    ];

    /// Name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            ReadSource::StakedAmounts => "staked_amounts",
            ReadSource::Balances => "balances",
            ReadSource::TotalAmounts => "total_amounts",
            ReadSource::TotalSupply => "total_supply",
            ReadSource::Metrics => "metrics",
        }
    }
}

impl fmt::Display for ReadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Status of a read slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadStatus {
    /// Still waiting on at least one call.
    Pending,
    /// Every call resolved, possibly empty.
    Ready,
    /// Settled, but its values are substituted with zero.
    Failed(String),
}

impl ReadStatus {
    /// Folds per-call states: any pending call keeps the slot pending, any
    /// failed call degrades it.
    pub fn from_calls<'a>(states: impl IntoIterator<Item = &'a CallState>) -> Self {
        let mut total = 0usize;
        let mut failed = 0usize;
        let mut first_failure = None;
        for state in states {
            total += 1;
            match state {
                CallState::Pending => return ReadStatus::Pending,
                CallState::Failed(reason) => {
                    failed += 1;
                    first_failure.get_or_insert_with(|| reason.clone());
                }
                CallState::Empty | CallState::Value(_) => {}
            }
        }
        match first_failure {
            Some(reason) => ReadStatus::Failed(format!("{failed} of {total} calls failed: {reason}")),
            None => ReadStatus::Ready,
        }
    }

    /// Whether the slot is still outstanding.
    pub fn is_pending(&self) -> bool {
        matches!(self, ReadStatus::Pending)
    }
}

/// Tracks which reads are outstanding. Positions may only be built once the
/// barrier is settled, so every source reflects the same refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadBarrier {
    slots: BTreeMap<ReadSource, ReadStatus>,
}

impl ReadBarrier {
    /// A barrier with every source pending.
    pub fn new(sources: impl IntoIterator<Item = ReadSource>) -> Self {
        Self {
            slots: sources
                .into_iter()
                .map(|source| (source, ReadStatus::Pending))
                .collect(),
        }
    }

    /// A barrier with nothing to wait on.
    pub fn settled() -> Self {
        Self::default()
    }

    /// Records the status of `source`, replacing any earlier one.
    pub fn settle(&mut self, source: ReadSource, status: ReadStatus) {
        self.slots.insert(source, status);
    }

    /// Current status of `source`, if the barrier tracks it.
    pub fn status(&self, source: ReadSource) -> Option<&ReadStatus> {
        self.slots.get(&source)
    }

    /// True once no slot is pending.
    pub fn is_settled(&self) -> bool {
        !self.slots.values().any(ReadStatus::is_pending)
    }

    /// Sources still outstanding.
    pub fn pending(&self) -> Vec<ReadSource> {
        self.slots
            .iter()
            .filter(|(_, status)| status.is_pending())
            .map(|(source, _)| *source)
            .collect()
    }

    /// Sources that settled as failures, with their reasons.
    pub fn degraded(&self) -> Vec<(ReadSource, &str)> {
        self.slots
            .iter()
            .filter_map(|(source, status)| match status {
                ReadStatus::Failed(reason) => Some((*source, reason.as_str())),
                _ => None,
            })
            .collect()
    }
}
