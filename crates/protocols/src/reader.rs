//! Batched read abstraction.

use crate::call::{Call, CallState, ContractCall};
use async_trait::async_trait;
use farmview_domain::value_objects::Address;

/// Evaluates read-only contract calls in batches.
///
/// Implementations return exactly one state per call, in call order. Failures
/// are reported per call as `CallState::Failed` rather than as an error, so a
/// caller always gets a full set of results to join on.
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn call_many(&self, chain_id: u64, calls: Vec<Call>) -> Vec<CallState>;

    /// The same function evaluated on every contract in `contracts`.
    async fn call_each(
        &self,
        chain_id: u64,
        contracts: &[Address],
        call: ContractCall,
    ) -> Vec<CallState> {
        let calls = contracts
            .iter()
            .map(|contract| Call::new(*contract, call))
            .collect();
        self.call_many(chain_id, calls).await
    }

    /// Several argument sets evaluated on one contract.
    async fn call_contract(
        &self,
        chain_id: u64,
        contract: Address,
        calls: Vec<ContractCall>,
    ) -> Vec<CallState> {
        let calls = calls
            .into_iter()
            .map(|call| Call::new(contract, call))
            .collect();
        self.call_many(chain_id, calls).await
    }
}
