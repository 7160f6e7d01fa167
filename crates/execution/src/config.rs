//! Engine configuration.
//!
//! Loaded from a TOML file; endpoints can be overridden from the environment:
//! - `FARMVIEW_METRICS_URL` replaces `metrics_url`
//! - `FARMVIEW_RPC_URL_<chain id>` replaces that chain's `rpc_url`

use crate::error::EngineError;
use farmview_data::providers::HttpMetricsConfig;
use farmview_domain::entities::PoolDescriptor;
use farmview_domain::farm::FarmAvailability;
use farmview_domain::value_objects::Address;
use farmview_protocols::rpc::JsonRpcReaderConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Static configuration of one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain_id: u64,
    #[serde(default)]
    pub name: String,
    /// JSON-RPC endpoint.
    #[serde(default)]
    pub rpc_url: Option<String>,
    /// Path of this chain on the metrics service, e.g. `quickswap/polygon`.
    #[serde(default)]
    pub metrics_path: Option<String>,
    #[serde(default)]
    pub farm: FarmAvailability,
    /// Farm (staking) contracts, addressed by pool farm index.
    #[serde(default)]
    pub farm_contracts: Vec<Address>,
    #[serde(default)]
    pub pools: Vec<PoolDescriptor>,
}

impl ChainConfig {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            name: String::new(),
            rpc_url: None,
            metrics_path: None,
            farm: FarmAvailability::default(),
            farm_contracts: Vec::new(),
            pools: Vec::new(),
        }
    }
}

/// Configuration for the position engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seconds between timer-driven refreshes.
    pub refresh_interval_secs: u64,
    /// Decimals the metrics service uses for LP supply.
    pub metrics_supply_decimals: u32,
    /// Metrics service root URL.
    pub metrics_url: String,
    /// HTTP timeout for RPC and metrics requests in seconds.
    pub request_timeout_secs: u64,
    /// Maximum `eth_call`s per JSON-RPC batch.
    pub max_batch_size: usize,
    pub chains: Vec<ChainConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 300, // 5 minutes
            metrics_supply_decimals: 0,
            metrics_url: "https://wire2.gamma.xyz".to_string(),
            request_timeout_secs: 30,
            max_batch_size: 100,
            chains: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    /// Returns an error on malformed TOML or an invalid configuration.
    pub fn from_toml_str(content: &str) -> Result<Self, EngineError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a TOML file and applies environment overrides.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| EngineError::ReadConfig {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        info!(
            path = %path.display(),
            chains = config.chains.len(),
            "Loaded engine configuration"
        );
        Ok(config)
    }

    /// Applies overrides looked up by variable name.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("FARMVIEW_METRICS_URL") {
            self.metrics_url = url;
        }
        for chain in &mut self.chains {
            if let Some(url) = lookup(&format!("FARMVIEW_RPC_URL_{}", chain.chain_id)) {
                chain.rpc_url = Some(url);
            }
        }
    }

    /// Checks the interval, chain ids and farm references.
    ///
    /// # Errors
    /// Returns `InvalidConfig` describing the first problem found.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.refresh_interval_secs == 0 {
            return Err(EngineError::InvalidConfig(
                "refresh_interval_secs must be positive".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for chain in &self.chains {
            if !seen.insert(chain.chain_id) {
                return Err(EngineError::InvalidConfig(format!(
                    "chain {} is configured twice",
                    chain.chain_id
                )));
            }
            for pool in chain.pools.iter().filter(|p| p.pid.is_some()) {
                if pool.farm_index() >= chain.farm_contracts.len() {
                    return Err(EngineError::InvalidConfig(format!(
                        "pool {} on chain {} uses farm {} but only {} farm contracts are configured",
                        pool.address,
                        chain.chain_id,
                        pool.farm_index(),
                        chain.farm_contracts.len()
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn chain(&self, chain_id: u64) -> Option<&ChainConfig> {
        self.chains.iter().find(|c| c.chain_id == chain_id)
    }

    /// Looks up a chain, failing when it is not configured.
    ///
    /// # Errors
    /// Returns `UnknownChain`.
    pub fn require_chain(&self, chain_id: u64) -> Result<&ChainConfig, EngineError> {
        self.chain(chain_id).ok_or(EngineError::UnknownChain(chain_id))
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn rpc_reader_config(&self) -> JsonRpcReaderConfig {
        JsonRpcReaderConfig {
            endpoints: self
                .chains
                .iter()
                .filter_map(|c| c.rpc_url.clone().map(|url| (c.chain_id, url)))
                .collect(),
            max_batch_size: self.max_batch_size,
            timeout_secs: self.request_timeout_secs,
        }
    }

    pub fn metrics_config(&self) -> HttpMetricsConfig {
        HttpMetricsConfig {
            base_url: self.metrics_url.clone(),
            chain_paths: self
                .chains
                .iter()
                .filter_map(|c| c.metrics_path.clone().map(|path| (c.chain_id, path)))
                .collect(),
            timeout_secs: self.request_timeout_secs,
        }
    }
}
