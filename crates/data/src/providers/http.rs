use crate::{DataError, MetricsByPool, MetricsProvider};
use async_trait::async_trait;
use farmview_domain::entities::PoolMetrics;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for the HTTP metrics provider.
#[derive(Debug, Clone)]
pub struct HttpMetricsConfig {
    /// Service root, e.g. `https://wire2.gamma.xyz`.
    pub base_url: String,
    /// Path segment per chain id, e.g. `quickswap/polygon`.
    pub chain_paths: HashMap<u64, String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpMetricsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://wire2.gamma.xyz".to_string(),
            chain_paths: HashMap::new(),
            timeout_secs: 30,
        }
    }
}

/// The service publishes figures as strings, some deployments as numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Figure {
    Text(String),
    Number(serde_json::Number),
}

impl Figure {
    fn as_text(&self) -> String {
        match self {
            Figure::Text(s) => s.clone(),
            Figure::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PoolEntry {
    #[serde(rename = "tvlUSD")]
    tvl_usd: Option<Figure>,
    #[serde(rename = "totalSupply")]
    total_supply: Option<Figure>,
}

/// Fetches `<base_url>/<chain path>/hypervisors/allData`.
pub struct HttpMetricsProvider {
    client: reqwest::Client,
    config: HttpMetricsConfig,
}

impl HttpMetricsProvider {
    /// Creates a new provider.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: HttpMetricsConfig) -> Result<Self, DataError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn url(&self, chain_id: u64) -> Result<String, DataError> {
        let path = self
            .config
            .chain_paths
            .get(&chain_id)
            .ok_or(DataError::UnknownChain(chain_id))?;
        Ok(format!(
            "{}/{}/hypervisors/allData",
            self.config.base_url.trim_end_matches('/'),
            path.trim_matches('/')
        ))
    }
}

/// Converts the raw service payload, skipping entries that do not parse.
fn parse_entries(entries: HashMap<String, serde_json::Value>) -> MetricsByPool {
    let mut metrics = MetricsByPool::with_capacity(entries.len());
    for (address, value) in entries {
        let entry: PoolEntry = match serde_json::from_value(value) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(pool = %address, error = %e, "Skipping malformed pool entry");
                continue;
            }
        };
        let (Some(tvl), Some(supply)) = (entry.tvl_usd, entry.total_supply) else {
            debug!(pool = %address, "Pool entry without TVL or supply");
            continue;
        };
        match PoolMetrics::parse(&address, &tvl.as_text(), &supply.as_text()) {
            Ok(m) => {
                metrics.insert(m.pool_address.clone(), m);
            }
            Err(e) => warn!(pool = %address, error = %e, "Skipping unparsable pool metrics"),
        }
    }
    metrics
}

#[async_trait]
impl MetricsProvider for HttpMetricsProvider {
    async fn fetch_pool_metrics(&self, chain_id: u64) -> Result<MetricsByPool, DataError> {
        let url = self.url(chain_id)?;
        let entries: HashMap<String, serde_json::Value> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let metrics = parse_entries(entries);
        info!(chain_id, pools = metrics.len(), "Fetched pool metrics");
        Ok(metrics)
    }
}
