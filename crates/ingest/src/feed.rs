//! Yields feed client.
//!
//! Fetches the full pool list from the public yields aggregator
//! (`https://yields.llama.fi/pools`) and maps it into [`PoolRecord`]s with
//! the same absent-field discipline as the CSV path: JSON `null` and
//! non-finite numbers become `None`, never zero.

use crate::csv_loader::IngestError;
use chrono::Utc;
use pool_metrics_core::PoolRecord;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct FeedResponse {
    status: Option<String>,
    data: Vec<FeedPool>,
}

#[derive(Debug, Deserialize)]
struct FeedPool {
    pool: String,
    chain: String,
    project: String,
    symbol: String,
    #[serde(rename = "tvlUsd")]
    tvl_usd: Option<f64>,
    apy: Option<f64>,
    #[serde(rename = "apyBase")]
    apy_base: Option<f64>,
    #[serde(rename = "apyReward")]
    apy_reward: Option<f64>,
    #[serde(rename = "volumeUsd1d")]
    volume_usd_1d: Option<f64>,
    #[serde(rename = "volumeUsd7d")]
    volume_usd_7d: Option<f64>,
    count: Option<f64>,
    #[serde(default)]
    stablecoin: bool,
    #[serde(default)]
    outlier: bool,
}

impl FeedPool {
    fn into_record(self) -> PoolRecord {
        let now = Utc::now();
        PoolRecord {
            pool_id: self.pool,
            chain: self.chain,
            project: self.project,
            symbol: self.symbol,
            stablecoin: self.stablecoin,
            outlier: self.outlier,
            tvl_usd: to_decimal(self.tvl_usd),
            apy: to_decimal(self.apy),
            apy_base: to_decimal(self.apy_base),
            apy_reward: to_decimal(self.apy_reward),
            volume_usd_1d: to_decimal(self.volume_usd_1d),
            volume_usd_7d: to_decimal(self.volume_usd_7d),
            count: self
                .count
                .filter(|c| c.is_finite() && *c >= 0.0)
                .map(|c| c as u32),
            created_at: now,
            updated_at: now,
        }
    }
}

fn to_decimal(value: Option<f64>) -> Option<Decimal> {
    // Decimal::from_f64 already rejects NaN and infinities.
    value.and_then(Decimal::from_f64)
}

/// HTTP client for the yields feed.
pub struct YieldsFeedClient {
    http: reqwest::Client,
    pools_url: String,
}

impl YieldsFeedClient {
    #[must_use]
    pub fn new(pools_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            pools_url,
        }
    }

    /// Fetches every pool the feed currently tracks.
    ///
    /// # Errors
    /// Returns an error on transport failure, a non-success HTTP status, or
    /// a payload that does not match the feed schema.
    pub async fn fetch_pools(&self) -> Result<Vec<PoolRecord>, IngestError> {
        let response = self
            .http
            .get(&self.pools_url)
            .send()
            .await?
            .error_for_status()?;

        let body: FeedResponse = response.json().await?;
        if let Some(status) = &body.status {
            if status != "success" {
                return Err(IngestError::Feed(format!("feed status: {status}")));
            }
        }

        tracing::info!(count = body.data.len(), "fetched pools from yields feed");
        Ok(body.data.into_iter().map(FeedPool::into_record).collect())
    }
}
