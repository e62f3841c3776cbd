//! Liquidity pool data model.
//!
//! A `PoolRecord` is one pool's metrics snapshot as ingested from the yields
//! feed or a CSV export. Every numeric field is optional: the backing store
//! distinguishes "field absent" from "field zero", and that distinction is
//! preserved all the way through encoding and aggregation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A snapshot of one liquidity pool's metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolRecord {
    /// Opaque unique id, assigned once at creation and immutable thereafter.
    pub pool_id: String,
    /// Blockchain network name (e.g., "Ethereum", "Solana").
    pub chain: String,
    /// Protocol name (e.g., "uniswap-v3", "curve-dex").
    pub project: String,
    /// Token-pair label (e.g., "USDC-DAI").
    pub symbol: String,
    /// Whether the pool holds only stablecoins.
    pub stablecoin: bool,
    /// Statistical-anomaly flag set by an upstream process.
    pub outlier: bool,
    /// Total value locked in USD.
    pub tvl_usd: Option<Decimal>,
    /// Annual percentage yield, in percentage points.
    pub apy: Option<Decimal>,
    /// Base (fee-derived) component of the APY.
    pub apy_base: Option<Decimal>,
    /// Reward (incentive-derived) component of the APY.
    pub apy_reward: Option<Decimal>,
    /// Trailing 1-day trading volume in USD.
    pub volume_usd_1d: Option<Decimal>,
    /// Trailing 7-day trading volume in USD.
    pub volume_usd_7d: Option<Decimal>,
    /// Number of historical observations backing the metrics.
    pub count: Option<u32>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last-update instant.
    pub updated_at: DateTime<Utc>,
}

impl PoolRecord {
    /// Creates a new record with a fresh `pool_id` and no metrics.
    pub fn new(chain: String, project: String, symbol: String) -> Self {
        let now = Utc::now();
        Self {
            pool_id: uuid::Uuid::new_v4().to_string(),
            chain,
            project,
            symbol,
            stablecoin: false,
            outlier: false,
            tvl_usd: None,
            apy: None,
            apy_base: None,
            apy_reward: None,
            volume_usd_1d: None,
            volume_usd_7d: None,
            count: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Adds the economics fields.
    #[must_use]
    pub fn with_economics(
        mut self,
        tvl_usd: Option<Decimal>,
        apy: Option<Decimal>,
        volume_usd_1d: Option<Decimal>,
        volume_usd_7d: Option<Decimal>,
    ) -> Self {
        self.tvl_usd = tvl_usd;
        self.apy = apy;
        self.volume_usd_1d = volume_usd_1d;
        self.volume_usd_7d = volume_usd_7d;
        self
    }

    /// Adds the classification flags.
    #[must_use]
    pub fn with_flags(mut self, stablecoin: bool, outlier: bool) -> Self {
        self.stablecoin = stablecoin;
        self.outlier = outlier;
        self
    }

    /// Merges a patch into this record, bumping `updated_at`.
    ///
    /// `pool_id` and `created_at` are never touched; merging drives updates,
    /// where the store replaces the whole record rather than single fields.
    pub fn apply(&mut self, patch: PoolPatch) {
        if let Some(chain) = patch.chain {
            self.chain = chain;
        }
        if let Some(project) = patch.project {
            self.project = project;
        }
        if let Some(symbol) = patch.symbol {
            self.symbol = symbol;
        }
        if let Some(stablecoin) = patch.stablecoin {
            self.stablecoin = stablecoin;
        }
        if let Some(outlier) = patch.outlier {
            self.outlier = outlier;
        }
        if let Some(tvl_usd) = patch.tvl_usd {
            self.tvl_usd = Some(tvl_usd);
        }
        if let Some(apy) = patch.apy {
            self.apy = Some(apy);
        }
        if let Some(apy_base) = patch.apy_base {
            self.apy_base = Some(apy_base);
        }
        if let Some(apy_reward) = patch.apy_reward {
            self.apy_reward = Some(apy_reward);
        }
        if let Some(volume_usd_1d) = patch.volume_usd_1d {
            self.volume_usd_1d = Some(volume_usd_1d);
        }
        if let Some(volume_usd_7d) = patch.volume_usd_7d {
            self.volume_usd_7d = Some(volume_usd_7d);
        }
        if let Some(count) = patch.count {
            self.count = Some(count);
        }
        self.updated_at = Utc::now();
    }
}

/// A partial update to a [`PoolRecord`].
///
/// `None` fields are left as-is on merge; there is no way to delete a field
/// in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolPatch {
    pub chain: Option<String>,
    pub project: Option<String>,
    pub symbol: Option<String>,
    pub stablecoin: Option<bool>,
    pub outlier: Option<bool>,
    pub tvl_usd: Option<Decimal>,
    pub apy: Option<Decimal>,
    pub apy_base: Option<Decimal>,
    pub apy_reward: Option<Decimal>,
    pub volume_usd_1d: Option<Decimal>,
    pub volume_usd_7d: Option<Decimal>,
    pub count: Option<u32>,
}
