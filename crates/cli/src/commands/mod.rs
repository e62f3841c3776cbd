//! CLI commands for the pool metrics store.

pub mod clean;
pub mod compare;
pub mod fetch;
pub mod ingest;
pub mod percentile;
pub mod query;
pub mod stats;
pub mod top;

pub use clean::{run_clean, CleanArgs};
pub use compare::{run_compare, CompareArgs};
pub use fetch::{run_fetch, FetchArgs};
pub use ingest::{run_ingest, IngestArgs};
pub use percentile::{run_percentile, PercentileArgs};
pub use query::{run_query, QueryArgs};
pub use stats::{run_stats, StatsArgs};
pub use top::{run_top, TopArgs};

use anyhow::{Context, Result};
use clap::Args;
use pool_metrics_core::{AppConfig, PoolQueryCriteria, PoolRecord, StoreConfig, VolumePeriod};
use pool_metrics_store::{MemoryStore, PoolRepository};
use rust_decimal::Decimal;

/// Filter flags shared by every read command.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Minimum TVL in USD
    #[arg(long)]
    pub min_tvl: Option<Decimal>,

    /// Maximum TVL in USD
    #[arg(long)]
    pub max_tvl: Option<Decimal>,

    /// Minimum APY in percentage points
    #[arg(long)]
    pub min_apy: Option<Decimal>,

    /// Maximum APY in percentage points
    #[arg(long)]
    pub max_apy: Option<Decimal>,

    /// Minimum trading volume in USD for the selected period
    #[arg(long)]
    pub min_volume: Option<Decimal>,

    /// Maximum trading volume in USD for the selected period
    #[arg(long)]
    pub max_volume: Option<Decimal>,

    /// Volume window the volume bounds apply to (1d or 7d)
    #[arg(long, default_value = "1d")]
    pub volume_period: VolumePeriod,

    /// Chain to include (repeat for several)
    #[arg(long = "chain")]
    pub chains: Vec<String>,

    /// Project to include (repeat for several)
    #[arg(long = "project")]
    pub projects: Vec<String>,

    /// Only stablecoin pools
    #[arg(long)]
    pub stablecoin_only: bool,

    /// Accepted for interface parity; the store grammar cannot express it,
    /// so it currently has no effect on results
    #[arg(long)]
    pub exclude_outliers: bool,
}

impl FilterArgs {
    pub fn to_criteria(&self) -> PoolQueryCriteria {
        PoolQueryCriteria {
            min_tvl: self.min_tvl,
            max_tvl: self.max_tvl,
            min_apy: self.min_apy,
            max_apy: self.max_apy,
            min_volume: self.min_volume,
            max_volume: self.max_volume,
            volume_period: self.volume_period,
            chains: self.chains.clone(),
            projects: self.projects.clone(),
            stablecoin_only: self.stablecoin_only,
            exclude_outliers: self.exclude_outliers,
        }
    }
}

/// Resolves the snapshot path: explicit flag first, configured path otherwise.
pub(crate) fn data_path(flag: Option<String>, config: &AppConfig) -> String {
    flag.unwrap_or_else(|| config.ingest.csv_path.clone())
}

/// Loads a CSV snapshot into a fresh in-memory store.
///
/// Batch size and entity lifetime come from the store configuration.
pub(crate) async fn seed_repository(
    data: &str,
    store: &StoreConfig,
) -> Result<PoolRepository<MemoryStore>> {
    let records = pool_metrics_ingest::load_pools_csv(data)
        .with_context(|| format!("failed to load pool snapshot from {data}"))?;

    let repo = PoolRepository::new(MemoryStore::new())
        .with_batch_size(store.batch_size)
        .with_btl(store.btl);
    let keys = repo.create_pools(&records).await?;
    tracing::info!(pools = keys.len(), "seeded in-memory store");
    Ok(repo)
}

/// Fetches the matching records for a set of filter flags.
pub(crate) async fn fetch_matching(
    data: &str,
    store: &StoreConfig,
    filters: &FilterArgs,
) -> Result<Vec<PoolRecord>> {
    let repo = seed_repository(data, store).await?;
    let pools = repo.query_pools(&filters.to_criteria()).await?;
    Ok(pools.into_iter().map(|p| p.record).collect())
}

pub(crate) fn print_pool_table(records: &[PoolRecord]) {
    println!(
        "{:<12} {:<20} {:<16} {:>18} {:>10} {:>8}",
        "CHAIN", "PROJECT", "SYMBOL", "TVL (USD)", "APY (%)", "STABLE"
    );
    for record in records {
        println!(
            "{:<12} {:<20} {:<16} {:>18} {:>10} {:>8}",
            record.chain,
            record.project,
            record.symbol,
            record
                .tvl_usd
                .map_or_else(|| "-".to_string(), |v| v.round_dp(2).to_string()),
            record
                .apy
                .map_or_else(|| "-".to_string(), |v| v.round_dp(4).to_string()),
            if record.stablecoin { "yes" } else { "no" },
        );
    }
    println!("({} pools)", records.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_path_prefers_flag_over_configured_default() {
        let config = AppConfig::default();
        assert_eq!(data_path(None, &config), config.ingest.csv_path);
        assert_eq!(
            data_path(Some("snapshots/other.csv".into()), &config),
            "snapshots/other.csv"
        );
    }
}
