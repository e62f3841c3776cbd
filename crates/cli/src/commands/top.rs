//! Top command: highest pools by a metric.

use crate::commands::{data_path, fetch_matching, print_pool_table, FilterArgs};
use anyhow::Result;
use clap::Args;
use pool_metrics_analytics::{top_n_by_metric, Metric};
use pool_metrics_core::ConfigLoader;

/// Arguments for the top command.
#[derive(Args, Debug, Clone)]
pub struct TopArgs {
    /// CSV snapshot to query (defaults to the configured snapshot path)
    #[arg(short, long)]
    pub data: Option<String>,

    /// Metric to rank by (tvlUsd, apy, apyBase, apyReward, volumeUsd1d, volumeUsd7d)
    #[arg(short, long, default_value = "tvlUsd")]
    pub metric: Metric,

    /// How many pools to show
    #[arg(short, long, default_value_t = 10)]
    pub n: usize,

    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Runs the top command.
///
/// Pools without the metric, or with a zero or negative value, are excluded
/// from the ranking entirely.
///
/// # Errors
/// Returns an error if loading, storing, or querying fails.
pub async fn run_top(args: TopArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let data = data_path(args.data, &config);

    let records = fetch_matching(&data, &config.store, &args.filters).await?;
    let top = top_n_by_metric(&records, args.metric, args.n);

    println!("Top {} pools by {}:", top.len(), args.metric);
    print_pool_table(&top);
    Ok(())
}
