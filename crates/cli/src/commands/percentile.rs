//! Percentile command: pools at or above a metric percentile.

use crate::commands::{data_path, fetch_matching, print_pool_table, FilterArgs};
use anyhow::Result;
use clap::Args;
use pool_metrics_analytics::{by_percentile, Metric};
use pool_metrics_core::ConfigLoader;

/// Arguments for the percentile command.
#[derive(Args, Debug, Clone)]
pub struct PercentileArgs {
    /// CSV snapshot to query (defaults to the configured snapshot path)
    #[arg(short, long)]
    pub data: Option<String>,

    /// Metric to band by
    #[arg(short, long, default_value = "tvlUsd")]
    pub metric: Metric,

    /// Percentile cut, 0..=100
    #[arg(short, long)]
    pub percentile: f64,

    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Runs the percentile command.
///
/// The cut is index-based and inclusive: ties at the threshold are all
/// returned, so the band can be larger than the nominal slice.
///
/// # Errors
/// Returns an error for a percentile outside [0, 100], or if loading,
/// storing, or querying fails.
pub async fn run_percentile(args: PercentileArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let data = data_path(args.data, &config);

    let records = fetch_matching(&data, &config.store, &args.filters).await?;
    let band = by_percentile(&records, args.metric, args.percentile)?;

    println!(
        "Pools at or above the {}th percentile of {}:",
        args.percentile, args.metric
    );
    print_pool_table(&band);
    Ok(())
}
