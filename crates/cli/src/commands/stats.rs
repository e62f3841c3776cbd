//! Stats command: aggregate statistics over the matching set.

use crate::commands::{data_path, fetch_matching, FilterArgs};
use anyhow::Result;
use clap::Args;
use pool_metrics_analytics::statistics;
use pool_metrics_core::ConfigLoader;

/// Arguments for the stats command.
#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    /// CSV snapshot to query (defaults to the configured snapshot path)
    #[arg(short, long)]
    pub data: Option<String>,

    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Runs the stats command.
///
/// # Errors
/// Returns an error if loading, storing, or querying fails.
pub async fn run_stats(args: StatsArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let data = data_path(args.data, &config);

    let records = fetch_matching(&data, &config.store, &args.filters).await?;
    let stats = statistics(&records);

    println!("Pools:          {}", stats.count);
    println!("Total TVL:      ${}", stats.total_tvl_usd.round_dp(2));
    println!(
        "Mean APY:       {}",
        stats
            .mean_apy
            .map_or_else(|| "undefined (no pools)".to_string(), |m| format!("{}%", m.round_dp(4)))
    );
    println!(
        "Stablecoin:     {}",
        stats
            .stablecoin_pct
            .map_or_else(|| "undefined (no pools)".to_string(), |p| format!("{}%", p.round_dp(2)))
    );

    println!("\nBy chain:");
    for (chain, count) in &stats.chains {
        println!("  {chain:<20} {count}");
    }
    println!("\nBy project:");
    for (project, count) in &stats.projects {
        println!("  {project:<20} {count}");
    }
    Ok(())
}
