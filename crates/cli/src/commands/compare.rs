//! Compare command: protocol-by-chain breakdown.

use crate::commands::{data_path, fetch_matching, FilterArgs};
use anyhow::Result;
use clap::Args;
use pool_metrics_analytics::{best_per_chain, compare_across_chains, Metric};
use pool_metrics_core::ConfigLoader;

/// Arguments for the compare command.
#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    /// CSV snapshot to query (defaults to the configured snapshot path)
    #[arg(short, long)]
    pub data: Option<String>,

    /// Protocol to compare (repeat for several)
    #[arg(long = "protocol", required = true)]
    pub protocols: Vec<String>,

    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Runs the compare command.
///
/// Protocols with no matching pools still appear, with an empty breakdown.
///
/// # Errors
/// Returns an error if loading, storing, or querying fails.
pub async fn run_compare(args: CompareArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let data = data_path(args.data, &config);

    let records = fetch_matching(&data, &config.store, &args.filters).await?;
    let comparison = compare_across_chains(&records, &args.protocols);

    for protocol in &comparison {
        println!("\n{}", protocol.project);
        if protocol.chains.is_empty() {
            println!("  (no matching pools)");
            continue;
        }

        let protocol_records: Vec<_> = records
            .iter()
            .filter(|r| r.project == protocol.project)
            .cloned()
            .collect();
        let flagships = best_per_chain(&protocol_records, Metric::TvlUsd);

        for (chain, breakdown) in &protocol.chains {
            let flagship = flagships
                .get(chain)
                .map_or_else(|| "-".to_string(), |p| p.symbol.clone());
            println!(
                "  {:<14} pools={:<5} tvl=${:<18} mean_apy={:<10} flagship={}",
                chain,
                breakdown.pool_count,
                breakdown.total_tvl_usd.round_dp(2),
                format!("{}%", breakdown.mean_apy.round_dp(4)),
                flagship,
            );
        }
    }
    Ok(())
}
