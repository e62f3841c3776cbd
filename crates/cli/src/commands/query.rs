//! Query command: advanced filter against the stored set.

use crate::commands::{data_path, fetch_matching, print_pool_table, FilterArgs};
use anyhow::Result;
use clap::Args;
use pool_metrics_core::ConfigLoader;

/// Arguments for the query command.
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// CSV snapshot to query (defaults to the configured snapshot path)
    #[arg(short, long)]
    pub data: Option<String>,

    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Runs the query command.
///
/// # Errors
/// Returns an error if loading, storing, or querying fails.
pub async fn run_query(args: QueryArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let data = data_path(args.data, &config);

    let records = fetch_matching(&data, &config.store, &args.filters).await?;
    print_pool_table(&records);
    Ok(())
}
