//! Clean command: bulk delete by query.

use crate::commands::{data_path, seed_repository, FilterArgs};
use anyhow::Result;
use clap::Args;
use pool_metrics_core::ConfigLoader;

/// Arguments for the clean command.
#[derive(Args, Debug, Clone)]
pub struct CleanArgs {
    /// CSV snapshot to seed the store from (defaults to the configured
    /// snapshot path)
    #[arg(short, long)]
    pub data: Option<String>,

    /// Entities per delete call (defaults to the configured batch size)
    #[arg(long)]
    pub batch_size: Option<usize>,

    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Runs the clean command.
///
/// Deletes run in sequential batches; a failing batch stops the loop with
/// earlier batches already removed.
///
/// # Errors
/// Returns an error if loading, querying, or any delete batch fails.
pub async fn run_clean(args: CleanArgs) -> Result<()> {
    let mut config = ConfigLoader::load()?;
    if let Some(batch_size) = args.batch_size {
        config.store.batch_size = batch_size;
    }
    let data = data_path(args.data, &config);

    let repo = seed_repository(&data, &config.store).await?;

    let deleted = repo.delete_pools(&args.filters.to_criteria()).await?;
    println!("Deleted {deleted} pools");
    Ok(())
}
