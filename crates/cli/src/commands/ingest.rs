//! Ingest command: CSV snapshot -> store, in sequential batches.

use crate::commands::data_path;
use anyhow::{Context, Result};
use clap::Args;
use pool_metrics_core::ConfigLoader;
use pool_metrics_ingest::load_pools_csv;
use pool_metrics_store::{MemoryStore, PoolRepository};

/// Arguments for the ingest command.
#[derive(Args, Debug, Clone)]
pub struct IngestArgs {
    /// CSV snapshot to ingest (defaults to the configured snapshot path)
    #[arg(short, long)]
    pub data: Option<String>,

    /// Entities per store call (defaults to the configured batch size)
    #[arg(long)]
    pub batch_size: Option<usize>,
}

/// Runs the ingest command.
///
/// # Errors
/// Returns an error if loading or any batch write fails. Batches already
/// written before a failure stay written.
pub async fn run_ingest(args: IngestArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let data = data_path(args.data, &config);
    let batch_size = args.batch_size.unwrap_or(config.store.batch_size);

    let records = load_pools_csv(&data)
        .with_context(|| format!("failed to load pool snapshot from {data}"))?;

    let repo = PoolRepository::new(MemoryStore::new())
        .with_batch_size(batch_size)
        .with_btl(config.store.btl);
    let keys = repo.create_pools(&records).await?;

    println!("Ingested {} pools from {data}", keys.len());
    Ok(())
}
