//! Fetch command: yields feed -> CSV snapshot.

use anyhow::Result;
use clap::Args;
use pool_metrics_core::ConfigLoader;
use pool_metrics_ingest::{write_pools_csv, YieldsFeedClient};

/// Arguments for the fetch command.
#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Output CSV file path (defaults to the configured snapshot path)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Feed URL override (defaults to the configured pools endpoint)
    #[arg(long)]
    pub url: Option<String>,
}

/// Runs the fetch command.
///
/// # Errors
/// Returns an error if the feed request or the CSV write fails.
pub async fn run_fetch(args: FetchArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let url = args.url.unwrap_or(config.feed.pools_url);
    let output = args.output.unwrap_or(config.ingest.csv_path);

    let client = YieldsFeedClient::new(url);
    let records = client.fetch_pools().await?;

    if let Some(parent) = std::path::Path::new(&output).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    write_pools_csv(&output, &records)?;

    println!("Wrote {} pools to {}", records.len(), output);
    Ok(())
}
