use clap::{Parser, Subcommand};

mod commands;

use commands::{
    CleanArgs, CompareArgs, FetchArgs, IngestArgs, PercentileArgs, QueryArgs, StatsArgs, TopArgs,
};

#[derive(Parser)]
#[command(name = "pool-metrics")]
#[command(about = "DeFi liquidity-pool metrics: ingest, query, and analyze", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the current pool list from the yields feed into a CSV snapshot
    Fetch(FetchArgs),
    /// Load a CSV snapshot into the store in sequential batches
    Ingest(IngestArgs),
    /// Run an advanced filter query against the stored pools
    Query(QueryArgs),
    /// Show the top pools by a metric
    Top(TopArgs),
    /// Show pools at or above a metric percentile
    Percentile(PercentileArgs),
    /// Show aggregate statistics over the matching pools
    Stats(StatsArgs),
    /// Compare protocols chain by chain
    Compare(CompareArgs),
    /// Bulk-delete pools matching a filter
    Clean(CleanArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Fetch(args) => commands::run_fetch(args).await?,
        Commands::Ingest(args) => commands::run_ingest(args).await?,
        Commands::Query(args) => commands::run_query(args).await?,
        Commands::Top(args) => commands::run_top(args).await?,
        Commands::Percentile(args) => commands::run_percentile(args).await?,
        Commands::Stats(args) => commands::run_stats(args).await?,
        Commands::Compare(args) => commands::run_compare(args).await?,
        Commands::Clean(args) => commands::run_clean(args).await?,
    }

    Ok(())
}
