use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Block time-to-live applied to created entities.
    pub btl: u64,
    /// Entities per store call for bulk create/delete.
    pub batch_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    pub csv_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub pools_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            btl: 1_000_000,
            batch_size: 10,
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            csv_path: "data/pools.csv".to_string(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            pools_url: "https://yields.llama.fi/pools".to_string(),
        }
    }
}
