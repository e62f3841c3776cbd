//! CSV ingestion.
//!
//! Reads pool snapshots from CSV exports of the yields feed. Column names
//! match the feed's field names (`tvlUsd`, `apyBase`, `volumeUsd1d`, ...);
//! extra columns are ignored. Cells are coerced here, not in the core:
//! blank and `NaN` numeric cells become `None` (never zero), and booleans
//! accept the `True`/`False` spelling pandas exports alongside the usual
//! forms.

use chrono::Utc;
use pool_metrics_core::PoolRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::File;
use std::path::Path;
use thiserror::Error;

/// Errors from CSV and feed ingestion.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed returned unexpected payload: {0}")]
    Feed(String),
}

/// One CSV row in feed column naming.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct PoolRow {
    #[serde(default)]
    pub pool: Option<String>,
    pub chain: String,
    pub project: String,
    pub symbol: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    #[serde(rename = "tvlUsd")]
    pub tvl_usd: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub apy: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    #[serde(rename = "apyBase")]
    pub apy_base: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    #[serde(rename = "apyReward")]
    pub apy_reward: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    #[serde(rename = "volumeUsd1d")]
    pub volume_usd_1d: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    #[serde(rename = "volumeUsd7d")]
    pub volume_usd_7d: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: Option<u32>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub stablecoin: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub outlier: bool,
}

impl PoolRow {
    pub(crate) fn into_record(self) -> PoolRecord {
        let now = Utc::now();
        PoolRecord {
            // The feed's own pool id is kept when present so re-ingestion
            // stays idempotent at the identity level.
            pool_id: self
                .pool
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            chain: self.chain,
            project: self.project,
            symbol: self.symbol,
            stablecoin: self.stablecoin,
            outlier: self.outlier,
            tvl_usd: self.tvl_usd,
            apy: self.apy,
            apy_base: self.apy_base,
            apy_reward: self.apy_reward,
            volume_usd_1d: self.volume_usd_1d,
            volume_usd_7d: self.volume_usd_7d,
            count: self.count,
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn from_record(record: &PoolRecord) -> Self {
        Self {
            pool: Some(record.pool_id.clone()),
            chain: record.chain.clone(),
            project: record.project.clone(),
            symbol: record.symbol.clone(),
            tvl_usd: record.tvl_usd,
            apy: record.apy,
            apy_base: record.apy_base,
            apy_reward: record.apy_reward,
            volume_usd_1d: record.volume_usd_1d,
            volume_usd_7d: record.volume_usd_7d,
            count: record.count,
            stablecoin: record.stablecoin,
            outlier: record.outlier,
        }
    }
}

fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
            None
        } else {
            trimmed.parse::<Decimal>().ok()
        }
    }))
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    // pandas writes nullable integer columns as floats ("292.0").
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
            None
        } else {
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u32)
        }
    }))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.is_some_and(|s| {
        matches!(s.trim(), "true" | "True" | "TRUE" | "1")
    }))
}

/// Loads pool records from a CSV file.
///
/// Rows that fail to parse are skipped with a warning rather than aborting
/// the whole file; feed exports routinely carry a few ragged rows.
///
/// # Errors
/// Returns an error if the file cannot be opened or the header is invalid.
pub fn load_pools_csv(path: impl AsRef<Path>) -> Result<Vec<PoolRecord>, IngestError> {
    let file = File::open(path.as_ref())?;
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

    let mut records = Vec::new();
    for (line, row) in reader.deserialize::<PoolRow>().enumerate() {
        match row {
            Ok(row) => records.push(row.into_record()),
            Err(e) => tracing::warn!(line = line + 2, error = %e, "skipping malformed CSV row"),
        }
    }

    tracing::info!(count = records.len(), "loaded pool records from CSV");
    Ok(records)
}

/// Writes pool records to a CSV file in feed column naming.
///
/// # Errors
/// Returns an error if the file cannot be created or a row fails to encode.
pub fn write_pools_csv(path: impl AsRef<Path>, records: &[PoolRecord]) -> Result<(), IngestError> {
    let file = File::create(path.as_ref())?;
    let mut writer = csv::Writer::from_writer(file);

    for record in records {
        writer.serialize(PoolRow::from_record(record))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn load_from_str(content: &str) -> Vec<PoolRecord> {
        let mut file = tempfile_path();
        write!(file.1, "{content}").unwrap();
        file.1.flush().unwrap();
        load_pools_csv(&file.0).unwrap()
    }

    fn tempfile_path() -> (std::path::PathBuf, File) {
        let path = std::env::temp_dir().join(format!(
            "pool-metrics-test-{}.csv",
            uuid::Uuid::new_v4()
        ));
        let file = File::create(&path).unwrap();
        (path, file)
    }

    const HEADER: &str = "pool,chain,project,symbol,tvlUsd,apy,apyBase,apyReward,volumeUsd1d,volumeUsd7d,count,stablecoin,outlier\n";

    #[test]
    fn test_load_typed_row() {
        let records = load_from_str(&format!(
            "{HEADER}abc-123,Ethereum,uniswap-v3,USDC-DAI,1000000.50,4.2,3.1,1.1,50000,350000,292.0,True,False\n"
        ));
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.pool_id, "abc-123");
        assert_eq!(r.tvl_usd, Some(dec!(1000000.50)));
        assert_eq!(r.apy, Some(dec!(4.2)));
        assert_eq!(r.count, Some(292));
        assert!(r.stablecoin);
        assert!(!r.outlier);
    }

    #[test]
    fn test_blank_and_nan_cells_become_absent() {
        let records = load_from_str(&format!(
            "{HEADER},Solana,raydium-amm,SOL-USDC,,NaN,,,,,,false,\n"
        ));
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.tvl_usd, None);
        assert_eq!(r.apy, None);
        assert_eq!(r.count, None);
        assert!(!r.stablecoin);
        assert!(!r.pool_id.is_empty());
    }

    #[test]
    fn test_extra_columns_ignored() {
        let records = load_from_str(
            "chain,project,symbol,tvlUsd,ilRisk,exposure,stablecoin\nEthereum,curve-dex,3pool,500,no,single,true\n",
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tvl_usd, Some(dec!(500)));
        assert!(records[0].stablecoin);
    }

    #[test]
    fn test_round_trip_write_then_load() {
        let mut record =
            PoolRecord::new("Ethereum".into(), "uniswap-v3".into(), "WETH-USDC".into());
        record.tvl_usd = Some(dec!(123.45));
        record.stablecoin = true;

        let (path, _file) = tempfile_path();
        write_pools_csv(&path, std::slice::from_ref(&record)).unwrap();
        let loaded = load_pools_csv(&path).unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].pool_id, record.pool_id);
        assert_eq!(loaded[0].tvl_usd, Some(dec!(123.45)));
        assert!(loaded[0].stablecoin);
    }
}
