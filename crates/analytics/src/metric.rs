//! Metric selection for ranking and banding.

use pool_metrics_core::PoolRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A rankable numeric pool metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    TvlUsd,
    Apy,
    ApyBase,
    ApyReward,
    VolumeUsd1d,
    VolumeUsd7d,
}

impl Metric {
    /// Reads this metric's value from a record, `None` when absent.
    #[must_use]
    pub fn value_of(self, record: &PoolRecord) -> Option<Decimal> {
        match self {
            Self::TvlUsd => record.tvl_usd,
            Self::Apy => record.apy,
            Self::ApyBase => record.apy_base,
            Self::ApyReward => record.apy_reward,
            Self::VolumeUsd1d => record.volume_usd_1d,
            Self::VolumeUsd7d => record.volume_usd_7d,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TvlUsd => "tvlUsd",
            Self::Apy => "apy",
            Self::ApyBase => "apyBase",
            Self::ApyReward => "apyReward",
            Self::VolumeUsd1d => "volumeUsd1d",
            Self::VolumeUsd7d => "volumeUsd7d",
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tvlUsd" | "tvl" => Ok(Self::TvlUsd),
            "apy" => Ok(Self::Apy),
            "apyBase" => Ok(Self::ApyBase),
            "apyReward" => Ok(Self::ApyReward),
            "volumeUsd1d" | "volume1d" => Ok(Self::VolumeUsd1d),
            "volumeUsd7d" | "volume7d" => Ok(Self::VolumeUsd7d),
            other => Err(format!("unknown metric: {other}")),
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_value_of_reads_optional_fields() {
        let mut record =
            PoolRecord::new("Ethereum".into(), "uniswap-v3".into(), "USDC-DAI".into());
        record.tvl_usd = Some(dec!(1000));

        assert_eq!(Metric::TvlUsd.value_of(&record), Some(dec!(1000)));
        assert_eq!(Metric::Apy.value_of(&record), None);
    }

    #[test]
    fn test_from_str_accepts_feed_column_names() {
        assert_eq!("tvlUsd".parse::<Metric>().unwrap(), Metric::TvlUsd);
        assert_eq!("volumeUsd7d".parse::<Metric>().unwrap(), Metric::VolumeUsd7d);
        assert!("liquidity".parse::<Metric>().is_err());
    }
}
