//! Derivation of store annotations from a pool record.
//!
//! The store indexes entities by typed key/value annotations; the JSON
//! payload itself is opaque to it. This module maps a [`PoolRecord`] to the
//! annotation set used for querying. The mapping is lossy by design: rate
//! fields that encode to zero or negative are omitted entirely (see
//! [`crate::encoding::encode_positive_rate`]), and the boolean flags are
//! stored as `1`-or-absent.

use crate::encoding::{encode_positive_rate, encode_usd};
use crate::pool::PoolRecord;

/// Typed annotations for one stored entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationSet {
    pub strings: Vec<(String, String)>,
    pub numerics: Vec<(String, i64)>,
}

impl AnnotationSet {
    /// Derives the annotation set for a record.
    ///
    /// The `type` discriminator is not part of this set; the repository
    /// appends it at write time so every entity kind shares one convention.
    #[must_use]
    pub fn from_record(record: &PoolRecord) -> Self {
        let mut set = Self::default();

        set.push_str("pool_id", &record.pool_id);
        set.push_str("chain", &record.chain);
        set.push_str("project", &record.project);
        set.push_str("symbol", &record.symbol);

        if let Some(tvl) = record.tvl_usd {
            set.push_num("tvlUsd", encode_usd(tvl));
        }
        if let Some(bps) = encode_positive_rate(record.apy) {
            set.push_num("apy", bps);
        }
        if let Some(bps) = encode_positive_rate(record.apy_base) {
            set.push_num("apyBase", bps);
        }
        if let Some(bps) = encode_positive_rate(record.apy_reward) {
            set.push_num("apyReward", bps);
        }
        if let Some(volume) = record.volume_usd_1d {
            set.push_num("volumeUsd1d", encode_usd(volume));
        }
        if let Some(volume) = record.volume_usd_7d {
            set.push_num("volumeUsd7d", encode_usd(volume));
        }
        if let Some(count) = record.count {
            set.push_num("count", i64::from(count));
        }
        if record.stablecoin {
            set.push_num("stablecoin", 1);
        }
        if record.outlier {
            set.push_num("outlier", 1);
        }

        set
    }

    /// Looks up a numeric annotation by key.
    #[must_use]
    pub fn numeric(&self, key: &str) -> Option<i64> {
        self.numerics
            .iter()
            .find(|(k, _)| k == key)
            .map(|&(_, v)| v)
    }

    /// Looks up a string annotation by key.
    #[must_use]
    pub fn string(&self, key: &str) -> Option<&str> {
        self.strings
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn push_str(&mut self, key: &str, value: &str) {
        self.strings.push((key.to_string(), value.to_string()));
    }

    pub fn push_num(&mut self, key: &str, value: i64) {
        self.numerics.push((key.to_string(), value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_record() -> PoolRecord {
        PoolRecord::new("Ethereum".into(), "uniswap-v3".into(), "USDC-DAI".into())
    }

    #[test]
    fn test_identity_stored_as_strings() {
        let record = base_record();
        let set = AnnotationSet::from_record(&record);
        assert_eq!(set.string("chain"), Some("Ethereum"));
        assert_eq!(set.string("project"), Some("uniswap-v3"));
        assert_eq!(set.string("pool_id"), Some(record.pool_id.as_str()));
    }

    #[test]
    fn test_usd_fields_encoded_as_cents() {
        let record = base_record().with_economics(
            Some(dec!(1_000_000)),
            None,
            Some(dec!(50_000.50)),
            None,
        );
        let set = AnnotationSet::from_record(&record);
        assert_eq!(set.numeric("tvlUsd"), Some(100_000_000));
        assert_eq!(set.numeric("volumeUsd1d"), Some(5_000_050));
        assert_eq!(set.numeric("volumeUsd7d"), None);
    }

    #[test]
    fn test_zero_apy_indistinguishable_from_absent() {
        let mut with_zero = base_record();
        with_zero.apy = Some(dec!(0));
        with_zero.pool_id = "fixed".into();

        let mut absent = base_record();
        absent.apy = None;
        absent.pool_id = "fixed".into();

        let a = AnnotationSet::from_record(&with_zero);
        let b = AnnotationSet::from_record(&absent);
        assert_eq!(a.numerics, b.numerics);
        assert_eq!(a.numeric("apy"), None);
    }

    #[test]
    fn test_negative_reward_apy_omitted() {
        let mut record = base_record();
        record.apy = Some(dec!(3.5));
        record.apy_reward = Some(dec!(-0.8));
        let set = AnnotationSet::from_record(&record);
        assert_eq!(set.numeric("apy"), Some(35_000));
        assert_eq!(set.numeric("apyReward"), None);
    }

    #[test]
    fn test_flags_stored_as_one_or_absent() {
        let flagged = base_record().with_flags(true, true);
        let set = AnnotationSet::from_record(&flagged);
        assert_eq!(set.numeric("stablecoin"), Some(1));
        assert_eq!(set.numeric("outlier"), Some(1));

        let plain = base_record();
        let set = AnnotationSet::from_record(&plain);
        assert_eq!(set.numeric("stablecoin"), None);
        assert_eq!(set.numeric("outlier"), None);
    }
}
