//! Aggregate statistics and cross-protocol comparison.

use crate::metric::Metric;
use pool_metrics_core::PoolRecord;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate statistics over a set of pool records.
#[derive(Debug, Clone, Serialize)]
pub struct PoolStatistics {
    pub count: usize,
    /// Sum of all present TVL values.
    pub total_tvl_usd: Decimal,
    /// Arithmetic mean of APY over the FULL set: absent APYs contribute
    /// nothing to the numerator but still count in the denominator.
    /// `None` only for empty input, never defaulted to zero.
    pub mean_apy: Option<Decimal>,
    /// Pool count per chain.
    pub chains: BTreeMap<String, usize>,
    /// Pool count per project.
    pub projects: BTreeMap<String, usize>,
    /// Percentage of records flagged stablecoin. `None` for empty input.
    pub stablecoin_pct: Option<Decimal>,
}

/// Computes aggregate statistics over a record set.
///
/// Empty input is a defined edge case: `count` is 0 and both `mean_apy` and
/// `stablecoin_pct` are `None`.
#[must_use]
pub fn statistics(records: &[PoolRecord]) -> PoolStatistics {
    let count = records.len();

    let total_tvl_usd: Decimal = records.iter().filter_map(|r| r.tvl_usd).sum();
    let apy_sum: Decimal = records.iter().filter_map(|r| r.apy).sum();
    let stablecoin_count = records.iter().filter(|r| r.stablecoin).count();

    let mut chains: BTreeMap<String, usize> = BTreeMap::new();
    let mut projects: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        *chains.entry(record.chain.clone()).or_default() += 1;
        *projects.entry(record.project.clone()).or_default() += 1;
    }

    let (mean_apy, stablecoin_pct) = if count == 0 {
        (None, None)
    } else {
        let denominator = Decimal::from(count as u64);
        (
            Some(apy_sum / denominator),
            Some(Decimal::from(stablecoin_count as u64 * 100) / denominator),
        )
    };

    PoolStatistics {
        count,
        total_tvl_usd,
        mean_apy,
        chains,
        projects,
        stablecoin_pct,
    }
}

/// Per-chain aggregate for one protocol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainBreakdown {
    pub pool_count: usize,
    pub total_tvl_usd: Decimal,
    /// Sum of present APYs over the chain group's pool count.
    pub mean_apy: Decimal,
}

/// One protocol's chain-by-chain breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct ProtocolComparison {
    pub project: String,
    /// Keyed by chain name; empty when the protocol matched no records.
    pub chains: BTreeMap<String, ChainBreakdown>,
}

/// Compares the named protocols chain by chain.
///
/// Every requested protocol appears in the output, in request order;
/// protocols with no matching records get an empty chain table rather than
/// being dropped.
#[must_use]
pub fn compare_across_chains(
    records: &[PoolRecord],
    protocols: &[String],
) -> Vec<ProtocolComparison> {
    protocols
        .iter()
        .map(|project| {
            let mut chains: BTreeMap<String, ChainBreakdown> = BTreeMap::new();
            let mut apy_sums: BTreeMap<String, Decimal> = BTreeMap::new();

            for record in records.iter().filter(|r| &r.project == project) {
                let entry = chains
                    .entry(record.chain.clone())
                    .or_insert(ChainBreakdown {
                        pool_count: 0,
                        total_tvl_usd: Decimal::ZERO,
                        mean_apy: Decimal::ZERO,
                    });
                entry.pool_count += 1;
                if let Some(tvl) = record.tvl_usd {
                    entry.total_tvl_usd += tvl;
                }
                if let Some(apy) = record.apy {
                    *apy_sums.entry(record.chain.clone()).or_default() += apy;
                }
            }

            for (chain, breakdown) in &mut chains {
                let sum = apy_sums.get(chain).copied().unwrap_or(Decimal::ZERO);
                breakdown.mean_apy = sum / Decimal::from(breakdown.pool_count as u64);
            }

            ProtocolComparison {
                project: project.clone(),
                chains,
            }
        })
        .collect()
}

/// Convenience: the highest-valued record per chain for a metric.
///
/// Used by the comparison view to label each chain group with its flagship
/// pool.
#[must_use]
pub fn best_per_chain(records: &[PoolRecord], metric: Metric) -> BTreeMap<String, PoolRecord> {
    let mut best: BTreeMap<String, PoolRecord> = BTreeMap::new();
    for record in records {
        let Some(value) = metric.value_of(record) else {
            continue;
        };
        match best.get(&record.chain) {
            Some(current) if metric.value_of(current).is_some_and(|c| c >= value) => {}
            _ => {
                best.insert(record.chain.clone(), record.clone());
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pool(chain: &str, project: &str, tvl: Option<Decimal>, apy: Option<Decimal>, stable: bool) -> PoolRecord {
        let mut record = PoolRecord::new(chain.into(), project.into(), "PAIR".into());
        record.tvl_usd = tvl;
        record.apy = apy;
        record.stablecoin = stable;
        record
    }

    #[test]
    fn test_statistics_empty_input_is_undefined_not_zero() {
        let stats = statistics(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean_apy, None);
        assert_eq!(stats.stablecoin_pct, None);
        assert_eq!(stats.total_tvl_usd, Decimal::ZERO);
        assert!(stats.chains.is_empty());
    }

    #[test]
    fn test_mean_apy_uses_full_denominator() {
        // Two records with APY summing to 10, plus two without: the mean is
        // 10/4, not 10/2.
        let records = vec![
            pool("Ethereum", "uniswap-v3", None, Some(dec!(4)), false),
            pool("Ethereum", "uniswap-v3", None, Some(dec!(6)), false),
            pool("Solana", "raydium-amm", None, None, false),
            pool("Solana", "raydium-amm", None, None, false),
        ];
        let stats = statistics(&records);
        assert_eq!(stats.mean_apy, Some(dec!(2.5)));
    }

    #[test]
    fn test_statistics_frequency_and_stablecoin_pct() {
        let records = vec![
            pool("Ethereum", "curve-dex", Some(dec!(100)), None, true),
            pool("Ethereum", "uniswap-v3", Some(dec!(200)), None, false),
            pool("Solana", "raydium-amm", Some(dec!(300)), None, true),
            pool("Solana", "raydium-amm", None, None, true),
        ];
        let stats = statistics(&records);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.total_tvl_usd, dec!(600));
        assert_eq!(stats.chains.get("Ethereum"), Some(&2));
        assert_eq!(stats.chains.get("Solana"), Some(&2));
        assert_eq!(stats.projects.get("raydium-amm"), Some(&2));
        assert_eq!(stats.stablecoin_pct, Some(dec!(75)));
    }

    #[test]
    fn test_compare_groups_by_chain() {
        let records = vec![
            pool("Ethereum", "uniswap-v3", Some(dec!(100)), Some(dec!(2)), false),
            pool("Ethereum", "uniswap-v3", Some(dec!(300)), Some(dec!(4)), false),
            pool("Arbitrum", "uniswap-v3", Some(dec!(50)), Some(dec!(8)), false),
            pool("Ethereum", "curve-dex", Some(dec!(900)), None, true),
        ];

        let comparison =
            compare_across_chains(&records, &["uniswap-v3".to_string(), "curve-dex".to_string()]);
        assert_eq!(comparison.len(), 2);

        let uniswap = &comparison[0];
        assert_eq!(uniswap.project, "uniswap-v3");
        let eth = uniswap.chains.get("Ethereum").unwrap();
        assert_eq!(eth.pool_count, 2);
        assert_eq!(eth.total_tvl_usd, dec!(400));
        assert_eq!(eth.mean_apy, dec!(3));
        assert_eq!(uniswap.chains.get("Arbitrum").unwrap().pool_count, 1);

        // curve-dex has one Ethereum pool without an APY: mean is 0/1.
        let curve_eth = comparison[1].chains.get("Ethereum").unwrap();
        assert_eq!(curve_eth.mean_apy, Decimal::ZERO);
    }

    #[test]
    fn test_compare_keeps_unmatched_protocols() {
        let records = vec![pool("Ethereum", "uniswap-v3", None, None, false)];
        let comparison = compare_across_chains(&records, &["balancer-v3".to_string()]);
        assert_eq!(comparison.len(), 1);
        assert_eq!(comparison[0].project, "balancer-v3");
        assert!(comparison[0].chains.is_empty());
    }

    #[test]
    fn test_best_per_chain_exported_at_crate_root() {
        let records = vec![pool("Ethereum", "a", Some(dec!(10)), None, false)];
        let best = crate::best_per_chain(&records, Metric::TvlUsd);
        assert_eq!(best.get("Ethereum").unwrap().project, "a");
    }

    #[test]
    fn test_best_per_chain_picks_highest() {
        let records = vec![
            pool("Ethereum", "a", Some(dec!(10)), None, false),
            pool("Ethereum", "b", Some(dec!(30)), None, false),
            pool("Solana", "c", None, None, false),
        ];
        let best = best_per_chain(&records, Metric::TvlUsd);
        assert_eq!(best.get("Ethereum").unwrap().project, "b");
        assert!(!best.contains_key("Solana"));
    }
}
