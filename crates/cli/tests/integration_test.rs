use pool_metrics_analytics::{by_percentile, statistics, top_n_by_metric, Metric};
use pool_metrics_core::{PoolQueryCriteria, PoolRecord};
use pool_metrics_store::{MemoryStore, PoolRepository};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn pool(
    chain: &str,
    project: &str,
    tvl: Decimal,
    apy: Option<Decimal>,
    stablecoin: bool,
) -> PoolRecord {
    let mut record = PoolRecord::new(chain.into(), project.into(), "PAIR".into());
    record.tvl_usd = Some(tvl);
    record.apy = apy;
    record.stablecoin = stablecoin;
    record
}

#[tokio::test]
async fn test_ingest_query_analyze_pipeline() {
    let repo = PoolRepository::new(MemoryStore::new()).with_batch_size(2);

    repo.create_pools(&[
        pool("Ethereum", "curve-dex", dec!(500_000), Some(dec!(2.1)), true),
        pool("Ethereum", "curve-dex", dec!(2_000_000), Some(dec!(3.4)), true),
        pool("Solana", "raydium-amm", dec!(10_000_000), None, true),
        pool("Ethereum", "uniswap-v3", dec!(50_000), Some(dec!(12.5)), false),
        pool("Solana", "raydium-amm", dec!(20_000_000), Some(dec!(8.0)), false),
    ])
    .await
    .unwrap();

    // Store-side filtering: minTvl + stablecoinOnly.
    let criteria = PoolQueryCriteria::any()
        .with_min_tvl(dec!(1_000_000))
        .with_stablecoin_only();
    let matches: Vec<PoolRecord> = repo
        .query_pools(&criteria)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.record)
        .collect();
    assert_eq!(matches.len(), 2);

    // In-memory post-processing on the fetched set.
    let top = top_n_by_metric(&matches, Metric::TvlUsd, 1);
    assert_eq!(top[0].tvl_usd, Some(dec!(10_000_000)));

    // The pool without an APY still dilutes the mean: (3.4 + 0) / 2.
    let stats = statistics(&matches);
    assert_eq!(stats.count, 2);
    assert_eq!(stats.mean_apy, Some(dec!(1.7)));
    assert_eq!(stats.stablecoin_pct, Some(dec!(100)));

    let band = by_percentile(&matches, Metric::TvlUsd, 50.0).unwrap();
    assert_eq!(band.len(), 1);
    assert_eq!(band[0].tvl_usd, Some(dec!(10_000_000)));
}

#[tokio::test]
async fn test_untyped_entities_invisible_to_pool_queries() {
    use pool_metrics_core::{AnnotationSet, EntityCreate, PoolStore};

    let store = MemoryStore::new();

    // An entity of another kind, sharing annotation keys but not the type
    // discriminator.
    let mut annotations = AnnotationSet::default();
    annotations.push_str("type", "chat_message");
    annotations.push_num("tvlUsd", 999_999_999);
    store
        .create(vec![EntityCreate {
            payload: b"{}".to_vec(),
            btl: 1_000_000,
            annotations,
        }])
        .await
        .unwrap();

    let repo = PoolRepository::new(store);
    repo.create_pools(&[pool("Base", "aerodrome", dec!(1_000), None, false)])
        .await
        .unwrap();

    let pools = repo.query_pools(&PoolQueryCriteria::any()).await.unwrap();
    assert_eq!(pools.len(), 1);
    assert_eq!(pools[0].record.chain, "Base");
}
