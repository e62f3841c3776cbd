//! Pool repository.
//!
//! Ties the query builder and the store together: serializes records to
//! JSON payloads with derived annotations, scopes every expression to the
//! `defi_pool` entity kind, and chunks bulk writes into sequential batches.
//!
//! Batching is strictly sequential with no rollback: if a batch call fails,
//! the loop stops and the error propagates with every earlier batch already
//! written. Callers needing all-or-nothing semantics must build that above
//! this layer.

use crate::expr::Expr;
use crate::query::advanced_query;
use pool_metrics_core::{
    AnnotationSet, EntityCreate, EntityKey, PoolPatch, PoolQueryCriteria, PoolRecord, PoolStore,
    StoreError, POOL_ENTITY_TYPE,
};
use thiserror::Error;

/// Errors from repository operations.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// No stored pool carries the given `pool_id`.
    #[error("pool not found: {0}")]
    PoolNotFound(String),

    /// Store failure, propagated unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored payload did not decode as a pool record.
    #[error("payload decode failed: {0}")]
    Payload(#[from] serde_json::Error),
}

/// A pool record together with the entity key of its stored version.
///
/// The key changes on every update; only `record.pool_id` is stable.
#[derive(Debug, Clone)]
pub struct StoredPool {
    pub entity_key: EntityKey,
    pub record: PoolRecord,
}

/// Repository over any [`PoolStore`] backend.
///
/// Holds the store handle explicitly; construct once and pass to every
/// caller that needs it.
pub struct PoolRepository<S: PoolStore> {
    store: S,
    btl: u64,
    batch_size: usize,
}

impl<S: PoolStore> PoolRepository<S> {
    /// Creates a repository with the default batch size of 10.
    pub fn new(store: S) -> Self {
        Self {
            store,
            btl: 1_000_000,
            batch_size: 10,
        }
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    #[must_use]
    pub fn with_btl(mut self, btl: u64) -> Self {
        self.btl = btl;
        self
    }

    /// Stores records in sequential batches, returning all created keys.
    ///
    /// # Errors
    /// Propagates the first store failure; earlier batches stay written.
    pub async fn create_pools(
        &self,
        records: &[PoolRecord],
    ) -> Result<Vec<EntityKey>, RepositoryError> {
        let mut all_keys = Vec::with_capacity(records.len());

        for (batch_index, batch) in records.chunks(self.batch_size).enumerate() {
            let mut entities = Vec::with_capacity(batch.len());
            for record in batch {
                entities.push(EntityCreate {
                    payload: serde_json::to_vec(record)?,
                    btl: self.btl,
                    annotations: self.scoped_annotations(record),
                });
            }

            let keys = self.store.create(entities).await?;
            tracing::info!(
                batch = batch_index + 1,
                created = keys.len(),
                "stored pool batch"
            );
            all_keys.extend(keys);
        }

        Ok(all_keys)
    }

    /// Runs an advanced query and decodes every matching record.
    ///
    /// # Errors
    /// Returns an error if the store call fails or a payload is corrupt.
    pub async fn query_pools(
        &self,
        criteria: &PoolQueryCriteria,
    ) -> Result<Vec<StoredPool>, RepositoryError> {
        let expression = self.scoped_expression(criteria);
        tracing::debug!(%expression, "querying pools");

        let hits = self.store.query(&expression).await?;
        let mut pools = Vec::with_capacity(hits.len());
        for hit in hits {
            let record: PoolRecord = serde_json::from_slice(&hit.payload)?;
            pools.push(StoredPool {
                entity_key: hit.entity_key,
                record,
            });
        }
        Ok(pools)
    }

    /// Merges a patch into the pool with the given id and rewrites it.
    ///
    /// Lookup is a full re-query plus linear scan over the `pool_id`
    /// annotation payloads, so the view is whatever the store's latest
    /// indexed state is. The returned [`StoredPool`] carries the new entity
    /// key; the old one is gone.
    ///
    /// # Errors
    /// [`RepositoryError::PoolNotFound`] if no stored record matches.
    pub async fn update_pool(
        &self,
        pool_id: &str,
        patch: PoolPatch,
    ) -> Result<StoredPool, RepositoryError> {
        let pools = self.query_pools(&PoolQueryCriteria::any()).await?;
        let stored = pools
            .into_iter()
            .find(|p| p.record.pool_id == pool_id)
            .ok_or_else(|| RepositoryError::PoolNotFound(pool_id.to_string()))?;

        let mut record = stored.record;
        record.apply(patch);

        let new_key = self
            .store
            .update(
                &stored.entity_key,
                serde_json::to_vec(&record)?,
                self.scoped_annotations(&record),
            )
            .await?;

        Ok(StoredPool {
            entity_key: new_key,
            record,
        })
    }

    /// Deletes every pool matching the criteria, in sequential batches.
    ///
    /// Returns the number of entities removed.
    ///
    /// # Errors
    /// Propagates the first store failure; earlier batches stay deleted.
    pub async fn delete_pools(
        &self,
        criteria: &PoolQueryCriteria,
    ) -> Result<usize, RepositoryError> {
        let pools = self.query_pools(criteria).await?;
        let keys: Vec<EntityKey> = pools.into_iter().map(|p| p.entity_key).collect();

        let mut deleted = 0;
        for batch in keys.chunks(self.batch_size) {
            let removed = self.store.delete(batch.to_vec()).await?;
            deleted += removed.len();
            tracing::info!(removed = removed.len(), "deleted pool batch");
        }
        Ok(deleted)
    }

    /// Deletes every stored pool.
    ///
    /// # Errors
    /// Same semantics as [`delete_pools`](Self::delete_pools).
    pub async fn delete_all(&self) -> Result<usize, RepositoryError> {
        self.delete_pools(&PoolQueryCriteria::any()).await
    }

    fn scoped_annotations(&self, record: &PoolRecord) -> AnnotationSet {
        let mut annotations = AnnotationSet::from_record(record);
        annotations.push_str("type", POOL_ENTITY_TYPE);
        annotations
    }

    fn scoped_expression(&self, criteria: &PoolQueryCriteria) -> String {
        let scope = Expr::str_eq("type", POOL_ENTITY_TYPE);
        if criteria.is_unconstrained() {
            // The type clause alone is already a valid non-empty expression.
            // The builder's no-criteria fallback is `tvlUsd > 0`, which
            // misses pools carrying no TVL annotation.
            return scope.to_string();
        }
        scope.and(advanced_query(criteria)).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use rust_decimal_macros::dec;

    fn pool(
        chain: &str,
        project: &str,
        tvl: rust_decimal::Decimal,
        stablecoin: bool,
    ) -> PoolRecord {
        PoolRecord::new(chain.into(), project.into(), "TEST-PAIR".into())
            .with_economics(Some(tvl), None, None, None)
            .with_flags(stablecoin, false)
    }

    fn repo() -> PoolRepository<MemoryStore> {
        PoolRepository::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn test_create_batches_sequentially() {
        let repo = repo().with_batch_size(10);
        let records: Vec<PoolRecord> = (0..25)
            .map(|i| pool("Ethereum", "uniswap-v3", dec!(1000) + rust_decimal::Decimal::from(i), false))
            .collect();

        let keys = repo.create_pools(&records).await.unwrap();
        assert_eq!(keys.len(), 25);

        let stored = repo.query_pools(&PoolQueryCriteria::any()).await.unwrap();
        assert_eq!(stored.len(), 25);
    }

    #[tokio::test]
    async fn test_stablecoin_tvl_scenario() {
        // Three stablecoin pools and two others; minTvl + stablecoinOnly
        // must select exactly the two stablecoin pools at or above $1M.
        let repo = repo();
        repo.create_pools(&[
            pool("Ethereum", "curve-dex", dec!(500_000), true),
            pool("Ethereum", "curve-dex", dec!(2_000_000), true),
            pool("Solana", "raydium-amm", dec!(10_000_000), true),
            pool("Ethereum", "uniswap-v3", dec!(50_000), false),
            pool("Solana", "raydium-amm", dec!(20_000_000), false),
        ])
        .await
        .unwrap();

        let criteria = PoolQueryCriteria::any()
            .with_min_tvl(dec!(1_000_000))
            .with_stablecoin_only();
        let matches = repo.query_pools(&criteria).await.unwrap();

        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|p| p.record.stablecoin));
        assert!(matches
            .iter()
            .all(|p| p.record.tvl_usd.unwrap() >= dec!(1_000_000)));
    }

    #[tokio::test]
    async fn test_update_replaces_entity_key() {
        let repo = repo();
        let record = pool("Ethereum", "uniswap-v3", dec!(1_000_000), false);
        let pool_id = record.pool_id.clone();
        repo.create_pools(&[record]).await.unwrap();

        let before = repo.query_pools(&PoolQueryCriteria::any()).await.unwrap();
        let old_key = before[0].entity_key.clone();

        let updated = repo
            .update_pool(
                &pool_id,
                PoolPatch {
                    tvl_usd: Some(dec!(3_000_000)),
                    ..PoolPatch::default()
                },
            )
            .await
            .unwrap();

        assert_ne!(updated.entity_key, old_key);
        assert_eq!(updated.record.tvl_usd, Some(dec!(3_000_000)));
        assert_eq!(updated.record.pool_id, pool_id);

        // The new annotations are live: the raised TVL is queryable.
        let matches = repo
            .query_pools(&PoolQueryCriteria::any().with_min_tvl(dec!(2_500_000)))
            .await
            .unwrap();
        assert_eq!(matches.len(), 1);
    }

    #[tokio::test]
    async fn test_update_unknown_pool_is_not_found() {
        let repo = repo();
        let result = repo.update_pool("no-such-pool", PoolPatch::default()).await;
        assert!(matches!(result, Err(RepositoryError::PoolNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_by_criteria_leaves_rest() {
        let repo = repo();
        repo.create_pools(&[
            pool("Ethereum", "curve-dex", dec!(100), true),
            pool("Solana", "raydium-amm", dec!(200), false),
            pool("Solana", "orca", dec!(300), false),
        ])
        .await
        .unwrap();

        let deleted = repo
            .delete_pools(&PoolQueryCriteria::any().with_chains(vec!["Solana".into()]))
            .await
            .unwrap();
        assert_eq!(deleted, 2);

        let remaining = repo.query_pools(&PoolQueryCriteria::any()).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].record.chain, "Ethereum");
    }

    #[tokio::test]
    async fn test_pool_without_tvl_is_visible_and_updatable() {
        // A freshly listed pool may have no TVL yet; it carries no tvlUsd
        // annotation at all. The unconstrained query and the update path
        // must still reach it.
        let repo = repo();
        let record = PoolRecord::new("Ethereum".into(), "uniswap-v3".into(), "TEST-PAIR".into());
        let pool_id = record.pool_id.clone();
        repo.create_pools(&[record]).await.unwrap();

        let all = repo.query_pools(&PoolQueryCriteria::any()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].record.tvl_usd, None);

        let updated = repo
            .update_pool(
                &pool_id,
                PoolPatch {
                    tvl_usd: Some(dec!(750_000)),
                    ..PoolPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.record.tvl_usd, Some(dec!(750_000)));
    }

    #[tokio::test]
    async fn test_delete_all_removes_pools_without_tvl() {
        let repo = repo();
        repo.create_pools(&[
            PoolRecord::new("Ethereum".into(), "curve-dex".into(), "USDC-DAI".into()),
            pool("Base", "aerodrome", dec!(200), false),
        ])
        .await
        .unwrap();

        assert_eq!(repo.delete_all().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_all_empties_store() {
        let repo = repo();
        repo.create_pools(&[
            pool("Ethereum", "curve-dex", dec!(100), true),
            pool("Base", "aerodrome", dec!(200), false),
        ])
        .await
        .unwrap();

        assert_eq!(repo.delete_all().await.unwrap(), 2);
        assert!(repo
            .query_pools(&PoolQueryCriteria::any())
            .await
            .unwrap()
            .is_empty());
    }
}
