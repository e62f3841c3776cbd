//! Abstract pool store interface.
//!
//! The backing store holds opaque payloads indexed by typed key/value
//! annotations and answers boolean filter expressions over them. Everything
//! above this trait is backend-agnostic: the repository and query builder
//! only ever see [`PoolStore`].
//!
//! Update is replace: the store issues a fresh entity key for every write,
//! so an entity key identifies one stored *version*, not the pool itself.
//! The stable identity lives in the `pool_id` annotation.

use crate::annotations::AnnotationSet;
use async_trait::async_trait;
use thiserror::Error;

/// Annotation value of the entity-kind discriminator for pool records.
pub const POOL_ENTITY_TYPE: &str = "defi_pool";

/// Opaque identifier of one stored entity version.
pub type EntityKey = String;

/// Errors surfaced by a store backend.
///
/// These propagate to callers unchanged; this layer never retries.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached or answered with a transport failure.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected a filter expression.
    #[error("malformed query expression: {0}")]
    MalformedExpression(String),

    /// The targeted entity key does not exist in the store.
    #[error("unknown entity key: {0}")]
    UnknownEntityKey(EntityKey),
}

/// One entity to be created.
#[derive(Debug, Clone)]
pub struct EntityCreate {
    /// Opaque payload (JSON-encoded record).
    pub payload: Vec<u8>,
    /// Block time-to-live of the entity.
    pub btl: u64,
    pub annotations: AnnotationSet,
}

/// One query match: the key of the stored version plus its payload.
#[derive(Debug, Clone)]
pub struct QueryHit {
    pub entity_key: EntityKey,
    pub payload: Vec<u8>,
}

/// An annotation-indexed entity store.
///
/// The expression grammar accepted by [`query`](PoolStore::query) supports
/// the comparisons `=`, `>`, `>=`, `<`, `<=` (no `!=`), the combinators
/// `&&`, `||`, `!`, double-quoted string literals, and integer literals.
/// Numeric thresholds must be pre-encoded per [`crate::encoding`].
#[async_trait]
pub trait PoolStore: Send + Sync {
    /// Stores a batch of entities, returning one key per entity in order.
    async fn create(&self, entities: Vec<EntityCreate>) -> Result<Vec<EntityKey>, StoreError>;

    /// Returns every entity matching the filter expression.
    async fn query(&self, expression: &str) -> Result<Vec<QueryHit>, StoreError>;

    /// Replaces an entity's payload and annotations, returning the new key.
    async fn update(
        &self,
        entity_key: &EntityKey,
        payload: Vec<u8>,
        annotations: AnnotationSet,
    ) -> Result<EntityKey, StoreError>;

    /// Deletes entities by key, returning the keys actually removed.
    async fn delete(&self, entity_keys: Vec<EntityKey>) -> Result<Vec<EntityKey>, StoreError>;
}
