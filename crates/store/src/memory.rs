//! In-memory store engine.
//!
//! Implements [`PoolStore`] over a process-local entity table, evaluating
//! the same wire grammar a remote backend would. This is the backend the CLI
//! and the test suite run against; swapping in a remote store is a matter of
//! implementing the trait, nothing above it changes.

use crate::expr::{CmpOp, Expr, Value};
use crate::grammar;
use async_trait::async_trait;
use pool_metrics_core::{AnnotationSet, EntityCreate, EntityKey, PoolStore, QueryHit, StoreError};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct StoredEntity {
    payload: Vec<u8>,
    annotations: AnnotationSet,
}

/// Annotation-indexed entity store backed by a `BTreeMap`.
///
/// Entity keys are issued from a monotonic counter, zero-padded so map
/// iteration (and therefore query output) is insertion-ordered.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entities: RwLock<BTreeMap<EntityKey, StoredEntity>>,
    next_key: AtomicU64,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn issue_key(&self) -> EntityKey {
        let n = self.next_key.fetch_add(1, Ordering::Relaxed);
        format!("0x{n:016x}")
    }

    /// Number of stored entities. Test and CLI convenience.
    pub async fn len(&self) -> usize {
        self.entities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entities.read().await.is_empty()
    }
}

#[async_trait]
impl PoolStore for MemoryStore {
    async fn create(&self, entities: Vec<EntityCreate>) -> Result<Vec<EntityKey>, StoreError> {
        let mut table = self.entities.write().await;
        let mut keys = Vec::with_capacity(entities.len());
        for entity in entities {
            let key = self.issue_key();
            table.insert(
                key.clone(),
                StoredEntity {
                    payload: entity.payload,
                    annotations: entity.annotations,
                },
            );
            keys.push(key);
        }
        Ok(keys)
    }

    async fn query(&self, expression: &str) -> Result<Vec<QueryHit>, StoreError> {
        let expr = grammar::parse(expression)?;
        let table = self.entities.read().await;
        let hits = table
            .iter()
            .filter(|(_, entity)| evaluate(&expr, &entity.annotations))
            .map(|(key, entity)| QueryHit {
                entity_key: key.clone(),
                payload: entity.payload.clone(),
            })
            .collect();
        Ok(hits)
    }

    async fn update(
        &self,
        entity_key: &EntityKey,
        payload: Vec<u8>,
        annotations: AnnotationSet,
    ) -> Result<EntityKey, StoreError> {
        let mut table = self.entities.write().await;
        if table.remove(entity_key).is_none() {
            return Err(StoreError::UnknownEntityKey(entity_key.clone()));
        }
        let new_key = self.issue_key();
        table.insert(
            new_key.clone(),
            StoredEntity {
                payload,
                annotations,
            },
        );
        Ok(new_key)
    }

    async fn delete(&self, entity_keys: Vec<EntityKey>) -> Result<Vec<EntityKey>, StoreError> {
        let mut table = self.entities.write().await;
        let removed = entity_keys
            .into_iter()
            .filter(|key| table.remove(key).is_some())
            .collect();
        Ok(removed)
    }
}

/// Evaluates an expression against one entity's annotations.
///
/// A comparison naming an absent key is false. String annotations support
/// only `=`; any ordering comparison against a string literal is false.
fn evaluate(expr: &Expr, annotations: &AnnotationSet) -> bool {
    match expr {
        Expr::And(clauses) => clauses.iter().all(|c| evaluate(c, annotations)),
        Expr::Or(clauses) => clauses.iter().any(|c| evaluate(c, annotations)),
        Expr::Not(inner) => !evaluate(inner, annotations),
        Expr::Cmp { field, op, value } => match value {
            Value::Str(literal) => {
                *op == CmpOp::Eq && annotations.string(field) == Some(literal.as_str())
            }
            Value::Int(literal) => match annotations.numeric(field) {
                Some(stored) => match op {
                    CmpOp::Eq => stored == *literal,
                    CmpOp::Gt => stored > *literal,
                    CmpOp::Ge => stored >= *literal,
                    CmpOp::Lt => stored < *literal,
                    CmpOp::Le => stored <= *literal,
                },
                None => false,
            },
        },
    }
}
