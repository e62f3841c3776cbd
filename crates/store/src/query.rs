//! Advanced query builder.
//!
//! Translates [`PoolQueryCriteria`] into a filter expression. Numeric
//! thresholds pass through the fixed-point encoder before they are embedded,
//! so the expression compares against the same scale the annotations were
//! written with.

use crate::expr::{CmpOp, Expr};
use pool_metrics_core::encoding::{encode_rate, encode_usd};
use pool_metrics_core::PoolQueryCriteria;

/// Builds the filter expression for a set of criteria.
///
/// Criteria that do not apply produce no clause; this function never fails.
/// With no criteria at all it emits the vacuously-true `tvlUsd > 0`, since
/// the store rejects empty expressions. That fallback only matches pools
/// with a TVL annotation; the repository reaches the rest by querying its
/// type clause alone instead of calling the builder unconstrained.
#[must_use]
pub fn advanced_query(criteria: &PoolQueryCriteria) -> Expr {
    let mut clauses = Vec::new();

    if let Some(min_tvl) = criteria.min_tvl {
        clauses.push(Expr::num("tvlUsd", CmpOp::Ge, encode_usd(min_tvl)));
    }
    if let Some(max_tvl) = criteria.max_tvl {
        clauses.push(Expr::num("tvlUsd", CmpOp::Le, encode_usd(max_tvl)));
    }
    if let Some(min_apy) = criteria.min_apy {
        clauses.push(Expr::num("apy", CmpOp::Ge, encode_rate(min_apy)));
    }
    if let Some(max_apy) = criteria.max_apy {
        clauses.push(Expr::num("apy", CmpOp::Le, encode_rate(max_apy)));
    }

    let volume_key = criteria.volume_period.annotation_key();
    if let Some(min_volume) = criteria.min_volume {
        clauses.push(Expr::num(volume_key, CmpOp::Ge, encode_usd(min_volume)));
    }
    if let Some(max_volume) = criteria.max_volume {
        clauses.push(Expr::num(volume_key, CmpOp::Le, encode_usd(max_volume)));
    }

    if !criteria.chains.is_empty() {
        clauses.push(one_of("chain", &criteria.chains));
    }
    if !criteria.projects.is_empty() {
        clauses.push(one_of("project", &criteria.projects));
    }

    if criteria.stablecoin_only {
        clauses.push(Expr::num("stablecoin", CmpOp::Eq, 1));
    }

    if criteria.exclude_outliers {
        // Not expressible: the grammar has no `!=` and the outlier flag is
        // stored as 1-or-absent. Accepted and ignored; callers filter the
        // fetched set in memory if they need it.
        tracing::debug!("exclude_outliers requested; grammar cannot express it, ignoring");
    }

    if clauses.is_empty() {
        Expr::num("tvlUsd", CmpOp::Gt, 0)
    } else {
        Expr::And(clauses)
    }
}

fn one_of(field: &str, values: &[String]) -> Expr {
    let alternatives: Vec<Expr> = values.iter().map(|v| Expr::str_eq(field, v)).collect();
    if alternatives.len() == 1 {
        alternatives.into_iter().next().unwrap_or(Expr::Or(vec![]))
    } else {
        Expr::Or(alternatives)
    }
}
