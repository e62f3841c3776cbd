//! Ranking and percentile banding.
//!
//! The store has no native sort or percentile support, so these operate on
//! the already-fetched in-memory set. All functions are pure; the only error
//! anywhere in this module is a percentile outside [0, 100].

use crate::metric::Metric;
use pool_metrics_core::PoolRecord;
use thiserror::Error;

/// Errors from analytics operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// Percentile must lie within [0, 100].
    #[error("percentile out of range: {0} (expected 0..=100)")]
    InvalidPercentile(f64),
}

/// Returns the top `n` records by a metric, descending.
///
/// Only records with a present, strictly positive metric value take part;
/// absent and zero values are excluded entirely, not treated as zero. The
/// sort is stable, so input order breaks ties.
#[must_use]
pub fn top_n_by_metric(records: &[PoolRecord], metric: Metric, n: usize) -> Vec<PoolRecord> {
    let mut ranked: Vec<(rust_decimal::Decimal, &PoolRecord)> = records
        .iter()
        .filter_map(|r| {
            metric
                .value_of(r)
                .filter(|v| v.is_sign_positive() && !v.is_zero())
                .map(|v| (v, r))
        })
        .collect();

    ranked.sort_by(|a, b| b.0.cmp(&a.0));
    ranked.into_iter().take(n).map(|(_, r)| r.clone()).collect()
}

/// Returns every record at or above the `p`-th percentile of a metric.
///
/// Index-based, inclusive: the records with a present metric value are
/// sorted ascending, the threshold is the value at `floor(p/100 * len)`
/// (clamped to the last element), and everything `>=` that value is
/// returned. Ties at the boundary are all included, so the result can be
/// larger than the nominal `(100-p)%` slice when duplicates cluster at the
/// threshold. Deliberately not an interpolated percentile; callers depend
/// on these exact cut semantics.
///
/// # Errors
/// [`AnalyticsError::InvalidPercentile`] when `p` is outside [0, 100].
pub fn by_percentile(
    records: &[PoolRecord],
    metric: Metric,
    p: f64,
) -> Result<Vec<PoolRecord>, AnalyticsError> {
    if !(0.0..=100.0).contains(&p) || p.is_nan() {
        return Err(AnalyticsError::InvalidPercentile(p));
    }

    let mut valued: Vec<(rust_decimal::Decimal, &PoolRecord)> = records
        .iter()
        .filter_map(|r| metric.value_of(r).map(|v| (v, r)))
        .collect();
    if valued.is_empty() {
        return Ok(Vec::new());
    }

    valued.sort_by(|a, b| a.0.cmp(&b.0));

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = ((p / 100.0 * valued.len() as f64).floor() as usize).min(valued.len() - 1);
    let threshold = valued[index].0;

    Ok(valued
        .into_iter()
        .filter(|(v, _)| *v >= threshold)
        .map(|(_, r)| r.clone())
        .collect())
}

/// Keeps only records backed by at least `min_count` observations.
///
/// Records without a count are excluded.
#[must_use]
pub fn reliability_filter(records: &[PoolRecord], min_count: u32) -> Vec<PoolRecord> {
    records
        .iter()
        .filter(|r| r.count.is_some_and(|c| c >= min_count))
        .cloned()
        .collect()
}
