pub mod metric;
pub mod rank;
pub mod stats;

pub use metric::Metric;
pub use rank::{by_percentile, reliability_filter, top_n_by_metric, AnalyticsError};
pub use stats::{
    best_per_chain, compare_across_chains, statistics, ChainBreakdown, PoolStatistics,
    ProtocolComparison,
};
