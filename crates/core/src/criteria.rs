//! Structured filter criteria for pool queries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which trailing volume window a volume bound applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumePeriod {
    #[default]
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "7d")]
    SevenDays,
}

impl VolumePeriod {
    /// The annotation key this period's volume is stored under.
    #[must_use]
    pub fn annotation_key(self) -> &'static str {
        match self {
            Self::OneDay => "volumeUsd1d",
            Self::SevenDays => "volumeUsd7d",
        }
    }
}

impl std::str::FromStr for VolumePeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" => Ok(Self::OneDay),
            "7d" => Ok(Self::SevenDays),
            other => Err(format!("unknown volume period: {other} (expected 1d or 7d)")),
        }
    }
}

/// Filter criteria for an advanced pool query.
///
/// All fields are optional; criteria that do not apply simply produce no
/// clause. `exclude_outliers` is accepted but currently has no effect on the
/// emitted expression: the store grammar has no `!=`, so "not an outlier"
/// cannot be expressed against the `1`-or-absent flag encoding. Callers that
/// need it must filter in memory after the fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolQueryCriteria {
    pub min_tvl: Option<Decimal>,
    pub max_tvl: Option<Decimal>,
    pub min_apy: Option<Decimal>,
    pub max_apy: Option<Decimal>,
    pub min_volume: Option<Decimal>,
    pub max_volume: Option<Decimal>,
    pub volume_period: VolumePeriod,
    pub chains: Vec<String>,
    pub projects: Vec<String>,
    pub stablecoin_only: bool,
    pub exclude_outliers: bool,
}

impl PoolQueryCriteria {
    /// Criteria matching every pool.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// True when no field would contribute a filter clause.
    ///
    /// `exclude_outliers` is ignored here since it emits no clause either.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.min_tvl.is_none()
            && self.max_tvl.is_none()
            && self.min_apy.is_none()
            && self.max_apy.is_none()
            && self.min_volume.is_none()
            && self.max_volume.is_none()
            && self.chains.is_empty()
            && self.projects.is_empty()
            && !self.stablecoin_only
    }

    #[must_use]
    pub fn with_min_tvl(mut self, min_tvl: Decimal) -> Self {
        self.min_tvl = Some(min_tvl);
        self
    }

    #[must_use]
    pub fn with_stablecoin_only(mut self) -> Self {
        self.stablecoin_only = true;
        self
    }

    #[must_use]
    pub fn with_chains(mut self, chains: Vec<String>) -> Self {
        self.chains = chains;
        self
    }

    #[must_use]
    pub fn with_projects(mut self, projects: Vec<String>) -> Self {
        self.projects = projects;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unconstrained_tracks_clause_producing_fields() {
        assert!(PoolQueryCriteria::any().is_unconstrained());
        assert!(!PoolQueryCriteria::any()
            .with_min_tvl(dec!(1))
            .is_unconstrained());
        assert!(!PoolQueryCriteria::any()
            .with_stablecoin_only()
            .is_unconstrained());
        assert!(!PoolQueryCriteria::any()
            .with_chains(vec!["Ethereum".into()])
            .is_unconstrained());

        // exclude_outliers emits no clause, so it does not constrain.
        let mut criteria = PoolQueryCriteria::any();
        criteria.exclude_outliers = true;
        assert!(criteria.is_unconstrained());
    }
}
