//! Incentive aggregation across one-time and recurring programs.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default years over which an annual incentive is counted.
pub const DEFAULT_NORMALIZATION_YEARS: u32 = 10;

/// How often an incentive pays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    /// Paid once.
    OneTime,
    /// Paid every year.
    Annual,
}

/// Issuer category of an incentive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncentiveCategory {
    Federal,
    State,
    Utility,
    Tax,
    Other,
}

impl fmt::Display for IncentiveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Federal => "federal",
            Self::State => "state",
            Self::Utility => "utility",
            Self::Tax => "tax",
            Self::Other => "other",
        };
        f.write_str(label)
    }
}

/// A single rebate, credit, or exemption from the incentive catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncentiveRecord {
    /// Program name.
    pub name: String,
    /// Amount per payout ($).
    pub amount: f64,
    /// Payout schedule.
    pub recurrence: Recurrence,
    /// Issuer category.
    pub category: IncentiveCategory,
    /// Whether the household qualifies.
    pub eligible: bool,
    /// Short description for listings.
    #[serde(default)]
    pub description: String,
}

impl IncentiveRecord {
    /// Creates an eligible record with no description.
    pub fn new(
        name: &str,
        amount: f64,
        recurrence: Recurrence,
        category: IncentiveCategory,
    ) -> Self {
        Self {
            name: name.to_string(),
            amount,
            recurrence,
            category,
            eligible: true,
            description: String::new(),
        }
    }

    /// Lump-sum value over `horizon_years`; 0 when ineligible.
    pub fn normalized_value(&self, horizon_years: u32) -> f64 {
        if !self.eligible {
            return 0.0;
        }
        match self.recurrence {
            Recurrence::OneTime => self.amount,
            Recurrence::Annual => self.amount * f64::from(horizon_years),
        }
    }
}

/// Incentive listing with its normalized total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncentiveSummary {
    /// Every catalog record in catalog order, eligible or not.
    pub records: Vec<IncentiveRecord>,
    /// Sum of normalized values of eligible records ($).
    pub total: f64,
    /// Years used to convert annual incentives into lump sums.
    pub horizon_years: u32,
}

impl IncentiveSummary {
    /// Normalized totals per category; categories with no eligible value are omitted.
    pub fn subtotals(&self) -> BTreeMap<IncentiveCategory, f64> {
        let mut totals = BTreeMap::new();
        for record in self.records.iter().filter(|r| r.eligible) {
            *totals.entry(record.category).or_insert(0.0) +=
                record.normalized_value(self.horizon_years);
        }
        totals
    }

    /// Number of eligible records.
    pub fn eligible_count(&self) -> usize {
        self.records.iter().filter(|r| r.eligible).count()
    }
}

/// Aggregates catalog records into a summary.
///
/// One-time amounts count as-is, annual amounts are multiplied by
/// `horizon_years`. Ineligible records stay in the listing but add nothing.
pub fn aggregate(records: Vec<IncentiveRecord>, horizon_years: u32) -> IncentiveSummary {
    let total = records
        .iter()
        .map(|r| r.normalized_value(horizon_years))
        .sum();
    debug!(
        records = records.len(),
        horizon_years, total, "aggregated incentives"
    );
    IncentiveSummary {
        records,
        total,
        horizon_years,
    }
}
