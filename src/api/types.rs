//! API response and query types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::incentives::{IncentiveCategory, IncentiveRecord, IncentiveSummary};

/// Incentive listing with totals.
#[derive(Debug, Serialize)]
pub struct IncentivesResponse {
    /// Catalog records in catalog order.
    pub records: Vec<IncentiveRecord>,
    /// Normalized total ($).
    pub total: f64,
    /// Normalization horizon (years).
    pub horizon_years: u32,
    /// Normalized totals per category.
    pub subtotals: BTreeMap<IncentiveCategory, f64>,
}

impl From<&IncentiveSummary> for IncentivesResponse {
    fn from(s: &IncentiveSummary) -> Self {
        Self {
            records: s.records.clone(),
            total: s.total,
            horizon_years: s.horizon_years,
            subtotals: s.subtotals(),
        }
    }
}

/// Optional year range for the projection endpoint.
#[derive(Debug, Deserialize)]
pub struct ProjectionQuery {
    /// First year (inclusive).
    pub from: Option<u32>,
    /// Last year (inclusive).
    pub to: Option<u32>,
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
