//! Multi-year savings projection and payback.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::sizer::SystemDesign;

/// Default projection horizon (years).
pub const DEFAULT_HORIZON_YEARS: u32 = 25;

/// Market and yield assumptions for one projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialAssumptions {
    /// Retail electricity price ($/kWh).
    pub energy_price_per_kwh: f64,
    /// Annual price escalation as a fraction (0.03 = 3%).
    pub escalation_rate: f64,
    /// Annual production per installed kW (kWh/kW-yr).
    pub production_kwh_per_kw: f64,
    /// Number of projected years.
    pub horizon_years: u32,
}

/// Savings for one projected year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyProjection {
    /// 1-based year index.
    pub year: u32,
    /// Bill savings during this year ($).
    pub annual_savings: f64,
    /// Running total of savings through this year ($).
    pub cumulative_savings: f64,
}

/// Every projected year, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavingsProjection {
    years: Vec<YearlyProjection>,
}

impl SavingsProjection {
    /// All years, year 1 first.
    pub fn years(&self) -> &[YearlyProjection] {
        &self.years
    }

    /// Number of projected years.
    pub fn horizon_years(&self) -> u32 {
        self.years.len() as u32
    }

    /// Record for a 1-based year, if inside the horizon.
    pub fn year(&self, year: u32) -> Option<&YearlyProjection> {
        let idx = usize::try_from(year.checked_sub(1)?).ok()?;
        self.years.get(idx)
    }

    /// Year-1 savings, or 0 for an empty horizon.
    pub fn first_year_savings(&self) -> f64 {
        self.years.first().map_or(0.0, |y| y.annual_savings)
    }

    /// Cumulative savings at the end of the horizon.
    pub fn total_savings(&self) -> f64 {
        self.years.last().map_or(0.0, |y| y.cumulative_savings)
    }

    /// Records for the given years, skipping any outside the horizon.
    pub fn sample(&self, years: &[u32]) -> Vec<YearlyProjection> {
        years.iter().filter_map(|&y| self.year(y).copied()).collect()
    }

    /// Records in an inclusive year range.
    pub fn range(&self, from: u32, to: u32) -> impl Iterator<Item = &YearlyProjection> {
        self.years
            .iter()
            .filter(move |y| y.year >= from && y.year <= to)
    }
}

/// Years surfaced in summaries: 1 through 10, then every fifth year, always
/// ending at the horizon.
pub fn reporting_years(horizon_years: u32) -> Vec<u32> {
    let mut years: Vec<u32> = (1..=horizon_years.min(10)).collect();
    years.extend((15..=horizon_years).step_by(5));
    if horizon_years > 10 && years.last() != Some(&horizon_years) {
        years.push(horizon_years);
    }
    years
}

/// Projects yearly and cumulative savings for a design.
///
/// Year 1 savings are `capacity_kw * production * price`; each later year
/// compounds by `(1 + escalation_rate)`. Every year of the horizon is
/// produced.
pub fn project(design: &SystemDesign, assumptions: &FinancialAssumptions) -> SavingsProjection {
    let year_one = design.capacity_kw.max(0.0)
        * assumptions.production_kwh_per_kw.max(0.0)
        * assumptions.energy_price_per_kwh.max(0.0);
    let growth = 1.0 + assumptions.escalation_rate;

    let mut years = Vec::with_capacity(assumptions.horizon_years as usize);
    let mut annual = year_one;
    let mut cumulative = 0.0;
    for year in 1..=assumptions.horizon_years {
        cumulative += annual;
        years.push(YearlyProjection {
            year,
            annual_savings: annual,
            cumulative_savings: cumulative,
        });
        annual *= growth;
    }

    debug!(
        year_one_savings = year_one,
        horizon = assumptions.horizon_years,
        total = cumulative,
        "projected savings"
    );
    SavingsProjection { years }
}

/// Break-even outcome for a projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "years", rename_all = "snake_case")]
pub enum Payback {
    /// Fractional years until cumulative savings cover the net cost.
    Years(f64),
    /// Cumulative savings at the horizon stay below the net cost.
    NeverPaysBack,
}

impl Payback {
    /// Payback in years, if reached.
    pub fn years(self) -> Option<f64> {
        match self {
            Self::Years(y) => Some(y),
            Self::NeverPaysBack => None,
        }
    }
}

/// Net installed cost after incentives; may be negative.
pub fn net_system_cost(design: &SystemDesign, cost_per_kw: f64, incentive_total: f64) -> f64 {
    design.capacity_kw * cost_per_kw - incentive_total
}

/// Finds the payback point by linear interpolation between the two
/// integer years that bracket `net_cost`.
///
/// A non-positive net cost pays back immediately (0 years).
pub fn payback_period(projection: &SavingsProjection, net_cost: f64) -> Payback {
    if net_cost <= 0.0 {
        return Payback::Years(0.0);
    }

    let mut previous = 0.0;
    for y in projection.years() {
        if y.cumulative_savings >= net_cost {
            // previous < net_cost <= cumulative, so the year gained something
            let fraction = (net_cost - previous) / (y.cumulative_savings - previous);
            return Payback::Years(f64::from(y.year - 1) + fraction);
        }
        previous = y.cumulative_savings;
    }

    info!(
        net_cost,
        cumulative = projection.total_savings(),
        "system does not pay back within horizon"
    );
    Payback::NeverPaysBack
}
