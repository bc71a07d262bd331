//! Config-backed regional data: defaults, irradiance, prices, and incentives.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::SiteData;
use crate::engine::incentives::{IncentiveCategory, IncentiveRecord, Recurrence};
use crate::engine::roof::Location;

/// Default inputs for every location in a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegionDefaults {
    /// Usable roof area assumed when no property hint is given (sq ft).
    pub usable_roof_area_sqft: f64,
    /// Annual yield per installed kW (kWh/kW-yr).
    pub production_kwh_per_kw: f64,
    /// Typical household consumption, the default energy target (kWh/yr).
    pub household_consumption_kwh: f64,
    /// Retail electricity price ($/kWh).
    pub energy_price_per_kwh: f64,
    /// Annual electricity price escalation (fraction).
    pub escalation_rate: f64,
    /// Normalized solar resource (0.0 to 1.0).
    pub irradiance_factor: f64,
}

impl Default for RegionDefaults {
    fn default() -> Self {
        Self {
            usable_roof_area_sqft: 1200.0,
            production_kwh_per_kw: 1400.0,
            household_consumption_kwh: 10_080.0,
            energy_price_per_kwh: 0.1409,
            escalation_rate: 0.0317,
            irradiance_factor: 0.84,
        }
    }
}

/// One incentive catalog entry, optionally limited to a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncentiveEntry {
    /// Program name.
    pub name: String,
    /// Amount per payout ($).
    pub amount: f64,
    /// Payout schedule.
    pub recurrence: Recurrence,
    /// Issuer category.
    pub category: IncentiveCategory,
    /// Whether the household qualifies.
    #[serde(default = "default_eligible")]
    pub eligible: bool,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Region id this entry applies to; `None` applies everywhere.
    #[serde(default)]
    pub region: Option<String>,
}

fn default_eligible() -> bool {
    true
}

impl IncentiveEntry {
    /// Entry applying to all regions.
    pub fn from_record(record: IncentiveRecord) -> Self {
        Self {
            name: record.name,
            amount: record.amount,
            recurrence: record.recurrence,
            category: record.category,
            eligible: record.eligible,
            description: record.description,
            region: None,
        }
    }

    /// The catalog record carried by this entry.
    pub fn record(&self) -> IncentiveRecord {
        IncentiveRecord {
            name: self.name.clone(),
            amount: self.amount,
            recurrence: self.recurrence,
            category: self.category,
            eligible: self.eligible,
            description: self.description.clone(),
        }
    }

    fn applies_to(&self, region: Option<&str>) -> bool {
        match self.region.as_deref() {
            None => true,
            Some(r) => region == Some(r),
        }
    }
}

/// Static regional lookups keyed by `Location::region`.
///
/// Unknown or missing regions resolve to the default region.
#[derive(Debug, Clone, Default)]
pub struct RegionTable {
    default: RegionDefaults,
    regions: BTreeMap<String, RegionDefaults>,
    incentives: Vec<IncentiveEntry>,
}

impl RegionTable {
    /// Builds a table from a default region, named overrides, and a catalog.
    pub fn new(
        default: RegionDefaults,
        regions: BTreeMap<String, RegionDefaults>,
        incentives: Vec<IncentiveEntry>,
    ) -> Self {
        Self {
            default,
            regions,
            incentives,
        }
    }

    /// Replaces the incentive catalog.
    pub fn with_incentives(mut self, incentives: Vec<IncentiveEntry>) -> Self {
        self.incentives = incentives;
        self
    }

    /// Defaults for a region id, falling back to the default region.
    pub fn lookup(&self, region: Option<&str>) -> &RegionDefaults {
        region
            .and_then(|r| self.regions.get(r))
            .unwrap_or(&self.default)
    }
}

impl SiteData for RegionTable {
    fn region_defaults(&self, location: &Location) -> RegionDefaults {
        self.lookup(location.region.as_deref()).clone()
    }

    fn incentives(&self, location: &Location) -> Vec<IncentiveRecord> {
        let region = location.region.as_deref();
        self.incentives
            .iter()
            .filter(|e| e.applies_to(region))
            .map(IncentiveEntry::record)
            .collect()
    }
}
