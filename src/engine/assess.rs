//! Assessment engine that chains roof estimation, sizing, scoring,
//! projection, and incentive aggregation.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::AssessmentError;
use super::finance::{
    self, DEFAULT_HORIZON_YEARS, FinancialAssumptions, Payback, SavingsProjection,
};
use super::impact::{DEFAULT_CO2_KG_PER_KWH, EnvironmentalImpact};
use super::incentives::{self, DEFAULT_NORMALIZATION_YEARS, IncentiveSummary};
use super::roof::{self, Location, PropertyMetadata, RoofProfile};
use super::score::{self, SuitabilityScore};
use super::site::SiteData;
use super::sizer::{PanelSpec, SystemDesign, SystemSizer};

/// Longest accepted projection or normalization horizon (years).
pub const MAX_HORIZON_YEARS: u32 = 100;

/// System-wide constants shared by every assessment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Module used for layouts.
    pub panel: PanelSpec,
    /// Installed cost per kW of capacity ($/kW).
    pub cost_per_kw: f64,
    /// Default savings projection horizon (years).
    pub horizon_years: u32,
    /// Default incentive normalization horizon (years).
    pub incentive_horizon_years: u32,
    /// Grid carbon intensity (kg CO2/kWh).
    pub co2_kg_per_kwh: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            panel: PanelSpec::default(),
            cost_per_kw: 3500.0,
            horizon_years: DEFAULT_HORIZON_YEARS,
            incentive_horizon_years: DEFAULT_NORMALIZATION_YEARS,
            co2_kg_per_kwh: DEFAULT_CO2_KG_PER_KWH,
        }
    }
}

/// Per-request parameter overrides; `None` falls back to regional or
/// system defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Overrides {
    /// Annual energy offset target (kWh).
    pub target_offset_kwh: Option<f64>,
    /// Electricity price ($/kWh).
    pub energy_price_per_kwh: Option<f64>,
    /// Annual price escalation (fraction).
    pub escalation_rate: Option<f64>,
    /// Projection horizon (years).
    pub horizon_years: Option<u32>,
    /// Incentive normalization horizon (years).
    pub incentive_horizon_years: Option<u32>,
}

/// Inputs for one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRequest {
    /// Geocoded location.
    pub location: Location,
    /// Optional property hints.
    #[serde(default)]
    pub property: Option<PropertyMetadata>,
    /// Optional parameter overrides.
    #[serde(default)]
    pub overrides: Overrides,
}

impl Overrides {
    /// Returns every override outside its valid range.
    ///
    /// NaN fails every check. Horizons are capped at `MAX_HORIZON_YEARS`.
    pub fn validate(&self) -> Vec<AssessmentError> {
        let mut errors = Vec::new();
        let mut invalid = |field, reason| {
            errors.push(AssessmentError::InvalidOverride { field, reason });
        };

        if self.target_offset_kwh.is_some_and(|t| !(t.is_finite() && t >= 0.0)) {
            invalid("target_offset_kwh", "must be a finite value >= 0");
        }
        if self
            .energy_price_per_kwh
            .is_some_and(|p| !(p.is_finite() && p >= 0.0))
        {
            invalid("energy_price_per_kwh", "must be a finite value >= 0");
        }
        if self.escalation_rate.is_some_and(|r| !(r.is_finite() && r > -1.0)) {
            invalid("escalation_rate", "must be a finite value > -1.0");
        }
        if self
            .horizon_years
            .is_some_and(|h| !(1..=MAX_HORIZON_YEARS).contains(&h))
        {
            invalid("horizon_years", "must be in 1..=100");
        }
        if self
            .incentive_horizon_years
            .is_some_and(|h| h > MAX_HORIZON_YEARS)
        {
            invalid("incentive_horizon_years", "must be <= 100");
        }
        errors
    }
}

impl AssessmentRequest {
    /// Request with no property hints or overrides.
    pub fn new(location: Location) -> Self {
        Self {
            location,
            property: None,
            overrides: Overrides::default(),
        }
    }
}

/// Complete engine output for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Location assessed.
    pub location: Location,
    /// Derived roof profile.
    pub roof: RoofProfile,
    /// Achievable system.
    pub design: SystemDesign,
    /// Suitability rating.
    pub score: SuitabilityScore,
    /// Assumptions the projection was computed with.
    pub assumptions: FinancialAssumptions,
    /// Every projected year.
    pub projection: SavingsProjection,
    /// Aggregated incentives.
    pub incentives: IncentiveSummary,
    /// Installed cost less incentive total ($).
    pub net_system_cost: f64,
    /// Break-even outcome.
    pub payback: Payback,
    /// Displaced energy and emissions.
    pub impact: EnvironmentalImpact,
}

/// Assessment engine over a `SiteData` source.
///
/// Generic over `D: SiteData` for static dispatch. Holds no mutable state;
/// `assess` may be called concurrently through a shared reference.
#[derive(Debug, Clone)]
pub struct Engine<D: SiteData> {
    data: D,
    settings: EngineSettings,
    sizer: SystemSizer,
}

impl<D: SiteData> Engine<D> {
    /// Creates an engine.
    ///
    /// # Panics
    ///
    /// Panics if the panel spec has non-positive wattage or footprint.
    pub fn new(data: D, settings: EngineSettings) -> Self {
        Self {
            sizer: SystemSizer::new(settings.panel),
            data,
            settings,
        }
    }

    /// Settings this engine was built with.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Regional data source.
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Runs a full assessment.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOverride` for the first out-of-range override, or
    /// `InsufficientLocationData` if the location has no usable
    /// coordinates. No partial result is produced in either case.
    pub fn assess(&self, request: &AssessmentRequest) -> Result<Assessment, AssessmentError> {
        let location = &request.location;
        let overrides = &request.overrides;
        if let Some(err) = overrides.validate().into_iter().next() {
            return Err(err);
        }
        let region = self.data.region_defaults(location);

        let roof = roof::estimate_roof_profile(
            location,
            request.property.as_ref(),
            region.usable_roof_area_sqft,
        )?;

        let target_offset_kwh = overrides
            .target_offset_kwh
            .unwrap_or(region.household_consumption_kwh);
        let design = self
            .sizer
            .size(&roof, target_offset_kwh, region.production_kwh_per_kw);

        let score = score::score(&design, &roof, self.data.irradiance_factor(location));

        let assumptions = FinancialAssumptions {
            energy_price_per_kwh: overrides
                .energy_price_per_kwh
                .unwrap_or_else(|| self.data.energy_price_per_kwh(location)),
            escalation_rate: overrides.escalation_rate.unwrap_or(region.escalation_rate),
            production_kwh_per_kw: region.production_kwh_per_kw,
            horizon_years: overrides.horizon_years.unwrap_or(self.settings.horizon_years),
        };
        let projection = finance::project(&design, &assumptions);

        let incentives = incentives::aggregate(
            self.data.incentives(location),
            overrides
                .incentive_horizon_years
                .unwrap_or(self.settings.incentive_horizon_years),
        );

        let net_system_cost =
            finance::net_system_cost(&design, self.settings.cost_per_kw, incentives.total);
        let payback = finance::payback_period(&projection, net_system_cost);
        let impact = EnvironmentalImpact::estimate(
            &design,
            region.production_kwh_per_kw,
            self.settings.co2_kg_per_kwh,
        );

        info!(
            address = %location.address,
            score = score.value,
            band = %score.band,
            panels = design.panel_count,
            capacity_kw = design.capacity_kw,
            "assessment complete"
        );

        Ok(Assessment {
            location: location.clone(),
            roof,
            design,
            score,
            assumptions,
            projection,
            incentives,
            net_system_cost,
            payback,
            impact,
        })
    }
}
