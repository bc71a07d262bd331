//! Environmental impact of a design.

use serde::{Deserialize, Serialize};

use super::sizer::SystemDesign;

/// Default grid carbon intensity (kg CO2 per kWh displaced).
pub const DEFAULT_CO2_KG_PER_KWH: f64 = 0.417;

/// Annual energy and emissions displaced by a design.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalImpact {
    /// Expected annual production (kWh).
    pub annual_production_kwh: f64,
    /// Avoided emissions (metric tons CO2 per year).
    pub co2_tons_per_year: f64,
}

impl EnvironmentalImpact {
    /// Estimates impact from capacity, regional yield, and grid intensity.
    pub fn estimate(
        design: &SystemDesign,
        production_kwh_per_kw: f64,
        co2_kg_per_kwh: f64,
    ) -> Self {
        let annual_production_kwh = design.capacity_kw * production_kwh_per_kw.max(0.0);
        Self {
            annual_production_kwh,
            co2_tons_per_year: annual_production_kwh * co2_kg_per_kwh.max(0.0) / 1000.0,
        }
    }
}
