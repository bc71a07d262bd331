//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use solar_suitability::config::ScenarioConfig;
use solar_suitability::engine::incentives::{IncentiveCategory, IncentiveRecord, Recurrence};
use solar_suitability::engine::roof::Location;
use solar_suitability::engine::{AssessmentRequest, Engine, EngineSettings};
use solar_suitability::region::{RegionDefaults, RegionTable};

/// Reference address with resolved coordinates and no region id.
pub fn default_location() -> Location {
    Location::new("1600 Capitol Ave, Sacramento, CA", 38.576, -121.493, None)
}

/// The four incentives from the reference results page.
pub fn reference_incentives() -> Vec<IncentiveRecord> {
    vec![
        IncentiveRecord::new(
            "Federal Solar Tax Credit",
            7200.0,
            Recurrence::OneTime,
            IncentiveCategory::Federal,
        ),
        IncentiveRecord::new(
            "State Renewable Energy Rebate",
            1500.0,
            Recurrence::OneTime,
            IncentiveCategory::State,
        ),
        IncentiveRecord::new(
            "Local Utility Incentive",
            800.0,
            Recurrence::OneTime,
            IncentiveCategory::Utility,
        ),
        IncentiveRecord::new(
            "Property Tax Exemption",
            450.0,
            Recurrence::Annual,
            IncentiveCategory::Tax,
        ),
    ]
}

/// Engine over default regional data with no incentives.
pub fn default_engine() -> Engine<RegionTable> {
    Engine::new(
        RegionTable::new(RegionDefaults::default(), Default::default(), Vec::new()),
        EngineSettings::default(),
    )
}

/// Engine and request built from a named preset.
pub fn preset(name: &str) -> (Engine<RegionTable>, AssessmentRequest) {
    let cfg = ScenarioConfig::from_preset(name).unwrap();
    (Engine::new(cfg.region_table(), cfg.settings()), cfg.request())
}
