//! TOML-based scenario configuration and preset definitions.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::engine::incentives::{IncentiveCategory, IncentiveRecord, Recurrence};
use crate::engine::roof::{Location, PropertyMetadata};
use crate::engine::sizer::PanelSpec;
use crate::engine::{
    AssessmentError, AssessmentRequest, EngineSettings, MAX_HORIZON_YEARS, Overrides,
};
use crate::region::{IncentiveEntry, RegionDefaults, RegionTable};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Geocoded location to assess.
    #[serde(default)]
    pub location: LocationConfig,
    /// Optional property hints.
    #[serde(default)]
    pub property: Option<PropertyMetadata>,
    /// Per-request parameter overrides.
    #[serde(default)]
    pub overrides: Overrides,
    /// System-wide constants.
    #[serde(default)]
    pub system: SystemConfig,
    /// Defaults for locations without a known region.
    #[serde(default)]
    pub default_region: RegionDefaults,
    /// Named regional defaults keyed by region id.
    #[serde(default)]
    pub regions: BTreeMap<String, RegionDefaults>,
    /// Incentive catalog.
    #[serde(default)]
    pub incentives: Vec<IncentiveEntry>,
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Location as delivered by the geocoder.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocationConfig {
    /// Resolved address.
    pub address: String,
    /// Latitude (decimal degrees).
    pub latitude: Option<f64>,
    /// Longitude (decimal degrees).
    pub longitude: Option<f64>,
    /// Region id.
    pub region: Option<String>,
}

impl LocationConfig {
    fn resolved(address: &str, latitude: f64, longitude: f64, region: &str) -> Self {
        Self {
            address: address.to_string(),
            latitude: Some(latitude),
            longitude: Some(longitude),
            region: Some(region.to_string()),
        }
    }
}

/// System-wide constants.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConfig {
    /// Panel nameplate rating (W).
    pub panel_watts: f64,
    /// Panel footprint (sq ft).
    pub panel_footprint_sqft: f64,
    /// Installed cost ($/kW).
    pub cost_per_kw: f64,
    /// Savings projection horizon (years).
    pub horizon_years: u32,
    /// Years over which annual incentives are counted.
    pub incentive_horizon_years: u32,
    /// Grid carbon intensity (kg CO2/kWh).
    pub co2_kg_per_kwh: f64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let settings = EngineSettings::default();
        Self {
            panel_watts: settings.panel.watts,
            panel_footprint_sqft: settings.panel.footprint_sqft,
            cost_per_kw: settings.cost_per_kw,
            horizon_years: settings.horizon_years,
            incentive_horizon_years: settings.incentive_horizon_years,
            co2_kg_per_kwh: settings.co2_kg_per_kwh,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"system.panel_watts"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// The four incentives listed for the reference address.
fn reference_incentives() -> Vec<IncentiveEntry> {
    fn entry(
        name: &str,
        amount: f64,
        recurrence: Recurrence,
        category: IncentiveCategory,
        description: &str,
    ) -> IncentiveEntry {
        IncentiveEntry::from_record(IncentiveRecord {
            description: description.to_string(),
            ..IncentiveRecord::new(name, amount, recurrence, category)
        })
    }
    vec![
        entry(
            "Federal Solar Tax Credit",
            7200.0,
            Recurrence::OneTime,
            IncentiveCategory::Federal,
            "30% of system cost (expires 2032)",
        ),
        entry(
            "State Renewable Energy Rebate",
            1500.0,
            Recurrence::OneTime,
            IncentiveCategory::State,
            "Cash rebate for residential solar",
        ),
        entry(
            "Local Utility Incentive",
            800.0,
            Recurrence::OneTime,
            IncentiveCategory::Utility,
            "Net metering program",
        ),
        entry(
            "Property Tax Exemption",
            450.0,
            Recurrence::Annual,
            IncentiveCategory::Tax,
            "Solar system value exempt from taxes",
        ),
    ]
}

impl ScenarioConfig {
    /// Returns the baseline scenario: an 18-panel, 7.2 kW home with the
    /// reference incentive list.
    pub fn baseline() -> Self {
        Self {
            location: LocationConfig::resolved(
                "1600 Capitol Ave, Sacramento, CA",
                38.576,
                -121.493,
                "CA",
            ),
            property: Some(PropertyMetadata {
                roof_area_sqft: Some(1200.0),
                shading: Some(0.88),
                orientation: Some(0.95),
            }),
            overrides: Overrides::default(),
            system: SystemConfig::default(),
            default_region: RegionDefaults::default(),
            regions: BTreeMap::new(),
            incentives: reference_incentives(),
            logging: LoggingConfig::default(),
        }
    }

    /// Returns the sunbelt preset: high-yield desert region, no property hints.
    pub fn sunbelt() -> Self {
        let mut regions = BTreeMap::new();
        regions.insert(
            "AZ".to_string(),
            RegionDefaults {
                usable_roof_area_sqft: 1500.0,
                production_kwh_per_kw: 1750.0,
                household_consumption_kwh: 12_500.0,
                energy_price_per_kwh: 0.13,
                escalation_rate: 0.028,
                irradiance_factor: 0.97,
            },
        );
        let mut incentives = reference_incentives();
        incentives.truncate(1);
        incentives.push(IncentiveEntry {
            region: Some("AZ".to_string()),
            ..IncentiveEntry::from_record(IncentiveRecord::new(
                "Residential Solar Energy Credit",
                1000.0,
                Recurrence::OneTime,
                IncentiveCategory::State,
            ))
        });
        Self {
            location: LocationConfig::resolved(
                "200 W Washington St, Phoenix, AZ",
                33.448,
                -112.074,
                "AZ",
            ),
            property: None,
            regions,
            incentives,
            ..Self::baseline()
        }
    }

    /// Returns the small-roof preset: the energy target needs 22 panels but
    /// only 18 fit.
    pub fn small_roof() -> Self {
        Self {
            property: Some(PropertyMetadata {
                roof_area_sqft: Some(330.0),
                shading: Some(1.0),
                orientation: Some(0.9),
            }),
            overrides: Overrides {
                target_offset_kwh: Some(12_320.0),
                ..Overrides::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "sunbelt", "small_roof"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "sunbelt" => Ok(Self::sunbelt()),
            "small_roof" => Ok(Self::small_roof()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Engine settings from the `[system]` table.
    pub fn settings(&self) -> EngineSettings {
        let s = &self.system;
        EngineSettings {
            panel: PanelSpec {
                watts: s.panel_watts,
                footprint_sqft: s.panel_footprint_sqft,
            },
            cost_per_kw: s.cost_per_kw,
            horizon_years: s.horizon_years,
            incentive_horizon_years: s.incentive_horizon_years,
            co2_kg_per_kwh: s.co2_kg_per_kwh,
        }
    }

    /// Regional lookup table from the region and incentive tables.
    pub fn region_table(&self) -> RegionTable {
        RegionTable::new(
            self.default_region.clone(),
            self.regions.clone(),
            self.incentives.clone(),
        )
    }

    /// Assessment request for the configured location.
    pub fn request(&self) -> AssessmentRequest {
        let l = &self.location;
        AssessmentRequest {
            location: Location {
                address: l.address.clone(),
                latitude: l.latitude,
                longitude: l.longitude,
                region: l.region.clone(),
            },
            property: self.property.clone(),
            overrides: self.overrides.clone(),
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. Coordinates are
    /// checked by the engine, not here.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.system;
        if !positive(s.panel_watts) {
            errors.push(ConfigError::new("system.panel_watts", "must be > 0"));
        }
        if !positive(s.panel_footprint_sqft) {
            errors.push(ConfigError::new("system.panel_footprint_sqft", "must be > 0"));
        }
        if !non_negative(s.cost_per_kw) {
            errors.push(ConfigError::new("system.cost_per_kw", "must be >= 0"));
        }
        if !(1..=MAX_HORIZON_YEARS).contains(&s.horizon_years) {
            errors.push(ConfigError::new(
                "system.horizon_years",
                format!("must be in 1..={MAX_HORIZON_YEARS}"),
            ));
        }
        if s.incentive_horizon_years > MAX_HORIZON_YEARS {
            errors.push(ConfigError::new(
                "system.incentive_horizon_years",
                format!("must be <= {MAX_HORIZON_YEARS}"),
            ));
        }
        if !non_negative(s.co2_kg_per_kwh) {
            errors.push(ConfigError::new("system.co2_kg_per_kwh", "must be >= 0"));
        }

        validate_region("default_region", &self.default_region, &mut errors);
        for (id, region) in &self.regions {
            validate_region(&format!("regions.{id}"), region, &mut errors);
        }

        if let Some(p) = &self.property {
            if p.roof_area_sqft.is_some_and(|a| !non_negative(a)) {
                errors.push(ConfigError::new("property.roof_area_sqft", "must be >= 0"));
            }
            if p.shading.is_some_and(|f| !(0.0..=1.0).contains(&f)) {
                errors.push(ConfigError::new("property.shading", "must be in [0.0, 1.0]"));
            }
            if p.orientation.is_some_and(|f| !(0.0..=1.0).contains(&f)) {
                errors.push(ConfigError::new(
                    "property.orientation",
                    "must be in [0.0, 1.0]",
                ));
            }
        }

        for err in self.overrides.validate() {
            if let AssessmentError::InvalidOverride { field, reason } = err {
                errors.push(ConfigError::new(format!("overrides.{field}"), reason));
            }
        }

        for (i, entry) in self.incentives.iter().enumerate() {
            if entry.name.trim().is_empty() {
                errors.push(ConfigError::new(
                    format!("incentives[{i}].name"),
                    "must not be empty",
                ));
            }
            if !non_negative(entry.amount) {
                errors.push(ConfigError::new(
                    format!("incentives[{i}].amount"),
                    "must be >= 0",
                ));
            }
            if let Some(region) = &entry.region {
                if !self.regions.contains_key(region) {
                    errors.push(ConfigError::new(
                        format!("incentives[{i}].region"),
                        format!("unknown region \"{region}\""),
                    ));
                }
            }
        }

        if self.logging.level.trim().is_empty() {
            errors.push(ConfigError::new("logging.level", "must not be empty"));
        }

        errors
    }
}

/// Finite and strictly positive; NaN fails.
fn positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

/// Finite and not negative; NaN fails.
fn non_negative(x: f64) -> bool {
    x.is_finite() && x >= 0.0
}

fn validate_region(prefix: &str, r: &RegionDefaults, errors: &mut Vec<ConfigError>) {
    if !non_negative(r.usable_roof_area_sqft) {
        errors.push(ConfigError::new(
            format!("{prefix}.usable_roof_area_sqft"),
            "must be >= 0",
        ));
    }
    if !positive(r.production_kwh_per_kw) {
        errors.push(ConfigError::new(
            format!("{prefix}.production_kwh_per_kw"),
            "must be > 0",
        ));
    }
    if !non_negative(r.household_consumption_kwh) {
        errors.push(ConfigError::new(
            format!("{prefix}.household_consumption_kwh"),
            "must be >= 0",
        ));
    }
    if !non_negative(r.energy_price_per_kwh) {
        errors.push(ConfigError::new(
            format!("{prefix}.energy_price_per_kwh"),
            "must be >= 0",
        ));
    }
    if !(r.escalation_rate.is_finite() && r.escalation_rate > -1.0) {
        errors.push(ConfigError::new(
            format!("{prefix}.escalation_rate"),
            "must be > -1.0",
        ));
    }
    if !(0.0..=1.0).contains(&r.irradiance_factor) {
        errors.push(ConfigError::new(
            format!("{prefix}.irradiance_factor"),
            "must be in [0.0, 1.0]",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[location]
address = "42 Ridge Rd, Boulder, CO"
latitude = 40.01
longitude = -105.27
region = "CO"

[property]
roof_area_sqft = 900.0
shading = 0.9

[overrides]
escalation_rate = 0.025
horizon_years = 20

[system]
panel_watts = 430.0
cost_per_kw = 3100.0

[regions.CO]
production_kwh_per_kw = 1550.0
irradiance_factor = 0.9

[[incentives]]
name = "Federal Solar Tax Credit"
amount = 7200.0
recurrence = "one_time"
category = "federal"

[[incentives]]
name = "Xcel Solar Rewards"
amount = 300.0
recurrence = "annual"
category = "utility"
eligible = false
region = "CO"

[logging]
level = "debug"
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.incentives.len()), Some(2));
        assert_eq!(
            cfg.as_ref().and_then(|c| c.regions.get("CO")).map(|r| r.production_kwh_per_kw),
            Some(1550.0)
        );
        // unspecified region fields keep defaults
        assert_eq!(
            cfg.as_ref().and_then(|c| c.regions.get("CO")).map(|r| r.energy_price_per_kwh),
            Some(0.1409)
        );
        assert_eq!(cfg.as_ref().map(|c| c.settings().panel.watts), Some(430.0));
        assert_eq!(cfg.as_ref().map(|c| c.validate().len()), Some(0));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[system]
panel_watts = 400.0
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[system]
cost_per_kw = 2900.0
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.system.cost_per_kw), Some(2900.0));
        assert_eq!(cfg.as_ref().map(|c| c.system.horizon_years), Some(25));
        assert_eq!(cfg.as_ref().map(|c| c.system.incentive_horizon_years), Some(10));
        assert_eq!(cfg.as_ref().map(|c| c.incentives.is_empty()), Some(true));
    }

    #[test]
    fn validation_catches_zero_panel_watts() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.system.panel_watts = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "system.panel_watts"));
    }

    #[test]
    fn validation_catches_nan_panel_watts() {
        let cfg = ScenarioConfig::from_toml_str("[system]\npanel_watts = nan\n");
        let errors = cfg.map(|c| c.validate()).unwrap_or_default();
        assert!(errors.iter().any(|e| e.field == "system.panel_watts"));
    }

    #[test]
    fn validation_catches_nan_floats() {
        let toml = r#"
[system]
cost_per_kw = nan
co2_kg_per_kwh = nan

[default_region]
production_kwh_per_kw = nan
energy_price_per_kwh = nan
escalation_rate = nan
"#;
        let errors = ScenarioConfig::from_toml_str(toml)
            .map(|c| c.validate())
            .unwrap_or_default();
        for field in [
            "system.cost_per_kw",
            "system.co2_kg_per_kwh",
            "default_region.production_kwh_per_kw",
            "default_region.energy_price_per_kwh",
            "default_region.escalation_rate",
        ] {
            assert!(
                errors.iter().any(|e| e.field == field),
                "missing {field}: {errors:?}"
            );
        }
    }

    #[test]
    fn validation_catches_bad_overrides() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.overrides.escalation_rate = Some(-2.5);
        cfg.overrides.horizon_years = Some(500);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "overrides.escalation_rate"));
        assert!(errors.iter().any(|e| e.field == "overrides.horizon_years"));
    }

    #[test]
    fn validation_caps_system_horizon() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.system.horizon_years = MAX_HORIZON_YEARS + 1;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "system.horizon_years"));
    }

    #[test]
    fn validation_catches_bad_shading() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.property = Some(PropertyMetadata {
            shading: Some(1.5),
            ..PropertyMetadata::default()
        });
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "property.shading"));
    }

    #[test]
    fn validation_catches_region_irradiance() {
        let mut cfg = ScenarioConfig::sunbelt();
        if let Some(r) = cfg.regions.get_mut("AZ") {
            r.irradiance_factor = 1.2;
        }
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "regions.AZ.irradiance_factor"));
    }

    #[test]
    fn validation_catches_unknown_incentive_region() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.incentives[0].region = Some("ZZ".to_string());
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "incentives[0].region"));
    }

    #[test]
    fn request_carries_location_and_overrides() {
        let cfg = ScenarioConfig::small_roof();
        let req = cfg.request();
        assert_eq!(req.location.region.as_deref(), Some("CA"));
        assert_eq!(req.overrides.target_offset_kwh, Some(12_320.0));
        assert!(req.property.is_some());
    }
}
