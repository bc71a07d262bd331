//! Upstream data collaborators consumed by the engine.

use super::incentives::IncentiveRecord;
use super::roof::Location;
use crate::region::RegionDefaults;

/// Source of location-keyed inputs: regional defaults, solar resource,
/// energy prices, and the incentive catalog.
///
/// Implementations hand the engine already-resolved values; any network
/// access, retries, or caching happen behind this trait.
pub trait SiteData {
    /// Regional defaults for the location.
    fn region_defaults(&self, location: &Location) -> RegionDefaults;

    /// Normalized solar resource (0.0 to 1.0).
    fn irradiance_factor(&self, location: &Location) -> f64 {
        self.region_defaults(location).irradiance_factor
    }

    /// Retail electricity price ($/kWh).
    fn energy_price_per_kwh(&self, location: &Location) -> f64 {
        self.region_defaults(location).energy_price_per_kwh
    }

    /// Incentives available at the location, in catalog order.
    fn incentives(&self, location: &Location) -> Vec<IncentiveRecord>;
}
