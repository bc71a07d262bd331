//! Location and roof profile estimation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::AssessmentError;

/// A geocoded address.
///
/// Produced by an external geocoder. Coordinates stay optional because the
/// geocoder may return a partial match; the estimator rejects those.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Resolved address string.
    pub address: String,
    /// Latitude in decimal degrees (-90 to 90).
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees (-180 to 180).
    pub longitude: Option<f64>,
    /// Region identifier keying irradiance, price, and incentive lookups.
    pub region: Option<String>,
}

impl Location {
    /// Creates a fully resolved location.
    pub fn new(address: &str, latitude: f64, longitude: f64, region: Option<&str>) -> Self {
        Self {
            address: address.to_string(),
            latitude: Some(latitude),
            longitude: Some(longitude),
            region: region.map(str::to_string),
        }
    }

    /// Returns the coordinate pair, or why it cannot be used.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientLocationData` when either coordinate is missing,
    /// non-finite, or out of range.
    pub fn coordinates(&self) -> Result<(f64, f64), AssessmentError> {
        let insufficient = |reason| AssessmentError::InsufficientLocationData {
            address: self.address.clone(),
            reason,
        };
        let (Some(lat), Some(lon)) = (self.latitude, self.longitude) else {
            return Err(insufficient("coordinates not resolved"));
        };
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(insufficient("latitude out of range"));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(insufficient("longitude out of range"));
        }
        Ok((lat, lon))
    }
}

/// Optional property attributes supplied alongside a location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PropertyMetadata {
    /// Usable roof area hint (sq ft).
    pub roof_area_sqft: Option<f64>,
    /// Shading factor hint (0.0 = fully shaded, 1.0 = unshaded).
    pub shading: Option<f64>,
    /// Orientation/tilt quality hint (0.0 to 1.0).
    pub orientation: Option<f64>,
}

/// Physical roof characteristics for one location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoofProfile {
    /// Usable roof area (sq ft, >= 0).
    pub usable_area_sqft: f64,
    /// Orientation/tilt quality factor (0.0 to 1.0).
    pub orientation_factor: f64,
    /// Shading factor (0.0 to 1.0, 1.0 = no shading).
    pub shading_factor: f64,
}

impl RoofProfile {
    /// Area panels may actually occupy once shading is accounted for.
    pub fn effective_area_sqft(&self) -> f64 {
        self.usable_area_sqft * self.shading_factor
    }

    /// Combined orientation and shading quality (0.0 to 1.0).
    pub fn quality(&self) -> f64 {
        self.orientation_factor * self.shading_factor
    }
}

/// Derives the roof profile for a location.
///
/// Missing hints fall back to `regional_area_sqft` for area and to a neutral
/// 1.0 for orientation and shading. Hints outside their valid range are
/// clamped rather than rejected.
///
/// # Errors
///
/// Returns `InsufficientLocationData` if the location has no usable
/// coordinates.
pub fn estimate_roof_profile(
    location: &Location,
    property: Option<&PropertyMetadata>,
    regional_area_sqft: f64,
) -> Result<RoofProfile, AssessmentError> {
    location.coordinates()?;

    let hints = property.cloned().unwrap_or_default();
    let usable_area_sqft = hints
        .roof_area_sqft
        .filter(|a| a.is_finite())
        .unwrap_or(regional_area_sqft)
        .max(0.0);

    let profile = RoofProfile {
        usable_area_sqft,
        orientation_factor: unit_factor(hints.orientation),
        shading_factor: unit_factor(hints.shading),
    };
    debug!(
        address = %location.address,
        usable_area_sqft = profile.usable_area_sqft,
        orientation = profile.orientation_factor,
        shading = profile.shading_factor,
        "estimated roof profile"
    );
    Ok(profile)
}

/// Unknown or non-finite factors are neutral.
fn unit_factor(hint: Option<f64>) -> f64 {
    hint.filter(|f| f.is_finite())
        .map_or(1.0, |f| f.clamp(0.0, 1.0))
}
