//! Suitability scoring.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::roof::RoofProfile;
use super::sizer::SystemDesign;

const IRRADIANCE_WEIGHT: f64 = 0.5;
const QUALITY_WEIGHT: f64 = 0.3;
const FULFILLMENT_WEIGHT: f64 = 0.2;

/// Lowest score in the `Good` band.
pub const GOOD_THRESHOLD: u8 = 40;
/// Lowest score in the `Excellent` band.
pub const EXCELLENT_THRESHOLD: u8 = 75;

/// Qualitative suitability band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    /// Below 40.
    Poor,
    /// 40 to 74.
    Good,
    /// 75 and above.
    Excellent,
}

impl ScoreBand {
    /// Band for a 0-100 score.
    pub fn from_score(value: u8) -> Self {
        if value >= EXCELLENT_THRESHOLD {
            Self::Excellent
        } else if value >= GOOD_THRESHOLD {
            Self::Good
        } else {
            Self::Poor
        }
    }

    /// Headline shown with the recommendation.
    pub fn recommendation(self) -> &'static str {
        match self {
            Self::Excellent => "Solar is highly recommended for your home!",
            Self::Good => "Solar is recommended for your home.",
            Self::Poor => "Solar is not recommended for your home at this time.",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Poor => "Poor",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        };
        f.write_str(label)
    }
}

/// A 0-100 suitability rating with its band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuitabilityScore {
    /// Integer score in [0, 100].
    pub value: u8,
    /// Band derived from `value`.
    pub band: ScoreBand,
}

impl SuitabilityScore {
    /// Wraps a score, clamping to 100.
    pub fn new(value: u8) -> Self {
        let value = value.min(100);
        Self {
            value,
            band: ScoreBand::from_score(value),
        }
    }
}

/// Scores a design at a location.
///
/// Weighted sum of irradiance (50%), roof orientation x shading quality
/// (30%) and the share of the energy target the design achieves (20%).
/// Each term is clamped to [0, 1] first; non-finite inputs count as 0.
pub fn score(
    design: &SystemDesign,
    roof: &RoofProfile,
    irradiance_factor: f64,
) -> SuitabilityScore {
    let weighted = IRRADIANCE_WEIGHT * unit(irradiance_factor)
        + QUALITY_WEIGHT * unit(roof.quality())
        + FULFILLMENT_WEIGHT * unit(design.target_fulfillment());
    let value = (weighted * 100.0).round().clamp(0.0, 100.0) as u8;
    SuitabilityScore::new(value)
}

fn unit(x: f64) -> f64 {
    if x.is_finite() { x.clamp(0.0, 1.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn design(panels: u32, target: u32) -> SystemDesign {
        SystemDesign {
            panel_count: panels,
            target_panel_count: target,
            capacity_kw: f64::from(panels) * 0.4,
            area_used_sqft: f64::from(panels) * 17.5,
            coverage_ratio: 0.3,
            area_constrained: panels < target,
        }
    }

    fn roof(orientation: f64, shading: f64) -> RoofProfile {
        RoofProfile {
            usable_area_sqft: 1200.0,
            orientation_factor: orientation,
            shading_factor: shading,
        }
    }

    #[test]
    fn band_thresholds_are_exact() {
        assert_eq!(ScoreBand::from_score(39), ScoreBand::Poor);
        assert_eq!(ScoreBand::from_score(40), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(74), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(75), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(0), ScoreBand::Poor);
        assert_eq!(ScoreBand::from_score(100), ScoreBand::Excellent);
    }

    #[test]
    fn perfect_inputs_score_100() {
        let s = score(&design(18, 18), &roof(1.0, 1.0), 1.0);
        assert_eq!(s.value, 100);
        assert_eq!(s.band, ScoreBand::Excellent);
    }

    #[test]
    fn weighted_combination() {
        // 0.5*0.84 + 0.3*(0.95*0.88) + 0.2*1.0 = 0.8708
        let s = score(&design(18, 18), &roof(0.95, 0.88), 0.84);
        assert_eq!(s.value, 87);
    }

    #[test]
    fn constrained_design_loses_fulfillment_weight() {
        // 0.5*1 + 0.3*1 + 0.2*(18/22)
        let s = score(&design(18, 22), &roof(1.0, 1.0), 1.0);
        assert_eq!(s.value, 96);
    }

    #[test]
    fn out_of_range_inputs_are_clamped() {
        let s = score(&design(0, 10), &roof(0.0, 0.0), -3.0);
        assert_eq!(s.value, 0);
        assert_eq!(s.band, ScoreBand::Poor);

        let s = score(&design(10, 10), &roof(1.0, 1.0), f64::NAN);
        assert_eq!(s.value, 50);
        assert_eq!(s.band, ScoreBand::Good);
    }

    #[test]
    fn display_labels() {
        assert_eq!(ScoreBand::Excellent.to_string(), "Excellent");
        assert_eq!(ScoreBand::Poor.to_string(), "Poor");
    }
}
