//! System sizing: energy target to panel count, clamped to the roof.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::roof::RoofProfile;

/// Tolerance absorbing float noise before rounding panel counts
/// (e.g. 7.2 kW / 0.4 kW evaluating to 18.000000000000004).
const ROUNDING_EPS: f64 = 1e-9;

/// Physical characteristics of a single module.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    /// Nameplate rating per panel (W).
    pub watts: f64,
    /// Roof area occupied per panel (sq ft).
    pub footprint_sqft: f64,
}

impl Default for PanelSpec {
    fn default() -> Self {
        Self {
            watts: 400.0,
            footprint_sqft: 17.5,
        }
    }
}

/// A recommended (achievable) PV system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemDesign {
    /// Installed panel count after any roof-area clamp.
    pub panel_count: u32,
    /// Panel count implied by the energy target alone.
    pub target_panel_count: u32,
    /// Nameplate capacity: `panel_count * watts / 1000` (kW).
    pub capacity_kw: f64,
    /// Roof area occupied by the installed panels (sq ft).
    pub area_used_sqft: f64,
    /// `area_used_sqft / usable_area_sqft`, in [0, 1].
    pub coverage_ratio: f64,
    /// True when the roof could not fit `target_panel_count`.
    pub area_constrained: bool,
}

impl SystemDesign {
    /// Fraction of the target panel count actually installed (0.0 to 1.0).
    ///
    /// A zero target counts as fully met.
    pub fn target_fulfillment(&self) -> f64 {
        if self.target_panel_count == 0 {
            return 1.0;
        }
        (f64::from(self.panel_count) / f64::from(self.target_panel_count)).min(1.0)
    }
}

/// Converts an annual energy offset into a panel layout.
#[derive(Debug, Clone, Copy)]
pub struct SystemSizer {
    panel: PanelSpec,
}

impl SystemSizer {
    /// Creates a sizer for the given module.
    ///
    /// # Panics
    ///
    /// Panics if panel wattage or footprint is not positive.
    pub fn new(panel: PanelSpec) -> Self {
        assert!(panel.watts > 0.0, "panel watts must be > 0");
        assert!(panel.footprint_sqft > 0.0, "panel footprint must be > 0");
        Self { panel }
    }

    /// Returns the module this sizer lays out.
    pub fn panel(&self) -> PanelSpec {
        self.panel
    }

    /// Sizes a system for `target_offset_kwh` of annual production.
    ///
    /// # Arguments
    ///
    /// * `roof` - Roof profile bounding the layout
    /// * `target_offset_kwh` - Annual energy the system should offset (kWh)
    /// * `production_kwh_per_kw` - Regional yield per installed kW per year
    ///
    /// # Returns
    ///
    /// The achievable design. When the target layout exceeds the shaded
    /// usable area, the panel count is clamped to what fits and the design
    /// is flagged `area_constrained`; coverage always reflects the clamped
    /// count.
    pub fn size(
        &self,
        roof: &RoofProfile,
        target_offset_kwh: f64,
        production_kwh_per_kw: f64,
    ) -> SystemDesign {
        let required_kw = if production_kwh_per_kw > 0.0 {
            target_offset_kwh.max(0.0) / production_kwh_per_kw
        } else {
            0.0
        };
        let target_panel_count = round_up(required_kw * 1000.0 / self.panel.watts);
        let max_fit = round_down(roof.effective_area_sqft() / self.panel.footprint_sqft);

        let area_constrained = target_panel_count > max_fit;
        let panel_count = target_panel_count.min(max_fit);
        if area_constrained {
            info!(
                target_panel_count,
                panel_count, "target layout exceeds roof area, clamping panel count"
            );
        }

        let area_used_sqft = f64::from(panel_count) * self.panel.footprint_sqft;
        let coverage_ratio = if roof.usable_area_sqft > 0.0 {
            (area_used_sqft / roof.usable_area_sqft).min(1.0)
        } else {
            0.0
        };

        let design = SystemDesign {
            panel_count,
            target_panel_count,
            capacity_kw: f64::from(panel_count) * self.panel.watts / 1000.0,
            area_used_sqft,
            coverage_ratio,
            area_constrained,
        };
        debug!(
            required_kw,
            capacity_kw = design.capacity_kw,
            coverage = design.coverage_ratio,
            "sized system"
        );
        design
    }
}

fn round_up(x: f64) -> u32 {
    if !x.is_finite() || x <= 0.0 {
        return 0;
    }
    (x - ROUNDING_EPS).ceil().min(f64::from(u32::MAX)) as u32
}

fn round_down(x: f64) -> u32 {
    if !x.is_finite() || x <= 0.0 {
        return 0;
    }
    (x + ROUNDING_EPS).floor().min(f64::from(u32::MAX)) as u32
}
