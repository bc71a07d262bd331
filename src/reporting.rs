//! Plain-text assessment summary.

use std::fmt;

use crate::engine::Assessment;
use crate::engine::finance::{Payback, reporting_years};
use crate::engine::incentives::Recurrence;

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Solar Assessment: {} ---", self.location.address)?;
        writeln!(
            f,
            "Suitability score:     {}/100 ({})",
            self.score.value, self.score.band
        )?;
        writeln!(
            f,
            "System size:           {:.1} kW ({} panels)",
            self.design.capacity_kw, self.design.panel_count
        )?;
        writeln!(
            f,
            "Roof coverage:         {:.0}% of {:.0} sq ft",
            self.design.coverage_ratio * 100.0,
            self.roof.usable_area_sqft
        )?;
        if self.design.area_constrained {
            writeln!(
                f,
                "                       limited by roof area ({} panels targeted)",
                self.design.target_panel_count
            )?;
        }
        writeln!(
            f,
            "Annual savings:        ${:.0}",
            self.projection.first_year_savings()
        )?;
        match self.payback {
            Payback::Years(y) => writeln!(f, "Payback period:        {y:.1} years")?,
            Payback::NeverPaysBack => writeln!(
                f,
                "Payback period:        no payback within {} years",
                self.projection.horizon_years()
            )?,
        }
        writeln!(
            f,
            "Environmental impact:  {:.1} tons CO2 saved/year",
            self.impact.co2_tons_per_year
        )?;

        writeln!(f)?;
        writeln!(
            f,
            "{}-year savings projection:",
            self.projection.horizon_years()
        )?;
        for y in self
            .projection
            .sample(&reporting_years(self.projection.horizon_years()))
        {
            writeln!(
                f,
                "  Year {:>2}: ${:>8.0}  cumulative ${:>9.0}",
                y.year, y.annual_savings, y.cumulative_savings
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Available incentives:")?;
        for r in &self.incentives.records {
            let suffix = match r.recurrence {
                Recurrence::OneTime => "",
                Recurrence::Annual => "/year",
            };
            let status = if r.eligible { "" } else { "  (not eligible)" };
            writeln!(
                f,
                "  [{}] {}: ${:.0}{suffix}{status}",
                r.category, r.name, r.amount
            )?;
        }
        writeln!(
            f,
            "Total incentives:      ${:.0} (annual items over {} years)",
            self.incentives.total, self.incentives.horizon_years
        )?;

        writeln!(f)?;
        write!(f, "{}", self.score.band.recommendation())
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::roof::Location;
    use crate::engine::{AssessmentRequest, Engine, EngineSettings};
    use crate::region::RegionTable;

    fn render(horizon: u32) -> String {
        let engine = Engine::new(RegionTable::default(), EngineSettings::default());
        let mut request =
            AssessmentRequest::new(Location::new("12 Elm St", 39.7, -104.9, None));
        request.overrides.horizon_years = Some(horizon);
        engine.assess(&request).map(|a| a.to_string()).unwrap_or_default()
    }

    #[test]
    fn summary_lists_sampled_years() {
        let text = render(25);
        assert!(text.contains("Year 10"));
        assert!(text.contains("Year 25"));
        assert!(!text.contains("Year 11"));
    }

    #[test]
    fn summary_reports_missing_payback() {
        let text = render(3);
        assert!(text.contains("no payback within 3 years"));
    }
}
