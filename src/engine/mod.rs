//! Solar suitability engine: roof estimation, sizing, scoring, projection,
//! and incentive aggregation.

/// Request orchestration across all components.
pub mod assess;
pub mod error;
/// Savings projection and payback.
pub mod finance;
pub mod impact;
/// Incentive normalization and totals.
pub mod incentives;
/// Location handling and roof profile estimation.
pub mod roof;
pub mod score;
/// Upstream collaborator trait.
pub mod site;
pub mod sizer;

pub use assess::{
    Assessment, AssessmentRequest, Engine, EngineSettings, MAX_HORIZON_YEARS, Overrides,
};
pub use error::AssessmentError;
pub use site::SiteData;
