//! Error types raised by the assessment engine.

use thiserror::Error;

/// Fatal assessment failures. Advisory states (area-constrained designs,
/// never-pays-back projections) are carried on the result instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssessmentError {
    /// The location has no usable latitude/longitude pair.
    #[error("insufficient location data for \"{address}\": {reason}")]
    InsufficientLocationData {
        /// Address as resolved by the geocoder.
        address: String,
        /// Which part of the coordinate pair is unusable.
        reason: &'static str,
    },
    /// A per-request override is outside its valid range.
    #[error("invalid override {field}: {reason}")]
    InvalidOverride {
        /// Override field name (e.g. `escalation_rate`).
        field: &'static str,
        /// Constraint the value violates.
        reason: &'static str,
    },
}
