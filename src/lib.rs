//! Rooftop solar suitability and savings engine.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod engine;
pub mod io;
pub mod region;
mod reporting;
pub mod telemetry;
