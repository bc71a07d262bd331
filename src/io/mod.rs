/// Incentive catalog import from CSV.
pub mod catalog;
/// Savings projection export to CSV.
pub mod export;
