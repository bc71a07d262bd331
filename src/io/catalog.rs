//! Incentive catalog import.
//!
//! Expected columns: `name,amount,recurrence,category,eligible,description`.
//! `recurrence`, `eligible` and `description` may be left empty. Amounts
//! accept display formatting (`$7,200`); a `/year` or `/yr` suffix marks an
//! annual incentive when `recurrence` is empty.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::engine::incentives::{IncentiveCategory, IncentiveRecord, Recurrence};

/// Failures while loading an incentive catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The file could not be opened.
    #[error("cannot open incentive catalog: {0}")]
    Io(#[from] std::io::Error),
    /// A row could not be decoded.
    #[error("malformed incentive catalog: {0}")]
    Csv(#[from] csv::Error),
    /// The amount column is not a dollar figure.
    #[error("line {line}: invalid amount \"{value}\"")]
    InvalidAmount {
        /// 1-based line number, header included.
        line: usize,
        /// Raw cell text.
        value: String,
    },
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    name: String,
    amount: String,
    recurrence: Option<Recurrence>,
    category: IncentiveCategory,
    eligible: Option<bool>,
    description: Option<String>,
}

/// Loads an incentive catalog from a CSV file.
///
/// # Errors
///
/// Returns a `CatalogError` if the file cannot be read or a row is invalid.
pub fn load_catalog(path: &Path) -> Result<Vec<IncentiveRecord>, CatalogError> {
    let file = File::open(path)?;
    read_catalog(file)
}

/// Reads an incentive catalog from any reader, preserving row order.
///
/// # Errors
///
/// Returns a `CatalogError` if a row is invalid.
pub fn read_catalog(reader: impl Read) -> Result<Vec<IncentiveRecord>, CatalogError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut records = Vec::new();
    for (i, row) in rdr.deserialize::<CatalogRow>().enumerate() {
        let row = row?;
        let line = i + 2;
        let (amount, annual_suffix) =
            parse_amount(&row.amount).ok_or_else(|| CatalogError::InvalidAmount {
                line,
                value: row.amount.clone(),
            })?;
        let recurrence = row.recurrence.unwrap_or(if annual_suffix {
            Recurrence::Annual
        } else {
            Recurrence::OneTime
        });
        records.push(IncentiveRecord {
            name: row.name,
            amount,
            recurrence,
            category: row.category,
            eligible: row.eligible.unwrap_or(true),
            description: row.description.unwrap_or_default(),
        });
    }
    Ok(records)
}

/// Parses `"$7,200"` or `"$450/year"`; the flag reports a per-year suffix.
fn parse_amount(raw: &str) -> Option<(f64, bool)> {
    let lower = raw.trim().to_ascii_lowercase();
    let (figure, annual) = match lower
        .strip_suffix("/year")
        .or_else(|| lower.strip_suffix("/yr"))
    {
        Some(rest) => (rest, true),
        None => (lower.as_str(), false),
    };
    let cleaned: String = figure
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    let amount = cleaned.parse::<f64>().ok()?;
    (amount.is_finite() && amount >= 0.0).then_some((amount, annual))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::incentives::aggregate;

    const CATALOG: &str = "\
name,amount,recurrence,category,eligible,description
Federal Solar Tax Credit,\"$7,200\",,federal,true,30% of system cost (expires 2032)
State Renewable Energy Rebate,\"$1,500\",,state,,Cash rebate for residential solar
Local Utility Incentive,$800,one_time,utility,true,Net metering program
Property Tax Exemption,$450/year,,tax,true,Solar system value exempt from taxes
";

    #[test]
    fn reads_display_formatted_amounts() {
        let records = read_catalog(CATALOG.as_bytes()).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].amount, 7200.0);
        assert_eq!(records[0].recurrence, Recurrence::OneTime);
        assert!(records[1].eligible);
        assert_eq!(records[3].recurrence, Recurrence::Annual);
        assert_eq!(records[3].amount, 450.0);
        assert_eq!(records[3].category, IncentiveCategory::Tax);
    }

    #[test]
    fn imported_catalog_totals_reference_value() {
        let records = read_catalog(CATALOG.as_bytes()).unwrap();
        assert!((aggregate(records, 10).total - 14_000.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_amount_reports_line() {
        let csv = "name,amount,recurrence,category,eligible,description\nBad,lots,,other,,\n";
        match read_catalog(csv.as_bytes()) {
            Err(CatalogError::InvalidAmount { line, value }) => {
                assert_eq!(line, 2);
                assert_eq!(value, "lots");
            }
            other => panic!("expected InvalidAmount, got {other:?}"),
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        let csv = "name,amount,recurrence,category,eligible,description\nX,$5,,galactic,,\n";
        assert!(matches!(
            read_catalog(csv.as_bytes()),
            Err(CatalogError::Csv(_))
        ));
    }

    #[test]
    fn amount_parsing() {
        assert_eq!(parse_amount("$1,500"), Some((1500.0, false)));
        assert_eq!(parse_amount("300/yr"), Some((300.0, true)));
        assert_eq!(parse_amount("-5"), None);
        assert_eq!(parse_amount(""), None);
    }
}
