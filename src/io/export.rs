//! CSV export for savings projections.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::engine::finance::YearlyProjection;

/// Column header for projection export.
const HEADER: &str = "year,annual_savings,cumulative_savings";

/// Exports projection records to a CSV file at the given path.
///
/// Writes a header row followed by one row per year. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(years: &[YearlyProjection], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(years, buf)
}

/// Writes projection records as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(years: &[YearlyProjection], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;
    for y in years {
        wtr.write_record(&[
            y.year.to_string(),
            format!("{:.2}", y.annual_savings),
            format!("{:.2}", y.cumulative_savings),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
