//! Output formatting and export for aggregated readings.
//!
//! Supports pretty-printing, JSON serialization, and a yearly CSV export.

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use tracing::{debug, info};

use crate::analyzers::types::PollutantAggregates;

/// Default file name for the yearly CSV export.
pub const EXPORT_FILE_NAME: &str = "delhi_ncr_air_quality_data.csv";

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes one row per year with a column per pollutant to `writer`.
///
/// Missing (year, pollutant) combinations are left as empty cells.
pub fn write_yearly<W: std::io::Write>(
    writer: W,
    aggregates: &PollutantAggregates,
    pollutants: &[&str],
) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(writer);

    let mut header = vec!["Year"];
    header.extend_from_slice(pollutants);
    writer.write_record(&header)?;

    for (year, gases) in aggregates.yearly_averages() {
        let mut record = vec![year.to_string()];
        record.extend(
            pollutants
                .iter()
                .map(|p| gases.get(*p).map(f64::to_string).unwrap_or_default()),
        );
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Renders the yearly export as a string.
pub fn yearly_csv(aggregates: &PollutantAggregates, pollutants: &[&str]) -> Result<String> {
    let mut buf = Vec::new();
    write_yearly(&mut buf, aggregates, pollutants)?;
    Ok(String::from_utf8(buf)?)
}

/// Writes the yearly export to `path`, replacing any existing file.
pub fn write_yearly_csv(
    path: &str,
    aggregates: &PollutantAggregates,
    pollutants: &[&str],
) -> Result<()> {
    debug!(path, "Writing yearly CSV export");
    let file = File::create(path)?;
    write_yearly(file, aggregates, pollutants)
}
