//! CSV decoder for the pollutant readings source.

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use tracing::{debug, trace};

use crate::readings::RawRow;

/// Decodes header-based CSV bytes into [`RawRow`]s.
///
/// Individual records that cannot be decoded are skipped.
///
/// # Errors
///
/// Returns an error if the header row cannot be read.
pub fn parse_rows(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let headers = rdr.headers().context("Failed to read CSV header")?.clone();
    debug!(columns = headers.len(), "CSV header read");

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for result in rdr.deserialize::<RawRow>() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                skipped += 1;
                trace!(error = %e, "Undecodable CSV record skipped");
            }
        }
    }

    debug!(rows = rows.len(), skipped, "CSV decoded");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_bytes_returns_no_rows() {
        let rows = parse_rows(&[]).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_parse_rows_with_extra_columns() {
        let csv = b"Year,Month,Gas,Concentration_Value,Station\n\
                    2021,Jan,PM2.5,100,Anand Vihar\n\
                    2021, Feb ,NO2,25.5,ITO\n";

        let rows = parse_rows(csv).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].year.as_deref(), Some("2021"));
        assert_eq!(rows[1].month.as_deref(), Some("Feb"));
        assert_eq!(rows[1].concentration_value.as_deref(), Some("25.5"));
    }

    #[test]
    fn test_parse_empty_cells_become_none() {
        let csv = b"Year,Month,Gas,Concentration_Value\n2021,Jan,,100\n";

        let rows = parse_rows(csv).unwrap();

        assert_eq!(rows.len(), 1);
        assert!(rows[0].gas.is_none());
    }

    #[test]
    fn test_parse_missing_columns_default_to_none() {
        let csv = b"Year,Gas\n2021,CO\n";

        let rows = parse_rows(csv).unwrap();

        assert_eq!(rows.len(), 1);
        assert!(rows[0].concentration_value.is_none());
        assert!(rows[0].month.is_none());
    }

    #[test]
    fn test_parse_short_records_are_tolerated() {
        let csv = b"Year,Month,Gas,Concentration_Value\n2021,Jan\n2022,Mar,SO2,6.5\n";

        let rows = parse_rows(csv).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].gas.as_deref(), Some("SO2"));
    }
}
