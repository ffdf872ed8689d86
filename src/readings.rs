//! Row types for pollutant observations.
//!
//! [`RawRow`] is a record exactly as it comes off the CSV source, every
//! column optional text. [`Reading`] is the validated observation the
//! aggregator consumes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Calendar month as used in the source's `Month` column. Serializes as
/// the three-letter name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    pub fn short_name(self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }

    /// Winter smog season, October through January.
    pub fn is_winter(self) -> bool {
        matches!(self, Month::Oct | Month::Nov | Month::Dec | Month::Jan)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognised month name: {0:?}")]
pub struct UnknownMonth(pub String);

impl FromStr for Month {
    type Err = UnknownMonth;

    /// Accepts `Jan` or `January`, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let prefix = lower.get(..3).unwrap_or_default();
        Month::ALL
            .into_iter()
            .find(|m| {
                let short = m.short_name().to_ascii_lowercase();
                prefix == short && (lower.len() == 3 || full_name(*m) == lower)
            })
            .ok_or_else(|| UnknownMonth(s.to_string()))
    }
}

fn full_name(m: Month) -> &'static str {
    match m {
        Month::Jan => "january",
        Month::Feb => "february",
        Month::Mar => "march",
        Month::Apr => "april",
        Month::May => "may",
        Month::Jun => "june",
        Month::Jul => "july",
        Month::Aug => "august",
        Month::Sep => "september",
        Month::Oct => "october",
        Month::Nov => "november",
        Month::Dec => "december",
    }
}

/// A single row deserialized from the readings CSV.
///
/// Columns not listed here (e.g. `Station`) are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawRow {
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
    #[serde(rename = "Month", default)]
    pub month: Option<String>,
    #[serde(rename = "Gas", default)]
    pub gas: Option<String>,
    #[serde(rename = "Concentration_Value", default)]
    pub concentration_value: Option<String>,
}

impl RawRow {
    pub fn new(year: &str, month: &str, gas: &str, concentration_value: &str) -> Self {
        RawRow {
            year: Some(year.to_string()),
            month: Some(month.to_string()),
            gas: Some(gas.to_string()),
            concentration_value: Some(concentration_value.to_string()),
        }
    }
}

/// Why a [`RawRow`] did not become a [`Reading`].
#[derive(Debug, Error, PartialEq)]
pub enum RowRejection {
    #[error("missing Year")]
    MissingYear,
    #[error("Year is not an integer: {0:?}")]
    InvalidYear(String),
    #[error("missing Gas")]
    MissingGas,
    #[error("missing Concentration_Value")]
    MissingConcentration,
    #[error("Concentration_Value is not numeric: {0:?}")]
    InvalidConcentration(String),
}

/// One validated observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub year: i32,
    /// `None` when the row's month is absent or unrecognised.
    pub month: Option<Month>,
    pub gas: String,
    pub concentration: f64,
}

impl TryFrom<&RawRow> for Reading {
    type Error = RowRejection;

    fn try_from(row: &RawRow) -> Result<Self, Self::Error> {
        let year_text = non_empty(&row.year).ok_or(RowRejection::MissingYear)?;
        let year = parse_year(year_text)?;
        // Year 0 is indistinguishable from an absent year in the source data.
        if year == 0 {
            return Err(RowRejection::MissingYear);
        }
        if year < 0 {
            return Err(RowRejection::InvalidYear(year_text.to_string()));
        }

        let gas = non_empty(&row.gas).ok_or(RowRejection::MissingGas)?;

        let value_text =
            non_empty(&row.concentration_value).ok_or(RowRejection::MissingConcentration)?;
        let concentration: f64 = value_text
            .parse()
            .map_err(|_| RowRejection::InvalidConcentration(value_text.to_string()))?;
        if concentration.is_infinite() {
            return Err(RowRejection::InvalidConcentration(value_text.to_string()));
        }
        // Zero and NaN readings count as missing.
        if concentration == 0.0 || concentration.is_nan() {
            return Err(RowRejection::MissingConcentration);
        }

        let month = non_empty(&row.month).and_then(|m| m.parse().ok());

        Ok(Reading {
            year,
            month,
            gas: gas.to_string(),
            concentration,
        })
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_year(text: &str) -> Result<i32, RowRejection> {
    if let Ok(year) = text.parse::<i32>() {
        return Ok(year);
    }
    match text.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 => Ok(f as i32),
        _ => Err(RowRejection::InvalidYear(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_parses_short_and_full_names() {
        assert_eq!("Jan".parse::<Month>(), Ok(Month::Jan));
        assert_eq!("september".parse::<Month>(), Ok(Month::Sep));
        assert_eq!(" DEC ".parse::<Month>(), Ok(Month::Dec));
        assert!("Janus".parse::<Month>().is_err());
        assert!("Ja".parse::<Month>().is_err());
        assert!("".parse::<Month>().is_err());
    }

    #[test]
    fn test_month_winter_season() {
        let winter: Vec<_> = Month::ALL.into_iter().filter(|m| m.is_winter()).collect();
        assert_eq!(winter, vec![Month::Jan, Month::Oct, Month::Nov, Month::Dec]);
    }

    #[test]
    fn test_reading_coerces_text_fields() {
        let row = RawRow::new("2021", "Jan", " PM2.5 ", "100.5");
        let reading = Reading::try_from(&row).unwrap();

        assert_eq!(reading.year, 2021);
        assert_eq!(reading.month, Some(Month::Jan));
        assert_eq!(reading.gas, "PM2.5");
        assert_eq!(reading.concentration, 100.5);
    }

    #[test]
    fn test_reading_accepts_integral_float_year() {
        let row = RawRow::new("2022.0", "Mar", "NO2", "20");
        assert_eq!(Reading::try_from(&row).unwrap().year, 2022);

        let row = RawRow::new("2022.5", "Mar", "NO2", "20");
        assert_eq!(
            Reading::try_from(&row),
            Err(RowRejection::InvalidYear("2022.5".into()))
        );
    }

    #[test]
    fn test_reading_rejects_missing_fields() {
        let mut row = RawRow::new("2021", "Jan", "PM2.5", "100");
        row.year = None;
        assert_eq!(Reading::try_from(&row), Err(RowRejection::MissingYear));

        let mut row = RawRow::new("2021", "Jan", "PM2.5", "100");
        row.gas = Some("   ".into());
        assert_eq!(Reading::try_from(&row), Err(RowRejection::MissingGas));

        let mut row = RawRow::new("2021", "Jan", "PM2.5", "100");
        row.concentration_value = None;
        assert_eq!(
            Reading::try_from(&row),
            Err(RowRejection::MissingConcentration)
        );
    }

    #[test]
    fn test_reading_rejects_non_numeric_concentration() {
        let row = RawRow::new("2021", "Jan", "PM2.5", "not-a-number");
        assert_eq!(
            Reading::try_from(&row),
            Err(RowRejection::InvalidConcentration("not-a-number".into()))
        );
    }

    #[test]
    fn test_reading_treats_zero_as_missing() {
        let row = RawRow::new("2021", "Jan", "PM2.5", "0");
        assert_eq!(
            Reading::try_from(&row),
            Err(RowRejection::MissingConcentration)
        );

        let row = RawRow::new("0", "Jan", "PM2.5", "12");
        assert_eq!(Reading::try_from(&row), Err(RowRejection::MissingYear));
    }

    #[test]
    fn test_reading_keeps_unknown_month_as_none() {
        let row = RawRow::new("2021", "Smarch", "CO", "700");
        assert_eq!(Reading::try_from(&row).unwrap().month, None);
    }

    #[test]
    fn test_reading_rejects_negative_year() {
        let row = RawRow::new("-2147483648", "Jan", "PM2.5", "100");
        assert_eq!(
            Reading::try_from(&row),
            Err(RowRejection::InvalidYear("-2147483648".into()))
        );

        let row = RawRow::new("-1.0", "Jan", "PM2.5", "100");
        assert_eq!(
            Reading::try_from(&row),
            Err(RowRejection::InvalidYear("-1.0".into()))
        );
    }

    #[test]
    fn test_reading_serializes_month_name() {
        let reading = Reading::try_from(&RawRow::new("2021", "january", "PM2.5", "100.5")).unwrap();

        assert_eq!(
            serde_json::to_value(&reading).unwrap(),
            serde_json::json!({
                "year": 2021,
                "month": "Jan",
                "gas": "PM2.5",
                "concentration": 100.5
            })
        );

        let mut row = RawRow::new("2021", "", "PM2.5", "100.5");
        row.month = None;
        let reading = Reading::try_from(&row).unwrap();
        assert_eq!(serde_json::to_value(&reading).unwrap()["month"], serde_json::Value::Null);
    }
}
