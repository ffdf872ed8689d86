//! Data types produced by the aggregation pipeline.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::readings::Month;

/// The five pollutants every dashboard view plots.
pub const POLLUTANTS: [&str; 5] = ["PM2.5", "PM10", "NO2", "SO2", "CO"];

/// Per-gas mean concentrations for one time bucket.
pub type GasAverages = BTreeMap<String, f64>;

/// `year -> gas -> mean concentration`.
pub type YearlyAverages = BTreeMap<i32, GasAverages>;

/// `(year, month) -> gas -> mean concentration`.
pub type MonthlyAverages = BTreeMap<MonthKey, GasAverages>;

/// Composite key for monthly buckets, written as `"{year}-{Mon}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: Month,
}

impl MonthKey {
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.month)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid month key: {0:?}")]
pub struct InvalidMonthKey(pub String);

impl FromStr for MonthKey {
    type Err = InvalidMonthKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || InvalidMonthKey(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(err)?;
        Ok(MonthKey {
            year: year.trim().parse().map_err(|_| err())?,
            month: month.parse().map_err(|_| err())?,
        })
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Yearly and monthly mean concentrations for one input snapshot.
///
/// There is no mutating API; a new snapshot means a new value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollutantAggregates {
    yearly_averages: YearlyAverages,
    monthly_data: MonthlyAverages,
}

impl PollutantAggregates {
    pub(crate) fn from_parts(yearly_averages: YearlyAverages, monthly_data: MonthlyAverages) -> Self {
        Self {
            yearly_averages,
            monthly_data,
        }
    }

    pub fn yearly_averages(&self) -> &YearlyAverages {
        &self.yearly_averages
    }

    pub fn monthly_data(&self) -> &MonthlyAverages {
        &self.monthly_data
    }

    pub fn is_empty(&self) -> bool {
        self.yearly_averages.is_empty() && self.monthly_data.is_empty()
    }

    /// Years with data, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.yearly_averages.keys().copied().collect()
    }

    pub fn yearly(&self, year: i32, gas: &str) -> Option<f64> {
        self.yearly_averages.get(&year)?.get(gas).copied()
    }

    /// Chart-series lookup: a missing slice reads as zero.
    pub fn yearly_or_zero(&self, year: i32, gas: &str) -> f64 {
        self.yearly(year, gas).unwrap_or(0.0)
    }

    pub fn monthly(&self, key: MonthKey, gas: &str) -> Option<f64> {
        self.monthly_data.get(&key)?.get(gas).copied()
    }

    /// Lookup by the textual `"2021-Jan"` key. Malformed keys read as no data.
    pub fn monthly_by_label(&self, key: &str, gas: &str) -> Option<f64> {
        self.monthly(key.parse().ok()?, gas)
    }
}
